use eframe::egui::{self, Color32, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::app::SoundClusterApp;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, app: &mut SoundClusterApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_directory_dialog(app);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = app.model.catalog() {
            let degraded = app.model.degraded_count();
            let mut banner = format!(
                "{}: {} audio files",
                catalog.directory().display(),
                catalog.len()
            );
            if degraded > 0 {
                banner.push_str(&format!(", {degraded} degraded"));
            }
            ui.label(banner);
        }

        if let Some(msg) = &app.status {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – catalog list + playback controls
// ---------------------------------------------------------------------------

/// Render the file list and the controls for the chosen asset.
pub fn side_panel(ui: &mut Ui, app: &mut SoundClusterApp) {
    ui.heading("Files");
    ui.separator();

    let Some(catalog) = app.model.catalog() else {
        ui.label("No directory loaded.");
        return;
    };

    // Clone what the table needs so we can mutate app state on click.
    let names: Vec<String> = catalog
        .assets()
        .iter()
        .map(|a| a.file_name().to_string())
        .collect();
    let selected = app.model.selection().map(|s| s.index);

    let mut clicked: Option<usize> = None;

    TableBuilder::new(ui)
        .striped(true)
        .sense(Sense::click())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(format!("{} files", names.len()));
            });
        })
        .body(|body| {
            body.rows(18.0, names.len(), |mut row| {
                let idx = row.index();
                row.set_selected(selected == Some(idx));
                row.col(|ui| {
                    ui.label(&names[idx]);
                });
                if row.response().clicked() {
                    clicked = Some(idx);
                }
            });
        });

    if let Some(idx) = clicked {
        app.select(idx);
    }

    ui.separator();
    selection_controls(ui, app);
}

/// Details and playback buttons for the chosen asset.
fn selection_controls(ui: &mut Ui, app: &mut SoundClusterApp) {
    let Some(asset) = app.model.chosen_asset() else {
        ui.label("Click a point or a file to inspect it.");
        return;
    };

    ui.strong(asset.file_name());
    if let Some(audio) = asset.waveform() {
        ui.label(format!(
            "{:.2} s @ {} Hz",
            audio.duration_secs(),
            audio.sample_rate
        ));
    } else {
        ui.label("(could not decode)");
    }

    if let (Some(rows), Some(selection)) = (app.model.feature_rows(), app.model.selection()) {
        let row = &rows[selection.index];
        ui.label(format!("pitch {:.0} Hz · centroid {:.0} Hz", row[2], row[3]));
        ui.label(format!(
            "rms {:.3} · zcr {:.3} · flatness {:.3}",
            row[1], row[4], row[5]
        ));
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("▶ Play").clicked() {
            app.play_chosen();
        }
        if ui.button("⏹ Stop").clicked() {
            app.stop_playback();
        }
        if ui.button("Deselect").clicked() {
            app.deselect();
        }
        if app.is_playing() {
            ui.label("playing…");
        }
    });
}

// ---------------------------------------------------------------------------
// Directory dialog
// ---------------------------------------------------------------------------

pub fn open_directory_dialog(app: &mut SoundClusterApp) {
    let dir = rfd::FileDialog::new()
        .set_title("Select a directory with audio files")
        .pick_folder();

    if let Some(path) = dir {
        app.open_directory(&path);
    }
}
