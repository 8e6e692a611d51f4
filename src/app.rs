use std::path::Path;

use eframe::egui;

use crate::audio::playback::Playback;
use crate::model::ClusterModel;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SoundClusterApp {
    pub model: ClusterModel,
    playback: Box<dyn Playback>,
    /// Status / error message shown in the top bar.
    pub status: Option<String>,
}

impl SoundClusterApp {
    pub fn new(playback: Box<dyn Playback>) -> Self {
        Self {
            model: ClusterModel::new(),
            playback,
            status: None,
        }
    }

    /// Load a directory into the model. On failure the model keeps its
    /// previous corpus and the error becomes status text.
    pub fn open_directory(&mut self, path: &Path) {
        self.playback.stop();
        match self.model.load_directory(path) {
            Ok(()) => self.status = None,
            Err(e) => {
                log::error!("load failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Select an asset by catalog index. The playback device is released
    /// before the selection changes; the new track only starts on Play.
    pub fn select(&mut self, index: usize) {
        self.playback.stop();
        match self.model.select_asset(index) {
            Ok(_) => self.status = None,
            Err(e) => {
                log::error!("selection failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn deselect(&mut self) {
        self.playback.stop();
        self.model.clear_selection();
    }

    /// Play the chosen asset. Device errors surface as status text and
    /// leave the model untouched.
    pub fn play_chosen(&mut self) {
        let Some(path) = self.model.chosen_asset().map(|a| a.path().to_path_buf()) else {
            return;
        };
        if let Err(e) = self.playback.play(&path) {
            log::error!("playback failed: {e}");
            self.status = Some(e.to_string());
        }
    }

    pub fn stop_playback(&mut self) {
        self.playback.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }
}

impl eframe::App for SoundClusterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        // ---- Left side panel: catalog + playback controls ----
        egui::SidePanel::left("catalog_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, self);
            });

        // ---- Bottom panel: waveform + spectrum of the selection ----
        if let Some(selection) = self.model.selection() {
            let file_name = self
                .model
                .chosen_asset()
                .map(|a| a.file_name().to_string())
                .unwrap_or_default();
            let snapshot = selection.snapshot.clone();

            egui::TopBottomPanel::bottom("detail_panel")
                .default_height(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    ui.columns(2, |columns| {
                        plot::waveform_plot(&mut columns[0], &file_name, &snapshot);
                        plot::spectrum_plot(&mut columns[1], &file_name, &snapshot);
                    });
                });
        }

        // ---- Central panel: cluster scatter ----
        let mut clicked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            clicked = plot::cluster_plot(ui, &self.model);
        });
        if let Some(index) = clicked {
            self.select(index);
        }
    }
}
