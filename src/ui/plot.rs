use eframe::egui::Ui;
use egui_plot::{GridInput, GridMark, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::analysis::spectrum::{SpectrumSnapshot, LOG_FREQ_TICKS_HZ};
use crate::color::point_colors;
use crate::model::ClusterModel;

// ---------------------------------------------------------------------------
// Cluster scatter (central panel)
// ---------------------------------------------------------------------------

// How close a click must land to a point to select it, as a fraction of
// the visible plot bounds.
const PICK_RADIUS: f64 = 0.03;

/// Render the PCA scatter. Returns the index of a point the user clicked,
/// if any.
pub fn cluster_plot(ui: &mut Ui, model: &ClusterModel) -> Option<usize> {
    let (Some(projection), Some(catalog)) = (model.projection(), model.catalog()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a directory to cluster its sounds  (File → Open…)");
        });
        return None;
    };

    let colors = point_colors(projection);
    let selected = model.selection().map(|s| s.index);

    let response = Plot::new("cluster_plot")
        .x_axis_label("PC1")
        .y_axis_label("PC2")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, (point, asset)) in projection.iter().zip(catalog.assets()).enumerate() {
                let radius = if selected == Some(idx) { 8.0 } else { 5.0 };
                let marker = Points::new(PlotPoints::from(vec![*point]))
                    .name(asset.file_name())
                    .color(colors[idx])
                    .shape(MarkerShape::Circle)
                    .radius(radius);
                plot_ui.points(marker);
            }

            let clicked = plot_ui.response().clicked();
            let pointer = plot_ui.pointer_coordinate();
            let bounds = plot_ui.plot_bounds();
            (clicked, pointer, bounds)
        });

    let (clicked, pointer, bounds) = response.inner;
    if !clicked {
        return None;
    }
    let pointer = pointer?;

    // Nearest point in bounds-normalized space, so picking behaves the
    // same regardless of zoom or aspect ratio.
    let (width, height) = (bounds.width().max(1e-12), bounds.height().max(1e-12));
    projection
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let dx = (p[0] - pointer.x) / width;
            let dy = (p[1] - pointer.y) / height;
            (idx, dx * dx + dy * dy)
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .filter(|&(_, d2)| d2 <= PICK_RADIUS * PICK_RADIUS)
        .map(|(idx, _)| idx)
}

// ---------------------------------------------------------------------------
// Waveform (bottom panel, left)
// ---------------------------------------------------------------------------

/// Render the selected asset's time/amplitude view.
pub fn waveform_plot(ui: &mut Ui, file_name: &str, snapshot: &SpectrumSnapshot) {
    let points: PlotPoints = snapshot.waveform.iter().copied().collect();
    let line = Line::new(points).name(file_name).width(1.5);

    Plot::new("waveform_plot")
        .x_axis_label("Time (s)")
        .y_axis_label("Amplitude")
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}

// ---------------------------------------------------------------------------
// Spectrum (bottom panel, right) – log-frequency axis
// ---------------------------------------------------------------------------

/// Render the selected asset's global magnitude spectrum on a log-frequency
/// axis with the fixed reference ticks {20, 50, 100, … 20k} Hz.
pub fn spectrum_plot(ui: &mut Ui, file_name: &str, snapshot: &SpectrumSnapshot) {
    // Plot in log10(Hz) space; egui_plot has no native log axis.
    let points: PlotPoints = snapshot
        .spectrum
        .iter()
        .filter(|p| p[0] > 0.0)
        .map(|p| [p[0].log10(), p[1]])
        .collect();
    let line = Line::new(points).name(file_name).width(1.5);

    Plot::new("spectrum_plot")
        .x_axis_label("Frequency (Hz)")
        .y_axis_label("Magnitude")
        .x_grid_spacer(log_freq_grid)
        .x_axis_formatter(|mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            log_tick_label(mark.value)
        })
        .label_formatter(|name, value| {
            let freq = 10f64.powf(value.x);
            if name.is_empty() {
                format!("{freq:.0} Hz\n{:.1}", value.y)
            } else {
                format!("{name}\n{freq:.0} Hz\n{:.1}", value.y)
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}

/// Grid lines only at the fixed reference ticks.
fn log_freq_grid(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    LOG_FREQ_TICKS_HZ
        .iter()
        .map(|t| t.log10())
        .filter(|v| (min..=max).contains(v))
        .map(|value| GridMark {
            value,
            // Decades get the emphasized grid line.
            step_size: if value.fract().abs() < 1e-9 { 1.0 } else { 0.5 },
        })
        .collect()
}

/// Label for a log10-space tick, empty for anything off the reference set.
fn log_tick_label(value: f64) -> String {
    for &tick in &LOG_FREQ_TICKS_HZ {
        if (tick.log10() - value).abs() < 1e-6 {
            return if tick >= 1000.0 {
                format!("{}k", tick / 1000.0)
            } else {
                format!("{tick}")
            };
        }
    }
    String::new()
}
