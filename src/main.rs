mod analysis;
mod app;
mod audio;
mod color;
mod error;
mod model;
mod ui;

use std::path::PathBuf;

use app::SoundClusterApp;
use audio::playback::RodioPlayback;
use clap::Parser;
use eframe::egui;

/// Explore a directory of sound files as a 2-D similarity cluster.
#[derive(Parser)]
#[command(name = "sound-cluster", version, about)]
struct Args {
    /// Directory of audio files to load at startup. Without it a native
    /// directory chooser opens first.
    directory: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();

    let args = Args::parse();
    let directory = args.directory.or_else(|| {
        rfd::FileDialog::new()
            .set_title("Select a directory with audio files")
            .pick_folder()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sound Cluster",
        options,
        Box::new(move |_cc| {
            let mut app = SoundClusterApp::new(Box::new(RodioPlayback::new()));
            // Cancelling the chooser starts empty; File → Open… still works.
            if let Some(dir) = &directory {
                app.open_directory(dir);
            }
            Ok(Box::new(app))
        }),
    )
}
