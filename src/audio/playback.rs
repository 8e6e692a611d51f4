use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Playback – narrow interface over the audio output device
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Device(String),

    #[error("cannot play {path}: {reason}")]
    Source { path: String, reason: String },
}

/// The only operations the UI needs from the playback device. Kept entirely
/// outside the analysis pipeline; a failing device never affects the model.
///
/// The device is singly owned: `play` releases whatever was playing before
/// acquiring the new track.
pub trait Playback {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError>;
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// rodio-backed playback. The output stream is opened lazily on first play
/// so a machine without an audio device can still browse clusters.
pub struct RodioPlayback {
    // Held only to keep the device open; dropping it stops all audio.
    stream: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl RodioPlayback {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
        }
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle, PlaybackError> {
        if self.stream.is_none() {
            let pair = OutputStream::try_default()
                .map_err(|e| PlaybackError::Device(e.to_string()))?;
            self.stream = Some(pair);
        }
        self.stream
            .as_ref()
            .map(|(_, handle)| handle)
            .ok_or_else(|| PlaybackError::Device("output stream unavailable".into()))
    }
}

impl Default for RodioPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback for RodioPlayback {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
        self.stop();

        let file = File::open(path).map_err(|e| PlaybackError::Source {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Source {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let handle = self.handle()?;
        let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        sink.append(source);
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }
}

