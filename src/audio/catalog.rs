use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::audio::decode::{decode_file, DecodedAudio};
use crate::error::{ClusterError, Result};

// ---------------------------------------------------------------------------
// AudioAsset – one file in the catalog
// ---------------------------------------------------------------------------

/// Extensions treated as audio. Matching is case-insensitive, so `.WAV`
/// files on case-preserving filesystems are picked up too.
pub const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "mp3", "flac", "ogg", "m4a"];

/// A single audio file, identified by path, with a lazily decoded mono
/// waveform. Once decoded the waveform is immutable for the lifetime of
/// the catalog.
#[derive(Debug)]
pub struct AudioAsset {
    path: PathBuf,
    file_name: String,
    decoded: OnceCell<Option<DecodedAudio>>,
}

impl AudioAsset {
    fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            decoded: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The decoded mono waveform, or `None` if the file could not be
    /// decoded. The first call decodes; later calls return the cached
    /// result.
    pub fn waveform(&self) -> Option<&DecodedAudio> {
        self.decoded
            .get_or_init(|| match decode_file(&self.path) {
                Ok(audio) => Some(audio),
                Err(e) => {
                    log::warn!("failed to decode {}: {e}", self.path.display());
                    None
                }
            })
            .as_ref()
    }

    /// Whether decoding has been attempted and failed.
    pub fn is_degraded(&self) -> bool {
        matches!(self.decoded.get(), Some(None))
    }
}

// ---------------------------------------------------------------------------
// FileCatalog – ordered directory listing
// ---------------------------------------------------------------------------

/// The ordered list of audio assets in one directory. The order (sorted by
/// file name) is the row/index order used by every downstream stage.
#[derive(Debug)]
pub struct FileCatalog {
    directory: PathBuf,
    assets: Vec<AudioAsset>,
}

impl FileCatalog {
    /// Enumerate the audio files in `directory`.
    ///
    /// Directory iteration order is platform-dependent, so entries are
    /// sorted by file name to keep reloads deterministic.
    pub fn from_directory(directory: &Path) -> Result<Self> {
        if !directory.is_dir() {
            return Err(ClusterError::DirectoryNotFound(directory.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(directory)
            .map_err(|_| ClusterError::DirectoryNotFound(directory.to_path_buf()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && has_audio_extension(p))
            .collect();

        if paths.is_empty() {
            return Err(ClusterError::EmptyCatalog(directory.to_path_buf()));
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(Self {
            directory: directory.to_path_buf(),
            assets: paths.into_iter().map(AudioAsset::new).collect(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn assets(&self) -> &[AudioAsset] {
        &self.assets
    }

    pub fn get(&self, index: usize) -> Option<&AudioAsset> {
        self.assets.get(index)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
