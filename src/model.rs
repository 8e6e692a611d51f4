use std::path::Path;

use crate::analysis::features::FeatureVector;
use crate::analysis::matrix::{standardize, FeatureMatrix};
use crate::analysis::projection::project_2d;
use crate::analysis::spectrum::{self, SpectrumSnapshot};
use crate::audio::catalog::{AudioAsset, FileCatalog};
use crate::error::{ClusterError, Result};

// ---------------------------------------------------------------------------
// ClusterModel – the state machine the UI drives
// ---------------------------------------------------------------------------

/// Observable phase of the model, for status display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loaded,
    SelectionActive,
}

/// Everything derived from one `load_directory` call. Replaced wholesale
/// on the next load; never patched incrementally.
pub struct LoadedCorpus {
    catalog: FileCatalog,
    matrix: FeatureMatrix,
    projection: Vec<[f64; 2]>,
    selection: Option<Selection>,
}

/// The active selection: one catalog index plus its freshly computed
/// snapshot. Replaced atomically on re-selection.
#[derive(Debug)]
pub struct Selection {
    pub index: usize,
    pub snapshot: SpectrumSnapshot,
}

/// Orchestrator and state holder: owns the catalog, the feature matrix,
/// the projection, and the current selection. Constructed per session and
/// passed by reference into every UI handler; there is no global instance.
///
/// Single-threaded by design: each operation runs to completion before the
/// next event is processed, so a load fully replaces state before any
/// later selection can observe it.
#[derive(Default)]
pub struct ClusterModel {
    corpus: Option<LoadedCorpus>,
}

impl ClusterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match &self.corpus {
            None => Phase::Empty,
            Some(c) if c.selection.is_some() => Phase::SelectionActive,
            Some(_) => Phase::Loaded,
        }
    }

    /// Load a directory: rebuild catalog → matrix → projection and drop
    /// any prior selection.
    ///
    /// Failure is atomic: a missing directory or an empty catalog leaves
    /// whatever was loaded before completely untouched.
    pub fn load_directory(&mut self, path: &Path) -> Result<()> {
        let catalog = FileCatalog::from_directory(path)?;

        let matrix = FeatureMatrix::build(&catalog);
        let normalized = standardize(matrix.rows());
        let projection = project_2d(&normalized);

        log::info!(
            "loaded {} with {} audio files ({} degraded)",
            path.display(),
            catalog.len(),
            matrix.degraded()
        );

        self.corpus = Some(LoadedCorpus {
            catalog,
            matrix,
            projection,
            selection: None,
        });
        Ok(())
    }

    /// Select one asset by catalog index and compute its snapshot.
    ///
    /// An out-of-range index is reported and leaves the state unchanged,
    /// including any previous selection.
    pub fn select_asset(&mut self, index: usize) -> Result<&Selection> {
        let corpus = self.corpus.as_mut().ok_or(ClusterError::IndexOutOfRange {
            index,
            len: 0,
        })?;

        let asset = corpus
            .catalog
            .get(index)
            .ok_or(ClusterError::IndexOutOfRange {
                index,
                len: corpus.catalog.len(),
            })?;

        // A degraded asset still selects; its snapshot is just empty.
        let snapshot = asset
            .waveform()
            .map(spectrum::analyze)
            .unwrap_or_default();

        Ok(corpus.selection.insert(Selection { index, snapshot }))
    }

    /// Drop the selection, returning to the plain `Loaded` phase.
    pub fn clear_selection(&mut self) {
        if let Some(corpus) = &mut self.corpus {
            corpus.selection = None;
        }
    }

    // -- Read accessors for the rendering layer --

    pub fn catalog(&self) -> Option<&FileCatalog> {
        self.corpus.as_ref().map(|c| &c.catalog)
    }

    pub fn feature_rows(&self) -> Option<&[FeatureVector]> {
        self.corpus.as_ref().map(|c| c.matrix.rows())
    }

    pub fn degraded_count(&self) -> usize {
        self.corpus.as_ref().map(|c| c.matrix.degraded()).unwrap_or(0)
    }

    /// One `(PC1, PC2)` point per asset, in catalog order.
    pub fn projection(&self) -> Option<&[[f64; 2]]> {
        self.corpus.as_ref().map(|c| c.projection.as_slice())
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.corpus.as_ref().and_then(|c| c.selection.as_ref())
    }

    /// The asset recorded by the last successful `select_asset`, for
    /// out-of-band actions (playback, reveal in file manager).
    pub fn chosen_asset(&self) -> Option<&AudioAsset> {
        let corpus = self.corpus.as_ref()?;
        let selection = corpus.selection.as_ref()?;
        corpus.catalog.get(selection.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::FEATURE_DIM;
    use std::f64::consts::PI;

    const SR: u32 = 22050;

    fn write_wav(path: &Path, samples: &[f64]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SR,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s as f32).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn sine(freq: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / SR as f64).sin())
            .collect()
    }

    /// Three files: a.wav (440 Hz), b.wav (silent), c.wav (880 Hz).
    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&dir.path().join("a.wav"), &sine(440.0, 8192));
        write_wav(&dir.path().join("b.wav"), &vec![0.0; 8192]);
        write_wav(&dir.path().join("c.wav"), &sine(880.0, 8192));
        dir
    }

    #[test]
    fn load_produces_one_row_and_point_per_file() {
        let dir = fixture_dir();
        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();

        assert_eq!(model.phase(), Phase::Loaded);
        assert_eq!(model.feature_rows().unwrap().len(), 3);
        assert_eq!(model.projection().unwrap().len(), 3);
        assert!(model
            .feature_rows()
            .unwrap()
            .iter()
            .all(|r| r.len() == FEATURE_DIM));
    }

    #[test]
    fn silent_file_keeps_duration_and_zeroes_the_rest() {
        let dir = fixture_dir();
        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();

        // b.wav sorts second.
        let row = &model.feature_rows().unwrap()[1];
        assert!((row[0] - 8192.0 / SR as f64).abs() < 1e-9);
        assert!(row[1..].iter().all(|&v| v == 0.0));

        // And nothing downstream blew up on the degenerate column values.
        for p in model.projection().unwrap() {
            assert!(p.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn selection_lifecycle() {
        let dir = fixture_dir();
        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();

        for i in 0..3 {
            model.select_asset(i).unwrap();
            assert_eq!(model.phase(), Phase::SelectionActive);
            assert_eq!(model.selection().unwrap().index, i);
        }

        let err = model.select_asset(3).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::IndexOutOfRange { index: 3, len: 3 }
        ));
        // Failed selection left the previous one in place.
        assert_eq!(model.selection().unwrap().index, 2);

        model.clear_selection();
        assert_eq!(model.phase(), Phase::Loaded);
        assert!(model.selection().is_none());
    }

    #[test]
    fn select_on_empty_model_is_out_of_range() {
        let mut model = ClusterModel::new();
        assert!(matches!(
            model.select_asset(0),
            Err(ClusterError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn snapshot_is_in_band_and_matches_sample_count() {
        let dir = fixture_dir();
        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();

        let selection = model.select_asset(2).unwrap();
        for point in &selection.snapshot.spectrum {
            assert!((20.0..=20_000.0).contains(&point[0]));
        }
        // 8192 samples against the 4096-point display cap: stride 2.
        assert_eq!(selection.snapshot.waveform.len(), 4096);
    }

    #[test]
    fn chosen_asset_tracks_selection() {
        let dir = fixture_dir();
        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();

        model.select_asset(0).unwrap();
        assert_eq!(model.chosen_asset().unwrap().file_name(), "a.wav");
    }

    #[test]
    fn reload_is_deterministic() {
        let dir = fixture_dir();

        let mut first = ClusterModel::new();
        first.load_directory(dir.path()).unwrap();
        let mut second = ClusterModel::new();
        second.load_directory(dir.path()).unwrap();

        assert_eq!(first.feature_rows().unwrap(), second.feature_rows().unwrap());
        assert_eq!(first.projection().unwrap(), second.projection().unwrap());
    }

    #[test]
    fn failed_load_leaves_prior_state_untouched() {
        let dir = fixture_dir();
        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();
        model.select_asset(1).unwrap();

        let empty = tempfile::tempdir().unwrap();
        let err = model.load_directory(empty.path()).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyCatalog(_)));

        // Still on the old corpus, selection included.
        assert_eq!(model.phase(), Phase::SelectionActive);
        assert_eq!(model.selection().unwrap().index, 1);
        assert_eq!(model.catalog().unwrap().len(), 3);

        let missing = dir.path().join("not-there");
        assert!(matches!(
            model.load_directory(&missing),
            Err(ClusterError::DirectoryNotFound(_))
        ));
        assert_eq!(model.phase(), Phase::SelectionActive);
    }

    #[test]
    fn reload_discards_selection() {
        let dir = fixture_dir();
        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();
        model.select_asset(2).unwrap();

        model.load_directory(dir.path()).unwrap();
        assert_eq!(model.phase(), Phase::Loaded);
        assert!(model.selection().is_none());
    }

    #[test]
    fn degraded_file_gets_a_zero_row_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&dir.path().join("ok.wav"), &sine(440.0, 4096));
        std::fs::write(dir.path().join("broken.wav"), b"not a wav").unwrap();

        let mut model = ClusterModel::new();
        model.load_directory(dir.path()).unwrap();

        assert_eq!(model.degraded_count(), 1);
        // broken.wav sorts first.
        assert_eq!(model.feature_rows().unwrap()[0], [0.0; FEATURE_DIM]);

        // Selecting the degraded asset still works; the snapshot is empty.
        let selection = model.select_asset(0).unwrap();
        assert!(selection.snapshot.spectrum.is_empty());
        assert!(selection.snapshot.waveform.is_empty());
    }
}
