/// Analysis layer: per-file features, batch normalization, projection,
/// and the per-selection snapshot.
///
/// Architecture:
/// ```text
///   mono waveforms (catalog order)
///        │
///        ▼
///   ┌──────────┐   features::extract_features
///   │ features  │  (pitch, hpss as helpers) → 8-dim vector per file
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  matrix   │  FeatureMatrix::build → standardize (z-score)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection  │  PCA → one (PC1, PC2) point per file
///   └────────────┘
///
///   spectrum:: is independent of the batch path; it turns one selected
///   waveform into a plot-ready snapshot.
/// ```
pub mod features;
pub mod hpss;
pub mod matrix;
pub mod pitch;
pub mod projection;
pub mod spectrum;
