use crate::analysis::features::{extract_features, FeatureVector, FEATURE_DIM};
use crate::audio::catalog::FileCatalog;

// ---------------------------------------------------------------------------
// Feature matrix: one row per catalog entry, catalog order
// ---------------------------------------------------------------------------

/// The rectangular feature matrix. Row order is catalog order; every row
/// has exactly [`FEATURE_DIM`] entries.
pub struct FeatureMatrix {
    rows: Vec<FeatureVector>,
    degraded: usize,
}

impl FeatureMatrix {
    /// Extract features for every asset in the catalog.
    ///
    /// Assets that fail to decode contribute a zero row instead of aborting
    /// the batch; the count of such rows is kept for the UI banner.
    pub fn build(catalog: &FileCatalog) -> Self {
        let mut rows = Vec::with_capacity(catalog.len());
        let mut degraded = 0usize;

        for asset in catalog.assets() {
            match asset.waveform() {
                Some(audio) => rows.push(extract_features(&audio.samples, audio.sample_rate)),
                None => {
                    degraded += 1;
                    rows.push([0.0; FEATURE_DIM]);
                }
            }
        }

        Self { rows, degraded }
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    /// Number of rows that degraded to zero because decoding failed.
    pub fn degraded(&self) -> usize {
        self.degraded
    }
}

// ---------------------------------------------------------------------------
// Column-wise standardization (z-score)
// ---------------------------------------------------------------------------

// Columns whose variance falls below this are constant; dividing by their
// deviation would only spread rounding noise.
const VARIANCE_FLOOR: f64 = 1e-12;

/// Standardize each column to mean 0, population standard deviation 1.
///
/// Constant columns (including the all-zero columns produced by degraded
/// rows) map to 0 for every row. A single row passes through unchanged;
/// standardization is undefined below 2 samples.
pub fn standardize(rows: &[FeatureVector]) -> Vec<FeatureVector> {
    let n = rows.len();
    if n < 2 {
        return rows.to_vec();
    }

    let mut out = vec![[0.0; FEATURE_DIM]; n];

    for col in 0..FEATURE_DIM {
        let mean = rows.iter().map(|r| r[col]).sum::<f64>() / n as f64;
        let variance = rows
            .iter()
            .map(|r| {
                let d = r[col] - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;

        if variance > VARIANCE_FLOOR {
            let std = variance.sqrt();
            for (i, row) in rows.iter().enumerate() {
                out[i][col] = (row[col] - mean) / std;
            }
        }
        // else: leave the column at 0.
    }

    out
}
