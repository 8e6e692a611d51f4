use nalgebra::{DMatrix, SymmetricEigen};

use crate::analysis::features::{FeatureVector, FEATURE_DIM};

// ---------------------------------------------------------------------------
// 2-component principal component analysis
// ---------------------------------------------------------------------------

/// Project the standardized feature matrix onto its top two principal
/// components, one `(PC1, PC2)` point per row, in row order.
///
/// The eigendecomposition's sign ambiguity is resolved by orienting each
/// component so its largest-magnitude coefficient is positive, which keeps
/// repeated runs on the same corpus rendering identically.
///
/// A single row projects to the origin; an empty input yields no points
/// (unreachable through the model, which rejects empty catalogs first).
pub fn project_2d(rows: &[FeatureVector]) -> Vec<[f64; 2]> {
    let n = rows.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![[0.0, 0.0]];
    }

    // Center columns; the caller normally passes z-scored data, but the
    // projection must not rely on it.
    let mut means = [0.0f64; FEATURE_DIM];
    for row in rows {
        for (col, &v) in row.iter().enumerate() {
            means[col] += v;
        }
    }
    for m in &mut means {
        *m /= n as f64;
    }

    let centered = DMatrix::from_fn(n, FEATURE_DIM, |i, j| rows[i][j] - means[j]);

    // Covariance with the n−1 denominator, 8×8 symmetric PSD.
    let covariance = (centered.transpose() * &centered) / (n as f64 - 1.0);
    let eigen = SymmetricEigen::new(covariance);

    // nalgebra returns eigenpairs in no particular order.
    let mut order: Vec<usize> = (0..FEATURE_DIM).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut components = [[0.0f64; FEATURE_DIM]; 2];
    for (c, &idx) in order.iter().take(2).enumerate() {
        let column = eigen.eigenvectors.column(idx);

        let mut dominant = 0usize;
        for i in 1..FEATURE_DIM {
            if column[i].abs() > column[dominant].abs() {
                dominant = i;
            }
        }
        let sign = if column[dominant] < 0.0 { -1.0 } else { 1.0 };

        for i in 0..FEATURE_DIM {
            components[c][i] = sign * column[i];
        }
    }

    (0..n)
        .map(|i| {
            let mut point = [0.0f64; 2];
            for (c, component) in components.iter().enumerate() {
                point[c] = (0..FEATURE_DIM)
                    .map(|j| centered[(i, j)] * component[j])
                    .sum();
            }
            point
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spread_rows() -> Vec<FeatureVector> {
        vec![
            [1.0, -1.0, 0.2, 0.0, 0.3, 0.0, 0.0, 0.1],
            [2.0, -2.0, 0.1, 0.5, 0.1, 0.2, 0.1, 0.0],
            [3.0, -3.0, 0.4, 0.2, 0.2, 0.1, 0.3, 0.2],
            [4.0, -4.0, 0.3, 0.4, 0.5, 0.3, 0.2, 0.4],
            [5.0, -5.0, 0.6, 0.1, 0.4, 0.5, 0.4, 0.3],
        ]
    }

    #[test]
    fn repeated_runs_are_identical() {
        let rows = spread_rows();
        assert_eq!(project_2d(&rows), project_2d(&rows));
    }

    #[test]
    fn one_point_per_row() {
        let rows = spread_rows();
        assert_eq!(project_2d(&rows).len(), rows.len());
    }

    #[test]
    fn single_row_projects_to_origin() {
        let rows = vec![[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]];
        assert_eq!(project_2d(&rows), vec![[0.0, 0.0]]);
    }

    #[test]
    fn first_component_follows_dominant_variance() {
        // Variance lives almost entirely in column 0.
        let rows: Vec<FeatureVector> = (0..6)
            .map(|i| {
                let mut r = [0.0; FEATURE_DIM];
                r[0] = i as f64 * 10.0;
                r[1] = 0.01 * (i % 2) as f64;
                r
            })
            .collect();

        let points = project_2d(&rows);
        // PC1 spacing mirrors the column-0 spacing.
        let span1 = points.last().unwrap()[0] - points[0][0];
        assert_relative_eq!(span1.abs(), 50.0, epsilon = 0.1);
        // With the sign convention, increasing column 0 means increasing PC1.
        assert!(points.windows(2).all(|w| w[1][0] > w[0][0]));
    }

    #[test]
    fn zero_matrix_projects_to_origin() {
        let rows = vec![[0.0; FEATURE_DIM]; 4];
        for p in project_2d(&rows) {
            assert_eq!(p, [0.0, 0.0]);
            assert!(p.iter().all(|v| v.is_finite()));
        }
    }
}
