use nalgebra::{DMatrix, SymmetricEigen};
use thiserror::Error;

/// Default embedding dimension; protein reconstruction targets 3D space.
pub const DEFAULT_TARGET_DIMENSION: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum EmbeddingError {
    #[error("Distance matrix must be square, got {rows}x{columns}")]
    NonSquare { rows: usize, columns: usize },

    #[error("Target dimension {target} must not exceed the number of data points {points}")]
    TargetDimensionTooLarge { target: usize, points: usize },

    #[error(
        "Selected eigenvalue {value} is not positive; the distance matrix is not embeddable in {target} dimensions"
    )]
    NonPositiveEigenvalue { value: f64, target: usize },
}

/// Classical multidimensional scaling: recovers an m-dimensional point
/// configuration whose pairwise distances reproduce the given symmetric
/// distance matrix.
///
/// The input is squared and scaled (`-0.5 * d^2`), double-centered, and
/// eigendecomposed; the m largest eigenvalues (deterministic tie-break:
/// descending value, then ascending index) scale their eigenvectors by the
/// square root of the eigenvalue. Point i is assembled from the i-th entries
/// of the scaled eigenvectors.
///
/// A selected non-positive eigenvalue means the distances are non-Euclidean
/// or inconsistent and is a hard error, not something to coerce.
pub fn embed(
    distances: &DMatrix<f64>,
    target_dimension: usize,
) -> Result<Vec<Vec<f64>>, EmbeddingError> {
    let n = distances.nrows();
    if distances.ncols() != n {
        return Err(EmbeddingError::NonSquare {
            rows: n,
            columns: distances.ncols(),
        });
    }
    if target_dimension > n {
        return Err(EmbeddingError::TargetDimensionTooLarge {
            target: target_dimension,
            points: n,
        });
    }

    let proximity = distances.map(|d| -0.5 * d * d);
    let centered = double_center(&proximity);

    let SymmetricEigen {
        eigenvalues,
        eigenvectors,
    } = SymmetricEigen::new(centered);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigenvalues[b]
            .partial_cmp(&eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut scaled_eigenvectors = Vec::with_capacity(target_dimension);
    for &index in order.iter().take(target_dimension) {
        let eigenvalue = eigenvalues[index];
        if eigenvalue <= 0.0 {
            return Err(EmbeddingError::NonPositiveEigenvalue {
                value: eigenvalue,
                target: target_dimension,
            });
        }
        let factor = eigenvalue.sqrt();
        scaled_eigenvectors.push(eigenvectors.column(index) * factor);
    }

    let mut embedding = Vec::with_capacity(n);
    for point_index in 0..n {
        embedding.push(
            scaled_eigenvectors
                .iter()
                .map(|v| v[point_index])
                .collect(),
        );
    }
    Ok(embedding)
}

/// [`embed`] into the default 3-dimensional space.
pub fn embed_default(distances: &DMatrix<f64>) -> Result<Vec<Vec<f64>>, EmbeddingError> {
    embed(distances, DEFAULT_TARGET_DIMENSION)
}

/// `b_ij = a_ij - rowmean_i - colmean_j + grandmean`
fn double_center(proximity: &DMatrix<f64>) -> DMatrix<f64> {
    let n = proximity.nrows();
    let row_means: Vec<f64> = (0..n).map(|r| proximity.row(r).mean()).collect();
    let column_means: Vec<f64> = (0..n).map(|c| proximity.column(c).mean()).collect();
    let grand_mean = proximity.mean();
    DMatrix::from_fn(n, n, |r, c| {
        proximity[(r, c)] - row_means[r] - column_means[c] + grand_mean
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn distance_matrix(points: &[Point3<f64>]) -> DMatrix<f64> {
        DMatrix::from_fn(points.len(), points.len(), |i, j| {
            (points[i] - points[j]).norm()
        })
    }

    #[test]
    fn embedding_reproduces_input_distances_up_to_rigid_motion() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.8, 0.0, 0.0),
            Point3::new(5.2, 3.1, 0.0),
            Point3::new(7.0, 4.0, 2.5),
            Point3::new(9.3, 2.2, 1.1),
            Point3::new(11.0, 5.5, 3.0),
        ];
        let distances = distance_matrix(&points);

        let embedding = embed_default(&distances).unwrap();

        assert_eq!(embedding.len(), points.len());
        for i in 0..points.len() {
            for j in 0..points.len() {
                let d: f64 = embedding[i]
                    .iter()
                    .zip(&embedding[j])
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt();
                assert!(
                    (d - distances[(i, j)]).abs() < 1e-6,
                    "distance ({i},{j}) not preserved: {d} vs {}",
                    distances[(i, j)]
                );
            }
        }
    }

    #[test]
    fn planar_distances_embed_exactly_into_two_dimensions() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(1.5, 2.5, 0.0),
        ];
        let distances = distance_matrix(&points);

        let embedding = embed(&distances, 2).unwrap();

        for i in 0..points.len() {
            for j in 0..points.len() {
                let d: f64 = embedding[i]
                    .iter()
                    .zip(&embedding[j])
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt();
                assert!((d - distances[(i, j)]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn non_euclidean_distances_fail_with_degeneracy_error() {
        // Violates the triangle inequality, so one selected eigenvalue is
        // clearly negative.
        let distances = DMatrix::from_row_slice(
            3,
            3,
            &[0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0],
        );

        let result = embed(&distances, 3);

        assert!(matches!(
            result,
            Err(EmbeddingError::NonPositiveEigenvalue { .. })
        ));
    }

    #[test]
    fn target_dimension_larger_than_point_count_is_rejected() {
        let distances = DMatrix::zeros(2, 2);
        assert_eq!(
            embed(&distances, 3).unwrap_err(),
            EmbeddingError::TargetDimensionTooLarge {
                target: 3,
                points: 2
            }
        );
    }

    #[test]
    fn non_square_input_is_rejected() {
        let distances = DMatrix::zeros(2, 3);
        assert_eq!(
            embed(&distances, 2).unwrap_err(),
            EmbeddingError::NonSquare {
                rows: 2,
                columns: 3
            }
        );
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.8, 0.1, 0.2),
            Point3::new(7.1, 2.0, 1.0),
            Point3::new(9.0, 5.0, 2.0),
        ];
        let distances = distance_matrix(&points);

        let first = embed_default(&distances).unwrap();
        let second = embed_default(&distances).unwrap();

        assert_eq!(first, second);
    }
}
