//! Similarity functions and the dense similarity matrix.
//!
//! Affinity propagation only ever looks at pairwise similarities `s(i, k)`: how well
//! point `k` would serve as the exemplar of point `i`. Larger is better. The matrix
//! diagonal holds the *preferences*, which control how readily each point elects
//! itself as an exemplar.
//!
//! Similarities need not be symmetric and need not come from a metric. Anything that
//! implements [`Similarity`] (including plain closures) can be used.

use super::util;
use crate::error::{Error, Result};

/// Pairwise similarity between two points. Larger values mean "more similar".
pub trait Similarity {
    /// Similarity of `b` as a candidate exemplar for `a`.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&[f32], &[f32]) -> f64,
{
    fn similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        self(a, b)
    }
}

/// Negative squared Euclidean distance: `-||a - b||²`.
///
/// The standard choice for affinity propagation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NegSquaredEuclidean;

impl Similarity for NegSquaredEuclidean {
    #[inline]
    fn similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        -util::squared_euclidean(a, b)
    }
}

/// Negative Euclidean distance: `-||a - b||`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NegEuclidean;

impl Similarity for NegEuclidean {
    #[inline]
    fn similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        -util::squared_euclidean(a, b).sqrt()
    }
}

/// Dense N×N similarity matrix, row-major.
///
/// `get(i, k)` is the similarity of `k` as exemplar for `i`; `get(k, k)` is the
/// preference of `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build the matrix for `data` under `similarity`.
    ///
    /// The diagonal is left at `0.0`; set it with [`set_preference`](Self::set_preference)
    /// before clustering.
    pub fn from_points<S: Similarity + ?Sized>(data: &[Vec<f32>], similarity: &S) -> Result<Self> {
        util::validate_points(data)?;
        let n = data.len();
        let mut values = vec![0.0; n * n];
        for (i, a) in data.iter().enumerate() {
            for (k, b) in data.iter().enumerate() {
                if i != k {
                    values[i * n + k] = similarity.similarity(a, b);
                }
            }
        }
        let m = Self { n, values };
        m.check_finite()?;
        Ok(m)
    }

    /// Wrap a precomputed matrix given as rows. The diagonal is kept as supplied.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let mut values = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(Error::NonSquareMatrix {
                    rows: n,
                    cols: row.len(),
                });
            }
            values.extend(row);
        }
        let m = Self { n, values };
        m.check_finite()?;
        Ok(m)
    }

    fn check_finite(&self) -> Result<()> {
        if self.values.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(Error::InvalidParameter {
                name: "similarity",
                message: "must be finite",
            })
        }
    }

    /// Number of points.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Similarity of `k` as exemplar for `i`.
    #[inline]
    pub fn get(&self, i: usize, k: usize) -> f64 {
        self.values[i * self.n + k]
    }

    /// Row-major view of all entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Preferences (the diagonal).
    pub fn preferences(&self) -> Vec<f64> {
        (0..self.n).map(|k| self.get(k, k)).collect()
    }

    /// Broadcast one preference to every diagonal entry.
    pub fn set_preference(&mut self, preference: f64) -> Result<()> {
        check_preference(preference)?;
        for k in 0..self.n {
            self.values[k * self.n + k] = preference;
        }
        Ok(())
    }

    /// Set a per-point preference. `preferences.len()` must equal `n`.
    pub fn set_preferences(&mut self, preferences: &[f64]) -> Result<()> {
        if preferences.len() != self.n {
            return Err(Error::DimensionMismatch {
                expected: self.n,
                found: preferences.len(),
            });
        }
        for &p in preferences {
            check_preference(p)?;
        }
        for (k, &p) in preferences.iter().enumerate() {
            self.values[k * self.n + k] = p;
        }
        Ok(())
    }

    /// Median of the off-diagonal entries, or `None` for a single point.
    pub fn median_off_diagonal(&self) -> Option<f64> {
        let mut off: Vec<f64> = self.off_diagonal().collect();
        util::median(&mut off)
    }

    fn off_diagonal(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.n;
        self.values
            .iter()
            .enumerate()
            .filter(move |(idx, _)| idx / n != idx % n)
            .map(|(_, &v)| v)
    }

    /// `Some(s)` when every off-diagonal entry equals `s`.
    pub(crate) fn uniform_off_diagonal(&self) -> Option<f64> {
        let mut off = self.off_diagonal();
        let first = off.next()?;
        off.all(|v| v == first).then_some(first)
    }
}

fn check_preference(preference: f64) -> Result<()> {
    if preference.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "preference",
            message: "must be finite",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neg_squared_euclidean_values() {
        let s = NegSquaredEuclidean;
        assert_eq!(s.similarity(&[0.0, 0.0], &[3.0, 4.0]), -25.0);
        assert_eq!(NegEuclidean.similarity(&[0.0, 0.0], &[3.0, 4.0]), -5.0);
    }

    #[test]
    fn matrix_from_points_leaves_diagonal_zero() {
        let data = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![0.0, 3.0]];
        let m = SimilarityMatrix::from_points(&data, &NegSquaredEuclidean).unwrap();
        assert_eq!(m.n(), 3);
        assert_eq!(m.get(0, 1), -1.0);
        assert_eq!(m.get(0, 2), -9.0);
        assert_eq!(m.get(2, 1), -4.0);
        assert_eq!(m.preferences(), vec![0.0; 3]);
        // off-diagonal: -1, -9, -1, -4, -9, -4
        assert_eq!(m.median_off_diagonal(), Some(-4.0));
    }

    #[test]
    fn closures_are_similarities() {
        let manhattan = |a: &[f32], b: &[f32]| -> f64 {
            -a.iter()
                .zip(b)
                .map(|(x, y)| f64::from((x - y).abs()))
                .sum::<f64>()
        };
        let data = vec![vec![0.0, 0.0], vec![1.0, 2.0]];
        let m = SimilarityMatrix::from_points(&data, &manhattan).unwrap();
        assert_eq!(m.get(0, 1), -3.0);
    }

    #[test]
    fn from_rows_validates_shape() {
        assert!(matches!(
            SimilarityMatrix::from_rows(vec![]),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            SimilarityMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]),
            Err(Error::NonSquareMatrix { rows: 2, cols: 1 })
        ));
        assert!(SimilarityMatrix::from_rows(vec![vec![f64::NAN]]).is_err());

        let m = SimilarityMatrix::from_rows(vec![vec![-2.0, -1.0], vec![-1.0, -3.0]]).unwrap();
        assert_eq!(m.preferences(), vec![-2.0, -3.0]);
    }

    #[test]
    fn preferences_are_validated() {
        let mut m = SimilarityMatrix::from_rows(vec![vec![0.0, -1.0], vec![-1.0, 0.0]]).unwrap();
        assert!(m.set_preference(f64::INFINITY).is_err());
        assert!(m.set_preferences(&[1.0]).is_err());
        m.set_preferences(&[-5.0, -6.0]).unwrap();
        assert_eq!(m.preferences(), vec![-5.0, -6.0]);
        m.set_preference(-7.0).unwrap();
        assert_eq!(m.preferences(), vec![-7.0, -7.0]);
    }

    #[test]
    fn uniform_off_diagonal_detection() {
        let m = SimilarityMatrix::from_rows(vec![vec![0.0, -1.0], vec![-1.0, 0.0]]).unwrap();
        assert_eq!(m.uniform_off_diagonal(), Some(-1.0));
        let data = vec![vec![0.0], vec![1.0], vec![3.0]];
        let m = SimilarityMatrix::from_points(&data, &NegSquaredEuclidean).unwrap();
        assert_eq!(m.uniform_off_diagonal(), None);
        let single = SimilarityMatrix::from_rows(vec![vec![0.0]]).unwrap();
        assert_eq!(single.uniform_off_diagonal(), None);
    }
}
