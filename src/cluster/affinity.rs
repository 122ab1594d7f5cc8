//! Affinity propagation: clustering by passing messages between data points.
//!
//! # The Algorithm (Frey & Dueck, 2007)
//!
//! Every point is a candidate *exemplar*. Points exchange two kinds of messages
//! until a stable set of exemplars emerges:
//!
//! - **Responsibility** `r(i, k)`, sent from `i` to candidate `k`: how well-suited
//!   `k` is to serve as the exemplar for `i`, compared with the best alternative.
//! - **Availability** `a(i, k)`, sent from candidate `k` to `i`: how appropriate it
//!   would be for `i` to pick `k`, given the support `k` gets from other points.
//!
//! ```text
//! r(i, k) = s(i, k) - max_{k' != k} { a(i, k') + s(i, k') }
//! a(i, k) = min(0, r(k, k) + Σ_{i' ∉ {i, k}} max(0, r(i', k)))     (i != k)
//! a(k, k) = Σ_{i' != k} max(0, r(i', k))
//! ```
//!
//! Both updates are damped: `m ← λ·m_old + (1 - λ)·m_new`. Point `k` is an exemplar
//! when `a(k, k) + r(k, k) > 0`.
//!
//! ## Convergence
//!
//! The run stops once the exemplar set has been non-empty and unchanged for
//! `convergence_window` consecutive rounds, or when `max_iterations` is reached. The
//! latter is reported through [`AffinityFit::converged`], not as an error.
//!
//! ## Preference
//!
//! The diagonal `s(k, k)` is the preference. Higher preferences give more clusters.
//! The default is the median of the off-diagonal similarities, which yields a moderate
//! number of clusters.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) per round.
//! - **Space**: O(n²) for the three matrices.
//!
//! ## References
//!
//! Frey, B. J., Dueck, D. (2007). "Clustering by Passing Messages Between Data Points."
//! Science 315(5814), 972-976.

use rand::prelude::*;

use super::similarity::{NegSquaredEuclidean, Similarity, SimilarityMatrix};
use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};

/// Relative size of the seeded jitter added to similarities to break exact ties.
///
/// Much larger than machine epsilon: uniform noise of a few ulps mostly rounds away,
/// while `1e-10 * |s|` always separates otherwise identical entries and stays far below
/// any difference that matters for clustering.
const JITTER_SCALE: f64 = 1e-10;

/// Affinity propagation parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AffinityParams {
    /// Preference broadcast to every diagonal entry of the similarity matrix.
    ///
    /// `None` uses the median of the off-diagonal similarities. For
    /// [`AffinityPropagation::fit_precomputed`], `None` keeps the supplied diagonal.
    pub preference: Option<f64>,

    /// Damping factor λ in `(0, 1)`. Higher values move more slowly but oscillate less.
    pub damping: f64,

    /// Hard cap on message-passing rounds.
    pub max_iterations: usize,

    /// Rounds the exemplar set must stay unchanged to declare convergence.
    pub convergence_window: usize,

    /// Seed for the tiny jitter that breaks exact ties between symmetric points.
    ///
    /// `None` disables the jitter. Perfectly symmetric inputs may then oscillate.
    pub seed: Option<u64>,
}

impl Default for AffinityParams {
    fn default() -> Self {
        Self {
            preference: None,
            damping: 0.5,
            max_iterations: 200,
            convergence_window: 15,
            seed: Some(0),
        }
    }
}

impl AffinityParams {
    fn validate(&self) -> Result<()> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(Error::InvalidParameter {
                name: "damping",
                message: "must be in (0, 1)",
            });
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1",
            });
        }
        if self.convergence_window == 0 {
            return Err(Error::InvalidParameter {
                name: "convergence_window",
                message: "must be at least 1",
            });
        }
        if let Some(p) = self.preference {
            if !p.is_finite() {
                return Err(Error::InvalidParameter {
                    name: "preference",
                    message: "must be finite",
                });
            }
        }
        Ok(())
    }
}

/// Affinity propagation clustering.
///
/// Generic over the [`Similarity`] used to build the similarity matrix; the default is
/// negative squared Euclidean distance.
#[derive(Clone)]
pub struct AffinityPropagation<S = NegSquaredEuclidean> {
    params: AffinityParams,
    similarity: S,
}

impl AffinityPropagation {
    /// Create a clusterer with default parameters.
    ///
    /// Defaults: median preference, `damping = 0.5`, `max_iterations = 200`,
    /// `convergence_window = 15`, jitter seed `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clusterer from a parameter set.
    pub fn from_params(params: AffinityParams) -> Self {
        Self {
            params,
            similarity: NegSquaredEuclidean,
        }
    }
}

impl Default for AffinityPropagation {
    fn default() -> Self {
        Self::from_params(AffinityParams::default())
    }
}

impl<S> std::fmt::Debug for AffinityPropagation<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffinityPropagation")
            .field("params", &self.params)
            .field("similarity", &std::any::type_name::<S>())
            .finish()
    }
}

impl<S: Similarity> AffinityPropagation<S> {
    /// Set a uniform preference (diagonal of the similarity matrix).
    pub fn with_preference(mut self, preference: f64) -> Self {
        self.params.preference = Some(preference);
        self
    }

    /// Set the damping factor λ.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.params.damping = damping;
        self
    }

    /// Set the maximum number of rounds.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.params.max_iterations = max_iterations;
        self
    }

    /// Set how many unchanged rounds count as convergence.
    pub fn with_convergence_window(mut self, convergence_window: usize) -> Self {
        self.params.convergence_window = convergence_window;
        self
    }

    /// Set (or disable, with `None`) the tie-breaking jitter seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.params.seed = seed;
        self
    }

    /// Replace the similarity function.
    pub fn with_similarity<T: Similarity>(self, similarity: T) -> AffinityPropagation<T> {
        AffinityPropagation {
            params: self.params,
            similarity,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &AffinityParams {
        &self.params
    }

    /// Cluster `data`, returning exemplars, labels and the convergence flag.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<AffinityFit> {
        self.params.validate()?;
        let mut s = SimilarityMatrix::from_points(data, &self.similarity)?;
        if let Some(preference) = self.resolve_preference(&s) {
            s.set_preference(preference)?;
        }
        Ok(self.propagate(s))
    }

    /// The configured preference, or the median off-diagonal similarity.
    fn resolve_preference(&self, s: &SimilarityMatrix) -> Option<f64> {
        let preference = self.params.preference.or_else(|| s.median_off_diagonal());
        tracing::debug!(
            ?preference,
            from_median = self.params.preference.is_none(),
            "preference resolved"
        );
        preference
    }

    /// Cluster from a precomputed similarity matrix.
    ///
    /// A configured preference overwrites the diagonal; otherwise the diagonal is used
    /// as supplied.
    pub fn fit_precomputed(&self, similarities: &SimilarityMatrix) -> Result<AffinityFit> {
        self.params.validate()?;
        let mut s = similarities.clone();
        if let Some(preference) = self.params.preference {
            s.set_preference(preference)?;
        }
        Ok(self.propagate(s))
    }

    fn propagate(&self, mut s: SimilarityMatrix) -> AffinityFit {
        let n = s.n();
        tracing::debug!(
            n,
            preference = s.get(0, 0),
            damping = self.params.damping,
            max_iterations = self.params.max_iterations,
            convergence_window = self.params.convergence_window,
            "affinity propagation start"
        );

        if n == 1 {
            return AffinityFit::single();
        }
        if let Some(fit) = degenerate_fit(&s) {
            tracing::debug!(
                n_clusters = fit.exemplars.len(),
                "all similarities and preferences equal; skipping message passing"
            );
            return fit;
        }
        if let Some(seed) = self.params.seed {
            jitter(s.as_mut_slice(), seed);
        }

        let lambda = self.params.damping;
        let s = s.as_slice();
        let mut r = vec![0.0; n * n];
        let mut a = vec![0.0; n * n];

        let mut previous: Vec<bool> = Vec::new();
        let mut stable_rounds = 0;
        let mut converged = false;
        let mut n_iter = 0;

        while n_iter < self.params.max_iterations {
            n_iter += 1;
            update_responsibilities(s, &a, &mut r, n, lambda);
            update_availabilities(&r, &mut a, n, lambda);

            let current: Vec<bool> = (0..n)
                .map(|k| a[k * n + k] + r[k * n + k] > 0.0)
                .collect();
            let n_exemplars = current.iter().filter(|&&e| e).count();
            if current == previous {
                stable_rounds += 1;
            } else {
                stable_rounds = 1;
                previous = current;
            }
            tracing::trace!(iteration = n_iter, n_exemplars, stable_rounds, "round");

            if n_exemplars > 0 && stable_rounds >= self.params.convergence_window {
                converged = true;
                break;
            }
        }

        if converged {
            tracing::debug!(n_iter, "affinity propagation converged");
        } else {
            tracing::warn!(
                n_iter,
                "affinity propagation did not converge; returning the last exemplar set"
            );
        }

        let evidence = |i: usize, k: usize| a[i * n + k] + r[i * n + k];
        let mut exemplars: Vec<usize> = (0..n).filter(|&k| evidence(k, k) > 0.0).collect();
        if exemplars.is_empty() {
            let fallback = fallback_exemplar(s, n, &evidence);
            tracing::warn!(
                exemplar = fallback,
                "no point has positive self-evidence; using the highest-preference point"
            );
            exemplars.push(fallback);
        }

        let labels = assign_labels(n, &exemplars, &evidence);
        AffinityFit {
            exemplars,
            labels,
            converged,
            n_iter,
        }
    }
}

impl<S: Similarity> Clustering for AffinityPropagation<S> {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        self.fit(data)?.cluster_ids()
    }

    /// Affinity propagation discovers the number of clusters, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// `r(i, k) = s(i, k) - max_{k' != k} (a(i, k') + s(i, k'))`, damped into `r`.
fn update_responsibilities(s: &[f64], a: &[f64], r: &mut [f64], n: usize, lambda: f64) {
    for i in 0..n {
        let row = i * n;

        // Track the best and second-best a + s so the "max over k' != k" is O(1) per k.
        let mut best = f64::NEG_INFINITY;
        let mut best_k = 0;
        let mut second = f64::NEG_INFINITY;
        for k in 0..n {
            let v = a[row + k] + s[row + k];
            if v > best {
                second = best;
                best = v;
                best_k = k;
            } else if v > second {
                second = v;
            }
        }

        for k in 0..n {
            let competitor = if k == best_k { second } else { best };
            let fresh = s[row + k] - competitor;
            r[row + k] = lambda * r[row + k] + (1.0 - lambda) * fresh;
        }
    }
}

/// Availabilities from the just-updated responsibilities, damped into `a`.
fn update_availabilities(r: &[f64], a: &mut [f64], n: usize, lambda: f64) {
    for k in 0..n {
        let support: f64 = (0..n)
            .filter(|&i| i != k)
            .map(|i| r[i * n + k].max(0.0))
            .sum();
        let self_r = r[k * n + k];

        for i in 0..n {
            let fresh = if i == k {
                support
            } else {
                (self_r + support - r[i * n + k].max(0.0)).min(0.0)
            };
            let idx = i * n + k;
            a[idx] = lambda * a[idx] + (1.0 - lambda) * fresh;
        }
    }
}

/// Every point picks the exemplar with the largest `a + r`; exemplars pick themselves.
fn assign_labels(
    n: usize,
    exemplars: &[usize],
    evidence: &impl Fn(usize, usize) -> f64,
) -> Vec<usize> {
    (0..n)
        .map(|i| {
            if exemplars.binary_search(&i).is_ok() {
                return i;
            }
            util::argmax_by(exemplars.iter().copied(), |k| evidence(i, k))
                .unwrap_or(exemplars[0])
        })
        .collect()
}

/// Highest preference, then larger self-evidence, then lowest index.
fn fallback_exemplar(s: &[f64], n: usize, evidence: &impl Fn(usize, usize) -> f64) -> usize {
    let mut best = 0;
    for k in 1..n {
        let (pk, pb) = (s[k * n + k], s[best * n + best]);
        if pk > pb || (pk == pb && evidence(k, k) > evidence(best, best)) {
            best = k;
        }
    }
    best
}

/// Closed-form result when every similarity and every preference is identical.
///
/// Message passing cannot break that symmetry. Each point is its own exemplar when
/// the preference beats the shared similarity; otherwise everything joins point 0.
fn degenerate_fit(s: &SimilarityMatrix) -> Option<AffinityFit> {
    let shared = s.uniform_off_diagonal()?;
    let prefs = s.preferences();
    let preference = prefs[0];
    if prefs.iter().any(|&p| p != preference) {
        return None;
    }

    let n = s.n();
    let (exemplars, labels) = if preference > shared {
        ((0..n).collect(), (0..n).collect())
    } else {
        (vec![0], vec![0; n])
    };
    Some(AffinityFit {
        exemplars,
        labels,
        converged: true,
        n_iter: 0,
    })
}

fn jitter(values: &mut [f64], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for v in values.iter_mut() {
        let scale = v.abs() * JITTER_SCALE + f64::MIN_POSITIVE * 100.0;
        *v += scale * (rng.random::<f64>() - 0.5);
    }
}

/// Result of one affinity propagation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffinityFit {
    /// Exemplar point indices, ascending. Never empty.
    pub exemplars: Vec<usize>,

    /// For each point, the index of its exemplar. Always a member of `exemplars`.
    pub labels: Vec<usize>,

    /// `false` when the run hit `max_iterations` before the exemplar set settled.
    pub converged: bool,

    /// Number of message-passing rounds executed.
    pub n_iter: usize,
}

impl AffinityFit {
    fn single() -> Self {
        Self {
            exemplars: vec![0],
            labels: vec![0],
            converged: true,
            n_iter: 0,
        }
    }

    /// Number of clusters (exemplars).
    pub fn n_clusters(&self) -> usize {
        self.exemplars.len()
    }

    /// Check that this fit describes `n` points: exemplars are ascending in-range
    /// indices that label themselves, and every label is an exemplar.
    ///
    /// Fits returned by [`AffinityPropagation`] always pass; hand-built or deserialized
    /// ones may not.
    pub fn check(&self, n: usize) -> Result<()> {
        if self.labels.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: self.labels.len(),
            });
        }
        if self.exemplars.is_empty() {
            return Err(Error::EmptyInput);
        }
        let ascending = self.exemplars.windows(2).all(|w| w[0] < w[1]);
        if !ascending || self.exemplars.iter().any(|&k| k >= n) {
            return Err(Error::InvalidParameter {
                name: "exemplars",
                message: "must be ascending point indices",
            });
        }
        let self_labeled = self.exemplars.iter().all(|&k| self.labels[k] == k);
        let labels_ok = self
            .labels
            .iter()
            .all(|l| self.exemplars.binary_search(l).is_ok());
        if !self_labeled || !labels_ok {
            return Err(Error::InvalidParameter {
                name: "labels",
                message: "must be exemplar indices, with each exemplar labeling itself",
            });
        }
        Ok(())
    }

    /// Labels as dense cluster ids `0..k`, in exemplar order.
    pub fn cluster_ids(&self) -> Result<Vec<usize>> {
        self.check(self.labels.len())?;
        Ok(self
            .labels
            .iter()
            .filter_map(|l| self.exemplars.binary_search(l).ok())
            .collect())
    }

    /// Points assigned to `exemplar`, including the exemplar itself.
    pub fn members(&self, exemplar: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == exemplar)
            .map(|(i, _)| i)
            .collect()
    }

    /// `(point, exemplar)` pairs for every point that is not itself an exemplar.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.labels
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, l)| i != l)
    }

    /// Coordinates of the exemplars, in exemplar order.
    pub fn centers(&self, data: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        self.check(data.len())?;
        Ok(self.exemplars.iter().map(|&k| data[k].clone()).collect())
    }

    /// Assign each query point to the most similar exemplar of `data`.
    ///
    /// Returns exemplar indices into `data`. Ties go to the lowest exemplar index.
    pub fn predict<S: Similarity + ?Sized>(
        &self,
        data: &[Vec<f32>],
        queries: &[Vec<f32>],
        similarity: &S,
    ) -> Result<Vec<usize>> {
        let centers = self.centers(data)?;
        let d = match centers.first() {
            Some(c) => c.len(),
            None => return Err(Error::EmptyInput),
        };
        let mut out = Vec::with_capacity(queries.len());
        for q in queries {
            if q.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: q.len(),
                });
            }
            let best = util::argmax_by(0..centers.len(), |c| similarity.similarity(q, &centers[c]))
                .unwrap_or(0);
            out.push(self.exemplars[best]);
        }
        Ok(out)
    }
}
