use crate::error::Result;

/// Common interface for hard clustering algorithms (one label per point).
pub trait Clustering {
    /// Fit the model and return one cluster id per input point.
    ///
    /// Ids are dense: `0..k` where `k` is the number of clusters found.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// The configured number of clusters (if applicable).
    ///
    /// For algorithms that discover the number of clusters dynamically (e.g. affinity
    /// propagation), this returns 0.
    fn n_clusters(&self) -> usize;
}
