//! Exemplar-based clustering.
//!
//! ## Exemplars vs centroids
//!
//! K-means summarizes a cluster by a *centroid*: the mean of its members, which is
//! usually not one of the data points. Exemplar-based methods pick an actual data
//! point to represent each cluster. That only needs pairwise similarities, so the
//! similarity does not have to be a metric, or even symmetric.
//!
//! ## Affinity propagation
//!
//! Affinity propagation (Frey & Dueck, 2007) treats every point as a potential
//! exemplar and exchanges "responsibility" and "availability" messages between
//! pairs of points until a stable set of exemplars emerges. The number of clusters
//! is not given up front; it follows from the *preference* (the similarity of each
//! point to itself). Higher preferences give more clusters.
//!
//! **When to use**: small to medium datasets (the algorithm is O(n²) in time and
//! memory per round), unknown cluster count, or a similarity that is not a distance.
//!
//! ## Usage
//!
//! ```rust
//! use exemplar::cluster::{AffinityPropagation, Clustering};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 0.0],
//!     vec![10.0, 1.0],
//! ];
//!
//! let fit = AffinityPropagation::new()
//!     .with_preference(-10.0)
//!     .fit(&data)
//!     .unwrap();
//! assert_eq!(fit.n_clusters(), 2);
//! assert_eq!(fit.labels[0], fit.labels[1]);
//! assert_ne!(fit.labels[0], fit.labels[2]);
//!
//! // Dense cluster ids through the common trait.
//! let ids = AffinityPropagation::new()
//!     .with_preference(-10.0)
//!     .fit_predict(&data)
//!     .unwrap();
//! assert_eq!(ids, vec![0, 0, 1, 1]);
//! ```

mod affinity;
mod similarity;
mod traits;
mod util;

pub use affinity::{AffinityFit, AffinityParams, AffinityPropagation};
pub use similarity::{NegEuclidean, NegSquaredEuclidean, Similarity, SimilarityMatrix};
pub use traits::Clustering;
