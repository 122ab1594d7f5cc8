//! Affinity propagation clustering.
//!
//! `exemplar` clusters dense vectors by picking representative data points
//! (exemplars) through message passing, without fixing the number of clusters.
//!
//! - [`cluster`]: the affinity propagation engine, similarity functions, and the
//!   [`Clustering`] trait.
//! - [`dataset`]: the bundled karate-club layout and a reader for whitespace
//!   embedding files.
//! - `render` (feature `plot`): SVG scatter plots of a dataset and its clustering.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod dataset;
pub mod error;
#[cfg(feature = "plot")]
pub mod render;

pub use cluster::{
    AffinityFit, AffinityParams, AffinityPropagation, Clustering, NegEuclidean,
    NegSquaredEuclidean, Similarity, SimilarityMatrix,
};
pub use error::{Error, Result};
