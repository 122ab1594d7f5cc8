//! Input data: the bundled karate-club layout and whitespace embedding files.
//!
//! Embedding files look like this (the first line is a header and is skipped):
//!
//! ```text
//! 34 2
//! 1 464.19 359.62
//! 2 552.68 306.53
//! ```
//!
//! The first token of each row is an opaque node id; the next `dims` tokens are the
//! coordinates. Extra trailing tokens are ignored.

use std::path::Path;

use crate::error::{Error, Result};

/// Node positions of Zachary's karate-club graph in a 2-D layout.
const KARATE_LAYOUT: [[f32; 2]; 34] = [
    [464.198, 359.624],
    [552.681, 306.533],
    [567.218, 267.348],
    [653.174, 313.486],
    [512.864, 275.564],
    [531.825, 226.898],
    [469.886, 166.855],
    [400.363, 243.330],
    [410.475, 312.853],
    [378.242, 339.399],
    [381.402, 185.184],
    [367.497, 214.257],
    [330.840, 262.291],
    [269.533, 265.451],
    [298.606, 209.833],
    [275.221, 180.128],
    [237.300, 224.370],
    [198.114, 259.763],
    [128.591, 197.825],
    [141.232, 182.656],
    [191.794, 161.167],
    [204.434, 118.821],
    [244.252, 127.670],
    [182.313, 23.385],
    [237.300, 15.801],
    [194.322, 84.060],
    [119.111, 91.644],
    [61.596, 123.245],
    [9.770, 109.341],
    [39.475, 167.487],
    [24.307, 199.089],
    [35.051, 228.794],
    [55.276, 256.603],
    [95.094, 274.932],
];

/// The 34 two-dimensional karate-club coordinates, in node order.
pub fn karate_layout() -> Vec<Vec<f32>> {
    KARATE_LAYOUT.iter().map(|p| p.to_vec()).collect()
}

/// Parsed embedding rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Embeddings {
    /// Node ids, one per row, as written in the file.
    pub ids: Vec<String>,
    /// Coordinates, one point per row.
    pub points: Vec<Vec<f32>>,
}

impl Embeddings {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no rows were parsed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parse embedding text, keeping the first `dims` coordinates of each row.
pub fn parse_embeddings(text: &str, dims: usize) -> Result<Embeddings> {
    if dims == 0 {
        return Err(Error::InvalidParameter {
            name: "dims",
            message: "must be at least 1",
        });
    }

    let mut out = Embeddings::default();
    // Skip the header line.
    for (idx, line) in text.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(id) = tokens.next() else {
            continue;
        };

        let mut point = Vec::with_capacity(dims);
        for tok in tokens.take(dims) {
            let x: f32 = tok.parse().map_err(|_| Error::Parse {
                line: line_no,
                message: format!("invalid coordinate {tok:?}"),
            })?;
            if !x.is_finite() {
                return Err(Error::Parse {
                    line: line_no,
                    message: format!("non-finite coordinate {tok:?}"),
                });
            }
            point.push(x);
        }
        if point.len() != dims {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected {dims} coordinates, found {}", point.len()),
            });
        }

        out.ids.push(id.to_string());
        out.points.push(point);
    }

    tracing::debug!(rows = out.len(), dims, "parsed embeddings");
    Ok(out)
}

/// Read and parse an embedding file.
pub fn read_embeddings(path: impl AsRef<Path>, dims: usize) -> Result<Embeddings> {
    let text = std::fs::read_to_string(path)?;
    parse_embeddings(&text, dims)
}
