use thiserror::Error;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A precomputed similarity matrix is not N×N.
    #[error("similarity matrix must be square: {rows} rows, found a row of length {cols}")]
    NonSquareMatrix {
        /// Number of rows.
        rows: usize,
        /// Length of the offending row.
        cols: usize,
    },

    /// A line of an embedding file could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// Reading an embedding file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing a plot failed.
    #[error("render error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error rejects the clustering input itself (points, matrix, or parameters).
    ///
    /// Parsing, I/O and rendering failures happen outside the engine and return `false`.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::InvalidParameter { .. }
                | Error::DimensionMismatch { .. }
                | Error::NonSquareMatrix { .. }
        )
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
