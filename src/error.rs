use thiserror::Error;

/// Errors reported by the nearest-neighbour classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Prediction was requested before any distance records were accumulated.
    #[error("no distance records accumulated")]
    EmptyResultSet,

    /// The configured neighbour count exceeds the number of accumulated records.
    #[error("requested {requested} neighbours but only {available} records are available")]
    InsufficientNeighbours { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
