pub mod error;
pub mod k_nearest;
pub mod metric;

pub use error::{Error, Result};
pub use k_nearest::{DistanceRecord, FeaturePoint, KNNClassifier, KNNConfig, Selection};
pub use metric::Metric;
