//! Prelude for commonly used types and traits in qt-miner.

pub use crate::data::{Dataset, DatasetView};
pub use crate::error::{QtError, Result};
pub use crate::formatters::{FormatterConfig, ReportFormatter};
pub use crate::logging::LogConfig;
pub use crate::mining::{run_clustering, ClusterSet, ClusteringOutcome, MinerConfig, QtMiner, Radius};
pub use crate::repository::{ClusterStore, StorageBackend};
pub use crate::session::Session;
