//! Quality Threshold clustering over a [`DatasetView`](crate::data::DatasetView).
//!
//! ## Overview
//!
//! - **[`QtMiner`]**: the greedy engine and its run state machine
//! - **[`Cluster`]**: a centroid record plus member ids
//! - **[`ClusterSet`]**: the ordered result collection
//! - **[`MinerConfig`]** / **[`Radius`]**: run configuration
//!
//! ## Example
//!
//! ```rust
//! use qt_miner::data::{ColumnSpec, Dataset};
//! use qt_miner::mining::run_clustering;
//!
//! let data = Dataset::builder(vec![ColumnSpec::categorical("color")])
//!     .row(vec!["red".into()])
//!     .row(vec!["blue".into()])
//!     .build()?;
//!
//! let outcome = run_clustering(&data, 0.5)?;
//! println!("{}", outcome.clusters.render_with(&data)?);
//! # Ok::<(), qt_miner::error::QtError>(())
//! ```

mod cluster;
mod cluster_set;
mod config;
mod miner;

pub use cluster::{Cluster, ClusterKey};
pub use cluster_set::{ClusterIter, ClusterSet, InsertOutcome};
pub use config::{CollisionPolicy, MinerConfig, Radius};
pub use miner::{run_clustering, ClusteringOutcome, QtMiner, RunState};
