//! # qt-miner - Quality Threshold clustering for Rust
//!
//! qt-miner partitions a table of mixed categorical and numeric records into
//! clusters whose members all lie within a fixed radius of a centroid record.
//! It keeps the clusters in a deterministic order, renders them for people
//! and programs, and persists them so a clustering can be reloaded later
//! without the data it came from.
//!
//! ## Quick Start
//!
//! ```rust
//! use qt_miner::prelude::*;
//! use qt_miner::data::{ColumnSpec, Dataset};
//!
//! let data = Dataset::builder(vec![ColumnSpec::numeric("x"), ColumnSpec::numeric("y")])
//!     .row(vec![0.0.into(), 0.0.into()])
//!     .row(vec![0.0.into(), 1.0.into()])
//!     .row(vec![10.0.into(), 10.0.into()])
//!     .row(vec![10.0.into(), 11.0.into()])
//!     .build()?;
//!
//! let outcome = run_clustering(&data, 1.5)?;
//! assert_eq!(outcome.cluster_count, 2);
//! print!("{}", outcome.clusters.render_with(&data)?);
//! # Ok::<(), QtError>(())
//! ```
//!
//! ## Distance
//!
//! The distance between two records is the sum over attributes of:
//!
//! - **Categorical**: 0 when the values are equal, 1 otherwise
//! - **Numeric**: the absolute difference of both values scaled into `[0, 1]`
//!   by the attribute's observed range. A range with `min == max` scales every
//!   value to 0.
//!
//! An absent value never counts as 0: it aborts the run with
//! [`QtError::MissingValue`](error::QtError::MissingValue).
//!
//! ## Algorithm
//!
//! Each round builds a candidate around every unclustered record, keeps the
//! largest one (the lowest record index wins ties) and removes its members
//! from play. The worst case is cubic in the number of records. A radius
//! that puts every record into the very first cluster is reported as
//! [`QtError::RadiusTooLarge`](error::QtError::RadiusTooLarge).
//!
//! ## Architecture
//!
//! - **`data`**: attributes, typed values, records and the [`DatasetView`](data::DatasetView) seam
//! - **`mining`**: clusters, the ordered cluster collection and the engine
//! - **`repository`**: storage backends and the clustering codec
//! - **`formatters`**: human and JSON reports
//! - **`session`**: per-client state (current table, last result)
//! - **`logging`**: tracing configuration

pub mod data;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod mining;
pub mod prelude;
pub mod repository;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
