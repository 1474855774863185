//! The typed data model: attributes, values, records and datasets.
//!
//! Distances flow bottom-up: an [`Item`] knows how far its value is from
//! another value of the same attribute, a [`Tuple`] sums those distances over
//! its attributes, and the clustering engine only ever talks to a
//! [`DatasetView`].

pub mod attribute;
pub mod dataset;
pub mod item;
mod record_batch;
pub mod tuple;

pub use attribute::{Attribute, AttributeKind, Schema};
pub use dataset::{ColumnKind, ColumnSpec, Dataset, DatasetBuilder, DatasetView, RawValue};
pub use item::{Item, Value};
pub use tuple::Tuple;
