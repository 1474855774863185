//! Error types for the QT clustering library.
//!
//! Every fallible operation in the crate reports a [`QtError`]. The variants
//! fall into four groups: data preconditions (`MissingValue`, `EmptySet`,
//! `TypeMismatch`, ...), algorithmic outcomes (`EmptyDataset`,
//! `RadiusTooLarge`), caller contract violations (`InvalidRadius`,
//! `InvalidName`, `NoDataset`, `NoResult`) and persistence failures (`Io`,
//! `CorruptData`). None of them are retried or recovered internally.

use thiserror::Error;

/// The main error type for the QT clustering library.
#[derive(Error, Debug)]
pub enum QtError {
    /// A record position holds no value where a distance or rendering needs one.
    #[error("Attribute '{attribute}' has no value")]
    MissingValue {
        /// Name of the attribute whose value is absent
        attribute: String,
    },

    /// An average distance was requested over zero record identifiers.
    #[error("Cannot average distances over an empty set of records")]
    EmptySet,

    /// Clustering was requested on a dataset without records.
    #[error("The dataset is empty")]
    EmptyDataset,

    /// The radius collapsed the whole dataset into the first cluster.
    #[error("Radius {radius} groups all {records} records into a single cluster")]
    RadiusTooLarge {
        /// The radius used for the run
        radius: f64,
        /// Number of records in the dataset
        records: usize,
    },

    /// The radius is NaN or negative.
    #[error("Invalid radius {0}: must be a non-negative number")]
    InvalidRadius(f64),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes could not be decoded into a clustering.
    #[error("Corrupt clustering data: {0}")]
    CorruptData(String),

    /// Two values or records of incompatible shape were combined.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Input data violates a structural rule of the dataset.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A numeric column has no non-null value to derive its range from.
    #[error("Numeric attribute '{attribute}' has no values to compute a range")]
    NoValue { attribute: String },

    /// A categorical column has no non-null value to derive its domain from.
    #[error("Categorical attribute '{attribute}' has an empty domain")]
    EmptyDomain { attribute: String },

    /// A record identifier lies outside the dataset.
    #[error("Record {index} is out of range for a dataset of {count} records")]
    RecordOutOfRange { index: usize, count: usize },

    /// An artifact name cannot be used as a storage key.
    #[error("Invalid artifact name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A session operation needs a dataset but none was stored.
    #[error("No dataset has been stored in this session")]
    NoDataset,

    /// A session operation needs a clustering result but none is available.
    #[error("No clustering result is available")]
    NoResult,

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from serialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, QtError>`.
pub type Result<T> = std::result::Result<T, QtError>;

impl QtError {
    /// Creates a missing value error for the named attribute.
    pub fn missing_value(attribute: impl Into<String>) -> Self {
        Self::MissingValue {
            attribute: attribute.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a corrupt data error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptData(message.into())
    }

    /// Creates an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Creates an invalid artifact name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors that stem from the stored bytes rather than the medium.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Self::CorruptData(_))
    }

    /// Returns true if the error reports a storage resource that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
