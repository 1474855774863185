//! Materialized datasets and the read-only view the engine consumes.
//!
//! Acquiring rows (from SQL, files or the wire) is the caller's business.
//! This module turns already fetched rows into typed records: it derives the
//! numeric ranges and categorical domains the distance model needs, the same
//! way a relational loader would with `MIN`/`MAX`/`DISTINCT` queries.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::attribute::{Attribute, Schema};
use super::item::{Item, Value};
use super::tuple::Tuple;
use crate::error::{QtError, Result};

/// Read-only access to a dataset of records and its schema.
pub trait DatasetView {
    /// Number of records.
    fn record_count(&self) -> usize;

    /// The typed record at `index`, if it exists.
    fn record(&self, index: usize) -> Option<&Tuple>;

    /// Number of attributes in the schema.
    fn attribute_count(&self) -> usize;

    /// The attribute at `index`, if it exists.
    fn attribute(&self, index: usize) -> Option<&Attribute>;

    /// The raw value as loaded; used for display only.
    fn raw_value(&self, record: usize, attribute: usize) -> Option<&RawValue>;
}

/// An untyped cell as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Null => "null",
        }
    }

    /// Key used to detect duplicate rows; `f64` is not `Hash`.
    fn dedup_key(&self) -> String {
        match self {
            Self::Number(n) => format!("n:{}", n.to_bits()),
            Self::Text(t) => format!("t:{t}"),
            Self::Null => "null".to_string(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Declared type of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Categorical,
    Numeric,
}

impl ColumnKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Categorical => "categorical",
            Self::Numeric => "numeric",
        }
    }
}

/// Name and declared type of a source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
        }
    }
}

/// Collects raw rows and materializes them into a [`Dataset`].
///
/// # Examples
///
/// ```rust
/// use qt_miner::data::{ColumnSpec, Dataset, DatasetView, RawValue};
///
/// let data = Dataset::builder(vec![ColumnSpec::categorical("outlook"), ColumnSpec::numeric("temp")])
///     .row(vec![RawValue::from("sunny"), RawValue::from(30.0)])
///     .row(vec![RawValue::from("rain"), RawValue::from(12.5)])
///     .build()?;
/// assert_eq!(data.record_count(), 2);
/// # Ok::<(), qt_miner::error::QtError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<RawValue>>,
    distinct_rows: bool,
}

impl DatasetBuilder {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            distinct_rows: false,
        }
    }

    /// Appends one row; cells are matched to columns by position.
    pub fn row(mut self, values: Vec<RawValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Appends many rows.
    pub fn rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<RawValue>>,
    {
        self.rows.extend(rows);
        self
    }

    /// Drops repeated rows, keeping the first occurrence.
    pub fn distinct_rows(mut self, enabled: bool) -> Self {
        self.distinct_rows = enabled;
        self
    }

    /// Validates the rows, derives the schema and builds typed records.
    #[instrument(skip(self), fields(columns = self.columns.len(), rows = self.rows.len()))]
    pub fn build(self) -> Result<Dataset> {
        if self.columns.is_empty() {
            return Err(QtError::invalid_data("a dataset needs at least one column"));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(QtError::invalid_data(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }

        let mut rows = self.rows;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(QtError::invalid_data(format!(
                    "row {r} has {} values, expected {}",
                    row.len(),
                    self.columns.len()
                )));
            }
            for (column, value) in self.columns.iter().zip(row) {
                let ok = matches!(
                    (column.kind, value),
                    (_, RawValue::Null)
                        | (ColumnKind::Numeric, RawValue::Number(_))
                        | (ColumnKind::Categorical, RawValue::Text(_))
                );
                if !ok {
                    return Err(QtError::type_mismatch(
                        format!("{} value in column '{}'", column.kind.name(), column.name),
                        value.kind_name(),
                    ));
                }
                if let RawValue::Number(n) = value {
                    if !n.is_finite() {
                        return Err(QtError::invalid_data(format!(
                            "row {r} column '{}' holds non-finite value {n}",
                            column.name
                        )));
                    }
                }
            }
        }

        if self.distinct_rows {
            let before = rows.len();
            let mut keys = HashSet::new();
            rows.retain(|row| keys.insert(row.iter().map(RawValue::dedup_key).collect::<Vec<_>>()));
            debug!(before, after = rows.len(), "Dropped duplicate rows");
        }

        let attributes = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| derive_attribute(column, index, &rows))
            .collect::<Result<Vec<_>>>()?;
        let schema = Schema::new(attributes)?;

        let records = rows
            .iter()
            .map(|row| materialize(&schema, row))
            .collect::<Result<Vec<_>>>()?;

        debug!(records = records.len(), "Materialized dataset");
        Ok(Dataset {
            schema,
            rows,
            records,
        })
    }
}

fn derive_attribute(column: &ColumnSpec, index: usize, rows: &[Vec<RawValue>]) -> Result<Attribute> {
    match column.kind {
        ColumnKind::Numeric => {
            let mut range: Option<(f64, f64)> = None;
            for value in rows.iter().map(|row| &row[index]) {
                if let RawValue::Number(n) = value {
                    range = Some(match range {
                        Some((min, max)) => (min.min(*n), max.max(*n)),
                        None => (*n, *n),
                    });
                }
            }
            match range {
                Some((min, max)) => Attribute::numeric(&column.name, index, min, max),
                // An empty dataset has no range to observe; [0, 0] keeps it valid
                None if rows.is_empty() => Attribute::numeric(&column.name, index, 0.0, 0.0),
                None => Err(QtError::NoValue {
                    attribute: column.name.clone(),
                }),
            }
        }
        ColumnKind::Categorical => {
            let domain: BTreeSet<String> = rows
                .iter()
                .filter_map(|row| match &row[index] {
                    RawValue::Text(t) => Some(t.clone()),
                    _ => None,
                })
                .collect();
            if domain.is_empty() && !rows.is_empty() {
                return Err(QtError::EmptyDomain {
                    attribute: column.name.clone(),
                });
            }
            Ok(Attribute::categorical(&column.name, index, domain))
        }
    }
}

fn materialize(schema: &Schema, row: &[RawValue]) -> Result<Tuple> {
    let items = schema
        .iter()
        .zip(row)
        .map(|(attribute, raw)| {
            let value = match (attribute.is_numeric(), raw) {
                (true, RawValue::Number(n)) => Value::Numeric(Some(*n)),
                (true, _) => Value::Numeric(None),
                (false, RawValue::Text(t)) => Value::Categorical(Some(t.clone())),
                (false, _) => Value::Categorical(None),
            };
            Item::new(Arc::clone(attribute), value)
        })
        .collect::<Result<Vec<_>>>()?;
    Tuple::new(items)
}

/// An in-memory dataset: schema, raw rows and their typed records.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    rows: Vec<Vec<RawValue>>,
    records: Vec<Tuple>,
}

impl Dataset {
    pub fn builder(columns: Vec<ColumnSpec>) -> DatasetBuilder {
        DatasetBuilder::new(columns)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Tuple] {
        &self.records
    }

    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DatasetView for Dataset {
    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn record(&self, index: usize) -> Option<&Tuple> {
        self.records.get(index)
    }

    fn attribute_count(&self) -> usize {
        self.schema.len()
    }

    fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.schema.get(index).map(Arc::as_ref)
    }

    fn raw_value(&self, record: usize, attribute: usize) -> Option<&RawValue> {
        self.rows.get(record)?.get(attribute)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.schema.iter().map(|a| a.name()).collect();
        writeln!(f, "{}", names.join(","))?;
        for (i, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "{}: {}", i + 1, cells.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AttributeKind;

    fn weather() -> DatasetBuilder {
        Dataset::builder(vec![
            ColumnSpec::categorical("outlook"),
            ColumnSpec::numeric("temperature"),
        ])
        .row(vec!["sunny".into(), 30.0.into()])
        .row(vec!["rain".into(), 10.0.into()])
        .row(vec!["sunny".into(), 30.0.into()])
    }

    #[test]
    fn test_build_derives_schema() {
        let data = weather().build().unwrap();
        assert_eq!(data.record_count(), 3);
        assert_eq!(data.attribute_count(), 2);
        match data.attribute(1).unwrap().kind() {
            AttributeKind::Numeric { min, max } => {
                assert_eq!(*min, 10.0);
                assert_eq!(*max, 30.0);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(data.attribute(0).unwrap().distinct_values(), Some(2));
        assert_eq!(data.raw_value(1, 0), Some(&RawValue::from("rain")));
        assert!(data.raw_value(5, 0).is_none());
    }

    #[test]
    fn test_distinct_rows() {
        let data = weather().distinct_rows(true).build().unwrap();
        assert_eq!(data.record_count(), 2);
    }

    #[test]
    fn test_row_arity_checked() {
        let err = weather().row(vec!["sunny".into()]).build().unwrap_err();
        assert!(matches!(err, QtError::InvalidData(_)));
    }

    #[test]
    fn test_cell_type_checked() {
        let err = weather()
            .row(vec![RawValue::from(1.0), RawValue::from(2.0)])
            .build()
            .unwrap_err();
        assert!(matches!(err, QtError::TypeMismatch { .. }));
    }

    #[test]
    fn test_all_null_numeric_column() {
        let err = Dataset::builder(vec![ColumnSpec::numeric("n")])
            .row(vec![RawValue::Null])
            .build()
            .unwrap_err();
        assert!(matches!(err, QtError::NoValue { ref attribute } if attribute == "n"));
    }

    #[test]
    fn test_all_null_categorical_column() {
        let err = Dataset::builder(vec![ColumnSpec::categorical("c")])
            .row(vec![RawValue::Null])
            .build()
            .unwrap_err();
        assert!(matches!(err, QtError::EmptyDomain { .. }));
    }

    #[test]
    fn test_empty_dataset_is_buildable() {
        let data = Dataset::builder(vec![ColumnSpec::numeric("n")]).build().unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Dataset::builder(vec![ColumnSpec::numeric("n"), ColumnSpec::numeric("n")])
            .build()
            .unwrap_err();
        assert!(matches!(err, QtError::InvalidData(_)));
    }

    #[test]
    fn test_display() {
        let data = weather().build().unwrap();
        assert_eq!(
            data.to_string(),
            "outlook,temperature\n1: sunny,30\n2: rain,10\n3: sunny,30\n"
        );
    }
}
