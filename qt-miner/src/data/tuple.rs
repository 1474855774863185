//! Records: one typed value per attribute, in schema order.

use std::fmt;

use super::dataset::DatasetView;
use super::item::{Item, Value};
use crate::error::{QtError, Result};

/// An immutable record of typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    items: Vec<Item>,
}

impl Tuple {
    /// Builds a record, checking that each item belongs to its position.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        for (position, item) in items.iter().enumerate() {
            if item.attribute().index() != position {
                return Err(QtError::invalid_data(format!(
                    "item for attribute '{}' (index {}) placed at position {position}",
                    item.attribute().name(),
                    item.attribute().index()
                )));
            }
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// The raw values in attribute order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.items.iter().map(Item::raw)
    }

    /// Sum of per-attribute distances to `other`.
    pub fn distance(&self, other: &Tuple) -> Result<f64> {
        if self.len() != other.len() {
            return Err(QtError::type_mismatch(
                format!("record of {} values", self.len()),
                format!("record of {} values", other.len()),
            ));
        }
        self.items
            .iter()
            .zip(&other.items)
            .try_fold(0.0, |sum, (mine, theirs)| Ok(sum + mine.distance(theirs)?))
    }

    /// Mean distance from this record to the records `ids` of `view`.
    pub fn avg_distance<V, I>(&self, view: &V, ids: I) -> Result<f64>
    where
        V: DatasetView + ?Sized,
        I: IntoIterator<Item = usize>,
    {
        let mut sum = 0.0;
        let mut count = 0usize;
        for id in ids {
            let record = view.record(id).ok_or(QtError::RecordOutOfRange {
                index: id,
                count: view.record_count(),
            })?;
            sum += self.distance(record)?;
            count += 1;
        }
        if count == 0 {
            return Err(QtError::EmptySet);
        }
        Ok(sum / count as f64)
    }

    /// Space-separated value string; orders clusters with equal sizes.
    pub fn rendered(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnSpec, Dataset, RawValue};

    fn two_numeric() -> Dataset {
        Dataset::builder(vec![ColumnSpec::numeric("x"), ColumnSpec::numeric("y")])
            .row(vec![RawValue::from(0.0), RawValue::from(0.0)])
            .row(vec![RawValue::from(10.0), RawValue::from(5.0)])
            .row(vec![RawValue::from(10.0), RawValue::from(10.0)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_distance_sums_positions() {
        let data = two_numeric();
        let d = data.record(0).unwrap().distance(data.record(1).unwrap()).unwrap();
        assert!((d - 1.5).abs() < 1e-12);
        assert_eq!(data.record(2).unwrap().distance(data.record(2).unwrap()).unwrap(), 0.0);
    }

    #[test]
    fn test_avg_distance() {
        let data = two_numeric();
        let origin = data.record(0).unwrap();
        let avg = origin.avg_distance(&data, [0, 1, 2]).unwrap();
        assert!((avg - (0.0 + 1.5 + 2.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_avg_distance_empty_set() {
        let data = two_numeric();
        let origin = data.record(0).unwrap();
        assert!(matches!(
            origin.avg_distance(&data, std::iter::empty()),
            Err(QtError::EmptySet)
        ));
    }

    #[test]
    fn test_avg_distance_out_of_range() {
        let data = two_numeric();
        let origin = data.record(0).unwrap();
        assert!(matches!(
            origin.avg_distance(&data, [7]),
            Err(QtError::RecordOutOfRange { index: 7, count: 3 })
        ));
    }

    #[test]
    fn test_rendered() {
        let data = Dataset::builder(vec![ColumnSpec::categorical("c"), ColumnSpec::numeric("n")])
            .row(vec![RawValue::from("sunny"), RawValue::from(2.5)])
            .row(vec![RawValue::Null, RawValue::from(1.0)])
            .build()
            .unwrap();
        assert_eq!(data.record(0).unwrap().rendered(), "sunny 2.5");
        assert_eq!(data.record(1).unwrap().rendered(), "? 1");
    }
}
