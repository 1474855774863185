//! Attribute schema: the kind and value space of each dataset column.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{QtError, Result};

/// The value space of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeKind {
    /// A finite, sorted domain of string values.
    Categorical { domain: BTreeSet<String> },
    /// A closed real range observed in the dataset.
    Numeric { min: f64, max: f64 },
}

impl AttributeKind {
    /// Short name of the kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Categorical { .. } => "categorical",
            Self::Numeric { .. } => "numeric",
        }
    }
}

/// A named, positioned column of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    index: usize,
    #[serde(flatten)]
    kind: AttributeKind,
}

impl Attribute {
    /// Creates a categorical attribute over the given domain.
    pub fn categorical<I, S>(name: impl Into<String>, index: usize, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            index,
            kind: AttributeKind::Categorical {
                domain: domain.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Creates a numeric attribute over `[min, max]`.
    ///
    /// Fails when a bound is not finite or `max < min`.
    pub fn numeric(name: impl Into<String>, index: usize, min: f64, max: f64) -> Result<Self> {
        let name = name.into();
        if !min.is_finite() || !max.is_finite() {
            return Err(QtError::invalid_data(format!(
                "numeric attribute '{name}' has non-finite bounds [{min}, {max}]"
            )));
        }
        if max < min {
            return Err(QtError::invalid_data(format!(
                "numeric attribute '{name}' has max {max} below min {min}"
            )));
        }
        Ok(Self {
            name,
            index,
            kind: AttributeKind::Numeric { min, max },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric { .. })
    }

    /// Number of distinct domain values; `None` for numeric attributes.
    pub fn distinct_values(&self) -> Option<usize> {
        match &self.kind {
            AttributeKind::Categorical { domain } => Some(domain.len()),
            AttributeKind::Numeric { .. } => None,
        }
    }

    /// Normalizes `value` into `[0, 1]` using the observed range.
    ///
    /// A degenerate range (`min == max`) scales every value to 0. Values
    /// outside the range are not clamped. Categorical attributes have no
    /// scale and return `None`.
    pub fn scale(&self, value: f64) -> Option<f64> {
        match self.kind {
            AttributeKind::Numeric { min, max } => {
                let span = max - min;
                if span == 0.0 {
                    Some(0.0)
                } else {
                    Some((value - min) / span)
                }
            }
            AttributeKind::Categorical { .. } => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The ordered attribute list of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    attributes: Vec<Arc<Attribute>>,
}

impl Schema {
    /// Builds a schema, checking that every attribute sits at its own index.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        for (position, attribute) in attributes.iter().enumerate() {
            if attribute.index() != position {
                return Err(QtError::invalid_data(format!(
                    "attribute '{}' declares index {} but sits at position {position}",
                    attribute.name(),
                    attribute.index()
                )));
            }
        }
        Ok(Self {
            attributes: attributes.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Attribute>> {
        self.attributes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Attribute>> {
        self.attributes.iter()
    }

    /// Looks an attribute up by name.
    pub fn find(&self, name: &str) -> Option<&Arc<Attribute>> {
        self.attributes.iter().find(|a| a.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_domain_is_sorted_and_distinct() {
        let attr = Attribute::categorical("outlook", 0, ["sunny", "overcast", "rain", "sunny"]);
        match attr.kind() {
            AttributeKind::Categorical { domain } => {
                let values: Vec<_> = domain.iter().map(String::as_str).collect();
                assert_eq!(values, vec!["overcast", "rain", "sunny"]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(attr.distinct_values(), Some(3));
        assert_eq!(attr.to_string(), "outlook");
    }

    #[test]
    fn test_numeric_rejects_inverted_range() {
        assert!(matches!(
            Attribute::numeric("temperature", 1, 10.0, 5.0),
            Err(QtError::InvalidData(_))
        ));
        assert!(Attribute::numeric("temperature", 1, f64::NAN, 5.0).is_err());
    }

    #[test]
    fn test_scale_in_range() {
        let attr = Attribute::numeric("temperature", 0, 10.0, 30.0).unwrap();
        assert_eq!(attr.scale(10.0), Some(0.0));
        assert_eq!(attr.scale(20.0), Some(0.5));
        assert_eq!(attr.scale(30.0), Some(1.0));
    }

    #[test]
    fn test_scale_out_of_range_is_not_clamped() {
        let attr = Attribute::numeric("temperature", 0, 0.0, 10.0).unwrap();
        assert_eq!(attr.scale(20.0), Some(2.0));
        assert_eq!(attr.scale(-10.0), Some(-1.0));
    }

    #[test]
    fn test_scale_degenerate_range_is_zero() {
        let attr = Attribute::numeric("constant", 0, 4.0, 4.0).unwrap();
        assert_eq!(attr.scale(4.0), Some(0.0));
        assert_eq!(attr.scale(100.0), Some(0.0));
    }

    #[test]
    fn test_schema_rejects_misplaced_index() {
        let attrs = vec![
            Attribute::categorical("a", 0, ["x"]),
            Attribute::categorical("b", 2, ["y"]),
        ];
        assert!(Schema::new(attrs).is_err());
    }

    #[test]
    fn test_schema_lookup() {
        let schema = Schema::new(vec![
            Attribute::categorical("a", 0, ["x"]),
            Attribute::numeric("b", 1, 0.0, 1.0).unwrap(),
        ])
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.find("b").map(|a| a.index()), Some(1));
        assert!(schema.find("c").is_none());
    }
}
