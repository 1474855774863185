//! Typed values and the per-attribute distance function.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::attribute::{Attribute, AttributeKind};
use crate::error::{QtError, Result};

/// A concrete value of one attribute; `None` means the value is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Categorical(Option<String>),
    Numeric(Option<f64>),
}

impl Value {
    /// Short name of the kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Categorical(_) => "categorical",
            Self::Numeric(_) => "numeric",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Categorical(None) | Self::Numeric(None))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categorical(Some(v)) => f.write_str(v),
            Self::Numeric(Some(v)) => write!(f, "{v}"),
            Self::Categorical(None) | Self::Numeric(None) => f.write_str("?"),
        }
    }
}

/// An attribute paired with one of its values.
#[derive(Debug, Clone)]
pub struct Item {
    attribute: Arc<Attribute>,
    value: Value,
}

impl Item {
    /// Pairs `value` with `attribute`, rejecting a value of the wrong kind.
    pub fn new(attribute: Arc<Attribute>, value: Value) -> Result<Self> {
        let compatible = matches!(
            (attribute.kind(), &value),
            (AttributeKind::Categorical { .. }, Value::Categorical(_))
                | (AttributeKind::Numeric { .. }, Value::Numeric(_))
        );
        if !compatible {
            return Err(QtError::type_mismatch(
                attribute.kind().name(),
                value.kind_name(),
            ));
        }
        Ok(Self { attribute, value })
    }

    pub fn categorical(attribute: Arc<Attribute>, value: Option<String>) -> Result<Self> {
        Self::new(attribute, Value::Categorical(value))
    }

    pub fn numeric(attribute: Arc<Attribute>, value: Option<f64>) -> Result<Self> {
        Self::new(attribute, Value::Numeric(value))
    }

    pub fn attribute(&self) -> &Arc<Attribute> {
        &self.attribute
    }

    /// Returns the stored value, failing with `MissingValue` when absent.
    pub fn value(&self) -> Result<&Value> {
        if self.value.is_missing() {
            Err(QtError::missing_value(self.attribute.name()))
        } else {
            Ok(&self.value)
        }
    }

    /// The stored value, present or not.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// Distance between this item and `other`.
    ///
    /// Categorical values are 0 apart when equal and 1 otherwise. Numeric
    /// values are compared on the receiver's scale, so the result lies in
    /// `[0, 1]` for values inside the observed range.
    pub fn distance(&self, other: &Item) -> Result<f64> {
        match (self.value()?, other.value()?) {
            (Value::Categorical(Some(a)), Value::Categorical(Some(b))) => {
                Ok(if a == b { 0.0 } else { 1.0 })
            }
            (Value::Numeric(Some(a)), Value::Numeric(Some(b))) => {
                let (a, b) = (
                    self.scaled(*a, other.attribute.name())?,
                    self.scaled(*b, other.attribute.name())?,
                );
                Ok((a - b).abs())
            }
            (mine, theirs) => Err(QtError::type_mismatch(
                mine.kind_name(),
                theirs.kind_name(),
            )),
        }
    }

    fn scaled(&self, value: f64, other_name: &str) -> Result<f64> {
        self.attribute.scale(value).ok_or_else(|| {
            QtError::type_mismatch(
                format!("numeric attribute for '{other_name}'"),
                self.attribute.kind().name(),
            )
        })
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.attribute.name() == other.attribute.name() && self.value == other.value
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
