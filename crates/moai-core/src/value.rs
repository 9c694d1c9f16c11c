//! Host values that flow through model compilation.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An element of a set, and one position of an index tuple.
///
/// Sets hold either strings or integers. Ordering is only meaningful
/// between elements of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexValue {
    /// Integer element.
    Int(i64),
    /// String element.
    Str(String),
}

impl IndexValue {
    /// Returns true if this is an integer element.
    pub fn is_int(&self) -> bool {
        matches!(self, IndexValue::Int(_))
    }

    /// Attempts to extract an i64 value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IndexValue::Int(v) => Some(*v),
            IndexValue::Str(_) => None,
        }
    }

    /// Attempts to extract a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            IndexValue::Str(v) => Some(v),
            IndexValue::Int(_) => None,
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Int(v) => write!(f, "{}", v),
            IndexValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        IndexValue::Int(value)
    }
}

impl From<i32> for IndexValue {
    fn from(value: i32) -> Self {
        IndexValue::Int(value as i64)
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::Str(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::Str(value)
    }
}

/// An ordered combination of set elements.
pub type IndexTuple = SmallVec<[IndexValue; 4]>;

/// Formats index positions as `1, a` (no brackets).
pub fn format_index(index: &[IndexValue]) -> String {
    index
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A numeric literal. The int/float distinction survives arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
}

impl Number {
    /// Returns the value widened to f64.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
        }
    }

    /// Returns true if this is an integer.
    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            // Debug keeps the trailing `.0` on integral floats.
            Number::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A value computed on the host during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    Str(String),
}

impl Scalar {
    /// Returns the numeric value widened to f64, or None for strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Str(_) => None,
        }
    }

    /// Attempts to extract an i64 value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric value, or None for strings.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Scalar::Int(v) => Some(Number::Int(*v)),
            Scalar::Float(v) => Some(Number::Float(*v)),
            Scalar::Str(_) => None,
        }
    }

    /// Returns true for integers and floats.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Scalar::Str(_))
    }

    /// Converts this value into an index position.
    ///
    /// Integral floats such as `3.0` normalize to the integer `3`;
    /// fractional or non-finite floats are not valid indices.
    pub fn to_index_value(&self) -> Option<IndexValue> {
        match self {
            Scalar::Int(v) => Some(IndexValue::Int(*v)),
            Scalar::Str(v) => Some(IndexValue::Str(v.clone())),
            Scalar::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Some(IndexValue::Int(*v as i64))
                } else {
                    None
                }
            }
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{:?}", v),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

impl From<Number> for Scalar {
    fn from(value: Number) -> Self {
        match value {
            Number::Int(v) => Scalar::Int(v),
            Number::Float(v) => Scalar::Float(v),
        }
    }
}

impl From<IndexValue> for Scalar {
    fn from(value: IndexValue) -> Self {
        match value {
            IndexValue::Int(v) => Scalar::Int(v),
            IndexValue::Str(v) => Scalar::Str(v),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

/// A copy of the index bindings visible at the point of a failure.
///
/// Bindings are listed outermost first; shadowed names appear once with
/// their innermost value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSnapshot(pub Vec<(String, IndexValue)>);

impl IndexSnapshot {
    /// An empty snapshot (evaluation outside any index scope).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the bound value for a name.
    pub fn get(&self, name: &str) -> Option<&IndexValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IndexSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        f.write_str("}")
    }
}
