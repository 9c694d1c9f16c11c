//! Parameter declarations and their data tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, RefKind, Result};
use crate::value::{IndexSnapshot, IndexTuple, IndexValue, Number};

/// One entry of a sparse parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexElement {
    pub index: IndexTuple,
    pub value: f64,
}

impl IndexElement {
    pub fn new<I, E>(index: I, value: f64) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<IndexValue>,
    {
        Self {
            index: index.into_iter().map(Into::into).collect(),
            value,
        }
    }
}

/// Parameter data as it appears in a model document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValues {
    /// One value answering every index.
    Scalar(Number),
    /// Sparse mapping from index tuples to values.
    Indexed(Vec<IndexElement>),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterData {
    name: String,
    #[serde(default)]
    indices: Vec<String>,
    values: ParameterValues,
}

/// A named numeric parameter, optionally indexed over sets.
///
/// The sparse form has no implicit default: looking up a tuple that was
/// never listed is an error, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterData", into = "ParameterData")]
pub struct Parameter {
    name: String,
    indices: Vec<String>,
    values: ParameterValues,
    table: HashMap<IndexTuple, f64>,
}

impl Parameter {
    /// Creates a parameter, validating tuple arity and uniqueness.
    pub fn new<I, S>(name: impl Into<String>, indices: I, values: ParameterValues) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let indices: Vec<String> = indices.into_iter().map(Into::into).collect();
        let mut table = HashMap::new();

        if let ParameterValues::Indexed(entries) = &values {
            for entry in entries {
                if entry.index.len() != indices.len() {
                    return Err(CompileError::DimensionMismatch {
                        kind: RefKind::Parameter,
                        name,
                        expected: indices.len(),
                        found: entry.index.len(),
                        context: IndexSnapshot::empty(),
                    });
                }
                if table.insert(entry.index.clone(), entry.value).is_some() {
                    return Err(CompileError::DuplicateIndex {
                        name,
                        index: entry.index.clone(),
                    });
                }
            }
        }

        Ok(Self {
            name,
            indices,
            values,
            table,
        })
    }

    /// Creates an unindexed parameter holding a single value.
    pub fn scalar(name: impl Into<String>, value: impl Into<Number>) -> Self {
        Self {
            name: name.into(),
            indices: Vec::new(),
            values: ParameterValues::Scalar(value.into()),
            table: HashMap::new(),
        }
    }

    /// Creates a sparse parameter indexed over the given sets.
    pub fn indexed<I, S, E>(name: impl Into<String>, indices: I, entries: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        E: IntoIterator<Item = IndexElement>,
    {
        Self::new(
            name,
            indices,
            ParameterValues::Indexed(entries.into_iter().collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the sets this parameter is indexed over.
    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    pub fn values(&self) -> &ParameterValues {
        &self.values
    }

    pub fn dimension(&self) -> usize {
        self.indices.len()
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.values, ParameterValues::Scalar(_))
    }

    /// Looks up the value at an index tuple without arity checks.
    pub fn get(&self, index: &[IndexValue]) -> Option<Number> {
        match &self.values {
            ParameterValues::Scalar(value) => Some(*value),
            ParameterValues::Indexed(_) => self.table.get(index).copied().map(Number::Float),
        }
    }

    /// Looks up the value at an index tuple.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the tuple length differs from the declared
    /// index count, `MissingParameterValue` if a sparse table has no entry.
    pub fn value(&self, index: &[IndexValue]) -> Result<Number> {
        self.check_arity(index)?;
        self.get(index)
            .ok_or_else(|| CompileError::MissingParameterValue {
                name: self.name.clone(),
                index: index.iter().cloned().collect(),
                context: IndexSnapshot::empty(),
            })
    }

    /// Returns true if a value exists at the index tuple.
    pub fn has_index(&self, index: &[IndexValue]) -> Result<bool> {
        if self.is_scalar() {
            return Ok(true);
        }
        self.check_arity(index)?;
        Ok(self.table.contains_key(index))
    }

    fn check_arity(&self, index: &[IndexValue]) -> Result<()> {
        if index.len() != self.indices.len() {
            return Err(CompileError::DimensionMismatch {
                kind: RefKind::Parameter,
                name: self.name.clone(),
                expected: self.indices.len(),
                found: index.len(),
                context: IndexSnapshot::empty(),
            });
        }
        Ok(())
    }
}

impl TryFrom<ParameterData> for Parameter {
    type Error = CompileError;

    fn try_from(data: ParameterData) -> Result<Self> {
        Parameter::new(data.name, data.indices, data.values)
    }
}

impl From<Parameter> for ParameterData {
    fn from(parameter: Parameter) -> Self {
        ParameterData {
            name: parameter.name,
            indices: parameter.indices,
            values: parameter.values,
        }
    }
}
