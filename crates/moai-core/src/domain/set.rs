//! Set declarations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::value::IndexValue;

/// A named, ordered collection of string or integer elements.
///
/// Element order is the iteration order used by every quantifier and
/// aggregation ranging over the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Set {
    name: String,
    elements: Vec<IndexValue>,
}

impl Set {
    /// Creates a set; elements keep the given order.
    pub fn new<I, E>(name: impl Into<String>, elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<IndexValue>,
    {
        Self {
            name: name.into(),
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the elements in iteration order.
    pub fn elements(&self) -> &[IndexValue] {
        &self.elements
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, IndexValue> {
        self.elements.iter()
    }

    /// Returns true if `value` is an element.
    pub fn contains(&self, value: &IndexValue) -> bool {
        self.elements.contains(value)
    }

    /// Checks that all elements are of the same kind and distinct.
    pub fn validate(&self) -> Result<()> {
        let mut kinds = self.elements.iter().map(IndexValue::is_int);
        if let Some(first) = kinds.next() {
            if kinds.any(|k| k != first) {
                return Err(CompileError::HeterogeneousSet {
                    name: self.name.clone(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element) {
                return Err(CompileError::DuplicateSetElement {
                    name: self.name.clone(),
                    element: element.clone(),
                });
            }
        }
        Ok(())
    }
}
