//! Error types for MOAI model compilation

use std::fmt;

use thiserror::Error;

use crate::value::{format_index, IndexSnapshot, IndexTuple, IndexValue};

/// The kind of declaration an indexed reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Variable,
    Parameter,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Variable => f.write_str("variable"),
            RefKind::Parameter => f.write_str("parameter"),
        }
    }
}

/// Main error type for model building and compilation.
///
/// Every evaluation failure carries the offending name and, where one
/// exists, a snapshot of the index bindings at the failing node.
#[derive(Debug, Error)]
pub enum CompileError {
    /// An index variable was evaluated outside any binding for it.
    #[error("index variable `{name}` is not bound in {context}")]
    UnboundIndexVariable {
        name: String,
        context: IndexSnapshot,
    },

    #[error("unknown variable `{name}` in {context}")]
    UnknownVariable {
        name: String,
        context: IndexSnapshot,
    },

    #[error("unknown parameter `{name}` in {context}")]
    UnknownParameter {
        name: String,
        context: IndexSnapshot,
    },

    #[error("unknown set `{name}`")]
    UnknownSet { name: String },

    /// Index count differs from the declared index count.
    #[error("{kind} `{name}` is indexed by {expected} set(s) but {found} index position(s) were given (in {context})")]
    DimensionMismatch {
        kind: RefKind,
        name: String,
        expected: usize,
        found: usize,
        context: IndexSnapshot,
    },

    /// A sparse parameter has no entry at a fully resolved tuple.
    #[error("parameter `{name}` has no value at [{}] (in {context})", format_index(.index))]
    MissingParameterValue {
        name: String,
        index: IndexTuple,
        context: IndexSnapshot,
    },

    /// An index position is not a host scalar usable as a set element.
    #[error("invalid index expression for `{name}`: {detail} (in {context})")]
    InvalidIndexExpression {
        name: String,
        detail: String,
        context: IndexSnapshot,
    },

    /// A filter condition resolved to a decision-variable expression.
    #[error("condition `{condition}` does not resolve to host scalars (in {context})")]
    NonScalarCondition {
        condition: String,
        context: IndexSnapshot,
    },

    #[error("unsupported operator `{op}`")]
    UnsupportedOperator { op: String },

    #[error("unsupported aggregation operator `{op}`")]
    UnsupportedAggregationOperator { op: String },

    /// The target model holds no instance of the variable at this tuple.
    #[error("variable `{name}` has no instance at [{}] (in {context})", format_index(.index))]
    VariableIndexOutOfRange {
        name: String,
        index: IndexTuple,
        context: IndexSnapshot,
    },

    #[error("type mismatch in `{op}`: {detail} (in {context})")]
    TypeMismatch {
        op: String,
        detail: String,
        context: IndexSnapshot,
    },

    #[error("division by zero (in {context})")]
    DivisionByZero { context: IndexSnapshot },

    /// Enumeration would exceed a configured limit.
    #[error("`{name}` would enumerate {combinations} combinations, limit is {limit}")]
    LimitExceeded {
        name: String,
        combinations: u64,
        limit: u64,
    },

    #[error("set `{name}` mixes string and integer elements")]
    HeterogeneousSet { name: String },

    #[error("set `{name}` lists element `{element}` more than once")]
    DuplicateSetElement { name: String, element: IndexValue },

    #[error("parameter `{name}` lists index [{}] more than once", format_index(.index))]
    DuplicateIndex { name: String, index: IndexTuple },

    #[error("model `{name}` has no objective")]
    MissingObjective { name: String },

    #[error("invalid model document: {0}")]
    Document(#[from] serde_json::Error),

    /// Failure reported by the target model adapter.
    #[error("target model error: {0}")]
    Target(String),
}

/// Result type alias for MOAI operations
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::IndexValue;

    #[test]
    fn test_messages_name_the_offender() {
        let err = CompileError::MissingParameterValue {
            name: "cost".to_string(),
            index: smallvec::smallvec![IndexValue::Int(4)],
            context: IndexSnapshot(vec![("i".to_string(), IndexValue::Int(4))]),
        };
        assert_eq!(
            err.to_string(),
            "parameter `cost` has no value at [4] (in {i: 4})"
        );

        let err = CompileError::DimensionMismatch {
            kind: RefKind::Variable,
            name: "x".to_string(),
            expected: 2,
            found: 1,
            context: IndexSnapshot::empty(),
        };
        assert!(err.to_string().starts_with("variable `x` is indexed by 2 set(s)"));
    }
}
