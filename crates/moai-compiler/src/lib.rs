//! Model compiler for MOAI.
//!
//! Takes a declarative optimization model (sets, parameters, variable
//! families, quantified constraints and an objective expressed as typed
//! expression trees) and compiles it against a [`TargetModel`]: every
//! quantified constraint becomes one concrete comparison per surviving
//! index combination, and every aggregation is folded into a single
//! expression.

pub mod builders;
mod constraint;
mod context;
mod document;
mod eval;
mod expand;
mod expr;
mod model;
mod ops;
mod registry;
mod symbolic;
mod symbolic_model;
mod target;

#[cfg(test)]
pub mod test_utils;

pub use constraint::{Comparison, Constraint, Objective, Quantifier, Sense};
pub use context::IndexContext;
pub use document::ModelData;
pub use eval::{eval_comparison, eval_condition, eval_expr, EvalContext};
pub use expand::{
    expand_aggregation, expand_constraint, CartesianProduct, ConstraintExpansion,
    ConstraintInstance,
};
pub use expr::{Aggregation, Expr, IndexBinding};
pub use model::{CompileReport, ConstraintReport, Model};
pub use ops::{AggregateOperator, BinaryOperator, ComparisonOperator, UnaryOperator};
pub use registry::{Named, NamedList};
pub use symbolic::{Resolved, ResolvedComparison, Symbolic};
pub use symbolic_model::{ConstraintRecord, ObjectiveRecord, SymbolicModel, VarRef};
pub use target::TargetModel;

pub use moai_core::{CompileError, Result};
