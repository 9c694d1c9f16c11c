//! MOAI - declarative optimization models compiled for a solver backend
//!
//! Build a [`Model`] from sets, parameters, variable families, quantified
//! constraints and an objective, then hand it a [`TargetModel`].
//!
//! # Example
//!
//! ```rust
//! use moai::prelude::*;
//!
//! let mut model = Model::new("tiny");
//! model
//!     .add_set(Set::new("I", [1, 2]))?
//!     .add_variable(Variable::new("x").with_indices(["I"]))?
//!     .add_constraint(
//!         Constraint::new("cap", le(var("x", [index_var("i")]), int(4)))
//!             .with_quantifiers(vec![Quantifier::new("i", "I")]),
//!     )?
//!     .set_objective(Objective::maximize(
//!         "total",
//!         sum(var("x", [index_var("i")]), [bind("i", "I")], None),
//!     ))?;
//!
//! let mut target = SymbolicModel::new();
//! let report = compile_with(&model, &mut target, &CompilerConfig::default())?;
//! assert_eq!(report.total_instances(), 2);
//! assert_eq!(target.objective().unwrap().expr.to_string(), "(x[1] + x[2])");
//! # Ok::<(), CompileError>(())
//! ```

// Declarations and values
pub use moai_core::{
    format_index, CompileError, Domain, IndexElement, IndexSnapshot, IndexTuple, IndexValue,
    Number, Parameter, ParameterValues, RefKind, Result, Scalar, Set, Variable,
};

// Expression trees and the compiler
pub use moai_compiler::{
    builders, AggregateOperator, Aggregation, BinaryOperator, Comparison, ComparisonOperator,
    CompileReport, Constraint, ConstraintRecord, ConstraintReport, Expr, IndexBinding, Model,
    ModelData, Objective, ObjectiveRecord, Quantifier, Resolved, ResolvedComparison, Sense,
    Symbolic, SymbolicModel, TargetModel, UnaryOperator, VarRef,
};

// Configuration
pub use moai_config::{CompilerConfig, ConfigError, EnvironmentMode, LimitsConfig, LoggingConfig};

mod run;
pub use run::{compile, compile_document, compile_with, CONFIG_FILE};

#[cfg(feature = "console")]
pub use moai_console as console;

pub mod prelude {
    pub use super::builders::*;
    pub use super::{compile, compile_document, compile_with};
    pub use super::{
        CompileError, CompileReport, CompilerConfig, Constraint, Domain, IndexElement, IndexValue,
        Model, ModelData, Objective, Parameter, Quantifier, Sense, Set, SymbolicModel,
        TargetModel, Variable,
    };
}
