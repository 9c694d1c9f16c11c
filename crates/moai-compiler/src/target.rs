//! The outbound interface to a solver-side model.

use std::fmt::Debug;

use moai_core::{IndexTuple, IndexValue, Parameter, Result, Set, Variable};

use crate::constraint::Sense;
use crate::symbolic::{Resolved, ResolvedComparison};

/// A backend model that receives compiled declarations.
///
/// The compiler calls the `declare_*` methods in declaration order (sets,
/// parameters, variables), then [`add_constraint_instance`] once per
/// surviving index combination, then [`set_objective`] exactly once.
/// The target owns per-combination variable storage and hands out
/// handles through [`variable`].
///
/// [`add_constraint_instance`]: TargetModel::add_constraint_instance
/// [`set_objective`]: TargetModel::set_objective
/// [`variable`]: TargetModel::variable
pub trait TargetModel {
    /// Handle to one scalar decision variable.
    type Var: Clone + Debug;

    fn declare_set(&mut self, set: &Set) -> Result<()>;

    fn declare_parameter(&mut self, parameter: &Parameter) -> Result<()>;

    /// Declares a family of scalar variables over the product of
    /// `index_sets`, which are given in the variable's index order.
    fn declare_variable_family(&mut self, variable: &Variable, index_sets: &[&Set]) -> Result<()>;

    /// Returns the handle for one member of a declared family, or None
    /// when the tuple is outside the family's product.
    fn variable(&self, name: &str, index: &[IndexValue]) -> Option<Self::Var>;

    /// Receives one concrete constraint. `index` is None for an
    /// unquantified constraint.
    fn add_constraint_instance(
        &mut self,
        name: &str,
        index: Option<&IndexTuple>,
        comparison: ResolvedComparison<Self::Var>,
    ) -> Result<()>;

    fn set_objective(&mut self, name: &str, expr: Resolved<Self::Var>, sense: Sense) -> Result<()>;
}
