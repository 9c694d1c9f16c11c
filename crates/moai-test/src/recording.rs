//! A target that records the order of calls it receives.

use moai_compiler::{
    Resolved, ResolvedComparison, Sense, SymbolicModel, TargetModel, VarRef,
};
use moai_core::{format_index, IndexTuple, IndexValue, Parameter, Result, Set, Variable};

/// One call received by a [`RecordingTarget`], rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCall {
    Set(String),
    Parameter(String),
    Variable { name: String, members: usize },
    Constraint { name: String, index: Option<String>, body: String },
    Objective { name: String, sense: Sense, body: String },
}

/// Wraps a [`SymbolicModel`] and logs each call before delegating.
///
/// Handle lookups through [`TargetModel::variable`] are not logged.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    inner: SymbolicModel,
    calls: Vec<TargetCall>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[TargetCall] {
        &self.calls
    }

    pub fn model(&self) -> &SymbolicModel {
        &self.inner
    }

    /// Names of the constraint instances received so far, with their
    /// index, e.g. `supply_limit[W1]`.
    pub fn constraint_keys(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                TargetCall::Constraint { name, index: Some(index), .. } => {
                    Some(format!("{}[{}]", name, index))
                }
                TargetCall::Constraint { name, index: None, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl TargetModel for RecordingTarget {
    type Var = VarRef;

    fn declare_set(&mut self, set: &Set) -> Result<()> {
        self.calls.push(TargetCall::Set(set.name().to_string()));
        self.inner.declare_set(set)
    }

    fn declare_parameter(&mut self, parameter: &Parameter) -> Result<()> {
        self.calls.push(TargetCall::Parameter(parameter.name().to_string()));
        self.inner.declare_parameter(parameter)
    }

    fn declare_variable_family(&mut self, variable: &Variable, index_sets: &[&Set]) -> Result<()> {
        let members = index_sets.iter().map(|set| set.len()).product();
        self.calls.push(TargetCall::Variable {
            name: variable.name().to_string(),
            members,
        });
        self.inner.declare_variable_family(variable, index_sets)
    }

    fn variable(&self, name: &str, index: &[IndexValue]) -> Option<VarRef> {
        self.inner.variable(name, index)
    }

    fn add_constraint_instance(
        &mut self,
        name: &str,
        index: Option<&IndexTuple>,
        comparison: ResolvedComparison<VarRef>,
    ) -> Result<()> {
        self.calls.push(TargetCall::Constraint {
            name: name.to_string(),
            index: index.map(|i| format_index(i)),
            body: comparison.to_string(),
        });
        self.inner.add_constraint_instance(name, index, comparison)
    }

    fn set_objective(&mut self, name: &str, expr: Resolved<VarRef>, sense: Sense) -> Result<()> {
        self.calls.push(TargetCall::Objective {
            name: name.to_string(),
            sense,
            body: expr.to_string(),
        });
        self.inner.set_objective(name, expr, sense)
    }
}
