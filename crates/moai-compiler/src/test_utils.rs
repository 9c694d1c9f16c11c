//! Test utilities for moai-compiler
//!
//! Provides declaration fixtures wired to a [`SymbolicModel`] target.

use moai_core::{IndexElement, Parameter, Set, Variable};

use crate::eval::EvalContext;
use crate::registry::NamedList;
use crate::symbolic_model::SymbolicModel;
use crate::target::TargetModel;

/// Declarations plus a target that already holds their variable families.
#[derive(Default)]
pub struct Fixture {
    pub sets: NamedList<Set>,
    pub parameters: NamedList<Parameter>,
    pub variables: NamedList<Variable>,
    pub target: SymbolicModel,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(mut self, set: Set) -> Self {
        self.target.declare_set(&set).unwrap();
        self.sets.upsert(set);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.target.declare_parameter(&parameter).unwrap();
        self.parameters.upsert(parameter);
        self
    }

    /// Adds a variable and allocates its family in the target. The index
    /// sets must already be present.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        let index_sets: Vec<&Set> = variable
            .indices()
            .iter()
            .map(|name| self.sets.get(name).unwrap())
            .collect();
        self.target
            .declare_variable_family(&variable, &index_sets)
            .unwrap();
        self.variables.upsert(variable);
        self
    }

    pub fn ctx(&self) -> EvalContext<'_, SymbolicModel> {
        EvalContext::new(&self.sets, &self.parameters, &self.variables, &self.target)
    }
}

/// `I = [1, 2, 3]`, `cost[I] = {1: 5, 2: 10, 3: 15}`, variable `x[I]`.
pub fn make_cost_fixture() -> Fixture {
    Fixture::new()
        .with_set(Set::new("I", [1, 2, 3]))
        .with_parameter(
            Parameter::indexed(
                "cost",
                ["I"],
                vec![
                    IndexElement::new([1], 5.0),
                    IndexElement::new([2], 10.0),
                    IndexElement::new([3], 15.0),
                ],
            )
            .unwrap(),
        )
        .with_variable(Variable::new("x").with_indices(["I"]))
}

/// Two products over three periods with sparse demand and a scalar
/// capacity.
///
/// - `P = [A, B]`, `T = [1, 2, 3]`
/// - `demand[P, T]`, `capacity = 200`
/// - variables `produce[P, T]` and `inventory[P, T]`
pub fn make_planning_fixture() -> Fixture {
    let demand = [
        ("A", 1, 100.0),
        ("A", 2, 150.0),
        ("A", 3, 120.0),
        ("B", 1, 80.0),
        ("B", 2, 90.0),
        ("B", 3, 110.0),
    ];
    let entries = demand.iter().map(|&(p, t, value)| IndexElement {
        index: smallvec::smallvec![p.into(), t.into()],
        value,
    });

    Fixture::new()
        .with_set(Set::new("P", ["A", "B"]))
        .with_set(Set::new("T", [1, 2, 3]))
        .with_parameter(Parameter::indexed("demand", ["P", "T"], entries).unwrap())
        .with_parameter(Parameter::scalar("capacity", 200))
        .with_variable(Variable::new("produce").with_indices(["P", "T"]))
        .with_variable(Variable::new("inventory").with_indices(["P", "T"]))
}
