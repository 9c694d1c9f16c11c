//! The smallest useful model: `x[i] <= cost[i]` for every `i`, minimizing
//! the weighted sum.

use moai_compiler::builders::*;
use moai_compiler::{Constraint, Model, Objective, Quantifier};
use moai_core::{IndexElement, Parameter, Set, Variable};

/// The cost model as a JSON document.
pub const COST_MODEL_JSON: &str = r#"{
    "name": "costs",
    "sets": [{"name": "I", "elements": [1, 2, 3]}],
    "parameters": [{
        "name": "cost", "indices": ["I"],
        "values": [
            {"index": [1], "value": 5},
            {"index": [2], "value": 10},
            {"index": [3], "value": 15}
        ]
    }],
    "variables": [{"name": "x", "indices": ["I"], "domain": "NonNegativeReals"}],
    "constraints": [{
        "type": "constraint", "name": "upper",
        "expr": {
            "type": "comparison", "op": "le",
            "left": {"type": "variable", "name": "x",
                     "index_expr": [{"type": "index_variable", "name": "i"}]},
            "right": {"type": "parameter", "name": "cost",
                      "index_expr": [{"type": "index_variable", "name": "i"}]}
        },
        "quantifiers": [{"index": "i", "over": "I"}]
    }],
    "objective": {
        "name": "total_cost", "sense": "min",
        "expr": {
            "type": "aggregation", "op": "sum",
            "expr": {
                "type": "binary_op", "op": "mul",
                "left": {"type": "parameter", "name": "cost",
                         "index_expr": [{"type": "index_variable", "name": "i"}]},
                "right": {"type": "variable", "name": "x",
                          "index_expr": [{"type": "index_variable", "name": "i"}]}
            },
            "bindings": [{"type": "index_binding", "index_var": "i", "set_name": "I"}]
        }
    }
}"#;

/// Builds the model described by [`COST_MODEL_JSON`].
pub fn cost_model() -> Model {
    let mut model = Model::new("costs");
    model
        .add_set(Set::new("I", [1, 2, 3]))
        .and_then(|m| {
            m.add_parameter(
                Parameter::indexed(
                    "cost",
                    ["I"],
                    vec![
                        IndexElement::new([1], 5.0),
                        IndexElement::new([2], 10.0),
                        IndexElement::new([3], 15.0),
                    ],
                )
                .expect("cost table matches its index sets"),
            )
        })
        .and_then(|m| m.add_variable(Variable::new("x").with_indices(["I"])))
        .and_then(|m| {
            m.add_constraint(
                Constraint::new(
                    "upper",
                    le(var("x", [index_var("i")]), param("cost", [index_var("i")])),
                )
                .with_quantifiers(vec![Quantifier::new("i", "I")]),
            )
        })
        .and_then(|m| {
            m.set_objective(Objective::minimize(
                "total_cost",
                sum(
                    param("cost", [index_var("i")]) * var("x", [index_var("i")]),
                    [bind("i", "I")],
                    None,
                ),
            ))
        })
        .expect("cost fixture is well formed");
    model
}
