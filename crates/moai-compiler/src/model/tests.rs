//! Tests for the model registry and the compile driver.

use super::*;
use crate::builders::*;
use crate::ops::ComparisonOperator;
use crate::constraint::{Comparison, Quantifier, Sense};
use crate::symbolic_model::SymbolicModel;
use moai_config::CompilerConfig;
use moai_core::{IndexElement, IndexValue};

fn cost_model() -> Model {
    let mut model = Model::new("costs");
    model
        .add_set(Set::new("I", [1, 2, 3]))
        .unwrap()
        .add_parameter(
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
        .unwrap()
        .add_variable(Variable::new("x").with_indices(["I"]))
        .unwrap()
        .add_constraint(
            Constraint::new(
                "upper",
                le(var("x", [index_var("i")]), param("cost", [index_var("i")])),
            )
            .with_quantifiers(vec![Quantifier::new("i", "I")]),
        )
        .unwrap()
        .set_objective(Objective::minimize(
            "total_cost",
            sum(
                param("cost", [index_var("i")]) * var("x", [index_var("i")]),
                [bind("i", "I")],
                None,
            ),
        ))
        .unwrap();
    model
}

#[test]
fn test_compile_cost_model() {
    let model = cost_model();
    let mut target = SymbolicModel::new();
    let report = model.compile(&mut target, &CompilerConfig::default()).unwrap();

    let rendered: Vec<String> = target
        .constraint_instances("upper")
        .map(|record| record.comparison.to_string())
        .collect();
    assert_eq!(rendered, vec!["x[1] <= 5.0", "x[2] <= 10.0", "x[3] <= 15.0"]);
    assert_eq!(
        target.constraint("upper", &[IndexValue::Int(2)]).unwrap().to_string(),
        "upper[2]: x[2] <= 10.0"
    );

    let objective = target.objective().unwrap();
    assert_eq!(objective.sense, Sense::Min);
    assert_eq!(
        objective.expr.to_string(),
        "((5.0 * x[1]) + (10.0 * x[2]) + (15.0 * x[3]))"
    );

    assert_eq!(report.total_instances(), 3);
    assert_eq!(report.objective_terms, 3);
    assert_eq!(report.constraint("upper").map(|c| c.skipped), Some(0));
    assert_eq!(target.variable_count(), 3);
}

#[test]
fn test_missing_objective() {
    let mut model = cost_model();
    model.remove_objective();
    let mut target = SymbolicModel::new();
    let err = model.compile(&mut target, &CompilerConfig::default()).unwrap_err();
    assert!(matches!(err, CompileError::MissingObjective { name } if name == "costs"));
}

#[test]
fn test_failed_compile_emits_no_constraints() {
    let mut model = cost_model();
    model
        .add_constraint(
            Constraint::new(
                "shifted",
                le(var("x", [index_add(index_var("i"), int(1))]), int(1)),
            )
            .with_quantifiers(vec![Quantifier::new("i", "I")]),
        )
        .unwrap();

    let mut target = SymbolicModel::new();
    let err = model.compile(&mut target, &CompilerConfig::default()).unwrap_err();
    assert!(matches!(err, CompileError::VariableIndexOutOfRange { .. }));
    assert!(target.constraints().is_empty());
    assert!(target.objective().is_none());
}

#[test]
fn test_limits_come_from_config() {
    let model = cost_model();
    let mut target = SymbolicModel::new();
    let config = CompilerConfig::new().with_max_instances(2);
    let err = model.compile(&mut target, &config).unwrap_err();
    assert!(matches!(err, CompileError::LimitExceeded { name, .. } if name == "upper"));
}

#[test]
fn test_replace_keeps_position() {
    let mut model = cost_model();
    model
        .add_constraint(Constraint::new("lower", ge(var("x", [int(1)]), int(0))))
        .unwrap();
    model
        .add_constraint(
            Constraint::new("upper", le(var("x", [index_var("i")]), int(1)))
                .with_quantifiers(vec![Quantifier::new("i", "I")]),
        )
        .unwrap();

    assert_eq!(model.constraint_names(), vec!["upper", "lower"]);
    assert_eq!(
        model.constraint("upper").unwrap().display(),
        "x[i] <= 1 for i in I"
    );
}

#[test]
fn test_failed_add_leaves_model_unchanged() {
    let mut model = cost_model();
    let before = model.clone();

    let err = model
        .add_variable(Variable::new("y").with_indices(["K"]))
        .unwrap_err();
    assert!(matches!(err, CompileError::UnknownSet { name } if name == "K"));

    let err = model
        .add_set(Set::new("Mixed", vec![IndexValue::Int(1), IndexValue::from("a")]))
        .unwrap_err();
    assert!(matches!(err, CompileError::HeterogeneousSet { .. }));

    let err = model.add_set(Set::new("I", [1, 1, 2])).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateSetElement { name, .. } if name == "I"));

    let err = model
        .add_constraint(Constraint::new(
            "bad",
            le(var("x", [param("cost", [int(1)])]), int(1)),
        ))
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidIndexExpression { .. }));

    let err = model
        .set_objective(Objective::maximize(
            "other",
            sum(var("x", [index_var("j")]), [bind("j", "J")], None),
        ))
        .unwrap_err();
    assert!(matches!(err, CompileError::UnknownSet { name } if name == "J"));

    let err = model
        .add_constraint(
            Constraint::new("filtered", le(var("x", [index_var("i")]), int(1))).with_quantifiers(
                vec![Quantifier::new("i", "I").with_condition(Comparison::index(
                    var("x", [index_var("i")]),
                    ComparisonOperator::Gt,
                    int(0),
                ))],
            ),
        )
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidIndexExpression { .. }));

    assert_eq!(model, before);
}

#[test]
fn test_remove_and_lookup() {
    let mut model = cost_model();
    assert_eq!(model.set_names(), vec!["I"]);
    assert_eq!(model.parameter_names(), vec!["cost"]);
    assert_eq!(model.variable_names(), vec!["x"]);
    assert!(model.variable("x").unwrap().is_continuous());

    assert!(model.remove_parameter("cost").is_some());
    assert!(model.parameter("cost").is_none());
    assert!(model.remove_parameter("cost").is_none());

    // Compiling now fails on the dangling reference.
    let mut target = SymbolicModel::new();
    let err = model.compile(&mut target, &CompilerConfig::default()).unwrap_err();
    assert!(matches!(err, CompileError::UnknownParameter { name, .. } if name == "cost"));
}

#[test]
fn test_checked_mode_revalidates() {
    let mut model = cost_model();
    model.remove_set("I");

    let config = CompilerConfig::new().with_environment_mode(EnvironmentMode::Checked);
    let mut target = SymbolicModel::new();
    let err = model.compile(&mut target, &config).unwrap_err();
    assert!(matches!(err, CompileError::UnknownSet { name } if name == "I"));
    // Nothing was declared before the check failed.
    assert_eq!(target.variable_count(), 0);
}

#[test]
fn test_document_conversion() {
    let model = cost_model();
    let json = model.to_data().to_json().unwrap();
    let back = Model::from_data(ModelData::from_json(&json).unwrap()).unwrap();
    assert_eq!(back, model);
}

#[test]
fn test_production_balance() {
    let mut model = Model::new("planning");
    let demand = [("A", 1, 100.0), ("A", 2, 150.0), ("B", 1, 80.0), ("B", 2, 90.0)];
    model
        .add_set(Set::new("P", ["A", "B"]))
        .unwrap()
        .add_set(Set::new("T", [1, 2]))
        .unwrap()
        .add_parameter(
            Parameter::indexed(
                "demand",
                ["P", "T"],
                demand.iter().map(|&(p, t, v)| IndexElement {
                    index: smallvec::smallvec![p.into(), t.into()],
                    value: v,
                }),
            )
            .unwrap(),
        )
        .unwrap()
        .add_parameter(Parameter::scalar("initial", 0))
        .unwrap()
        .add_variable(Variable::new("produce").with_indices(["P", "T"]))
        .unwrap()
        .add_variable(Variable::new("inventory").with_indices(["P", "T"]))
        .unwrap();

    let p = || index_var("p");
    let t = || index_var("t");
    // inventory[p, t] == inventory[p, t - 1] + produce[p, t] - demand[p, t]  for t > 1
    model
        .add_constraint(
            Constraint::new(
                "balance",
                eq(
                    var("inventory", [p(), t()]),
                    var("inventory", [p(), index_sub(t(), int(1))]) + var("produce", [p(), t()])
                        - param("demand", [p(), t()]),
                ),
            )
            .with_quantifiers(vec![
                Quantifier::new("p", "P"),
                Quantifier::new("t", "T").with_condition(Comparison::index(
                    t(),
                    ComparisonOperator::Gt,
                    int(1),
                )),
            ]),
        )
        .unwrap()
        .set_objective(Objective::minimize(
            "production",
            sum(var("produce", [p(), t()]), [bind("p", "P"), bind("t", "T")], None),
        ))
        .unwrap();

    let mut target = SymbolicModel::new();
    let report = model.compile(&mut target, &CompilerConfig::default()).unwrap();
    assert_eq!(report.constraint("balance").map(|c| (c.instances, c.skipped)), Some((2, 2)));
    assert_eq!(
        target.constraints()[0].to_string(),
        "balance[A, 2]: inventory[A, 2] == ((inventory[A, 1] + produce[A, 2]) - 150.0)"
    );
    assert_eq!(report.objective_terms, 4);
}
