//! Production planning fixtures.
//!
//! Two products over three periods. Inventory carries from one period to
//! the next; the first period starts from a fixed initial stock.

use moai_compiler::builders::*;
use moai_compiler::{Comparison, ComparisonOperator, Constraint, Model, Objective, Quantifier};
use moai_core::{IndexElement, IndexValue, Parameter, Set, Variable};

pub const PRODUCTS: [&str; 2] = ["ProductA", "ProductB"];
pub const PERIODS: [i64; 3] = [1, 2, 3];

// Row per product, column per period.
const DEMAND: [[f64; 3]; 2] = [[100.0, 150.0, 120.0], [80.0, 90.0, 110.0]];

const PROD_COST: [f64; 2] = [10.0, 15.0];
const HOLD_COST: [f64; 2] = [1.0, 2.0];
const CAPACITY: [f64; 2] = [200.0, 150.0];
const INITIAL_INV: [f64; 2] = [50.0, 30.0];

/// Creates the production planning model.
///
/// Constraints, in order:
/// - `capacity_limit`: `produce[p, t] <= capacity[p]` for every pair (6)
/// - `initial_balance`: period-one stock balance, `t == 1` (2 kept, 4 skipped)
/// - `balance`: carried stock balance, `t > 1` (4 kept, 2 skipped)
pub fn production_planning_model() -> Model {
    let mut model = Model::new("ProductionPlanning");
    let p = || index_var("p");
    let t = || index_var("t");
    let over_products_and_periods = |condition: Option<Comparison>| {
        let periods = Quantifier::new("t", "PERIODS");
        vec![
            Quantifier::new("p", "PRODUCTS"),
            match condition {
                Some(condition) => periods.with_condition(condition),
                None => periods,
            },
        ]
    };

    model
        .add_set(Set::new("PRODUCTS", PRODUCTS))
        .and_then(|m| m.add_set(Set::new("PERIODS", PERIODS)))
        .and_then(|m| m.add_parameter(demand()))
        .and_then(|m| m.add_parameter(per_product("prod_cost", PROD_COST)))
        .and_then(|m| m.add_parameter(per_product("hold_cost", HOLD_COST)))
        .and_then(|m| m.add_parameter(per_product("capacity", CAPACITY)))
        .and_then(|m| m.add_parameter(per_product("initial_inv", INITIAL_INV)))
        .and_then(|m| m.add_variable(Variable::new("produce").with_indices(["PRODUCTS", "PERIODS"])))
        .and_then(|m| m.add_variable(Variable::new("inventory").with_indices(["PRODUCTS", "PERIODS"])))
        .and_then(|m| {
            m.add_constraint(
                Constraint::new(
                    "capacity_limit",
                    le(var("produce", [p(), t()]), param("capacity", [p()])),
                )
                .with_quantifiers(over_products_and_periods(None)),
            )
        })
        .and_then(|m| {
            m.add_constraint(
                Constraint::new(
                    "initial_balance",
                    eq(
                        var("inventory", [p(), t()]),
                        param("initial_inv", [p()]) + var("produce", [p(), t()])
                            - param("demand", [p(), t()]),
                    ),
                )
                .with_quantifiers(over_products_and_periods(Some(Comparison::index(
                    t(),
                    ComparisonOperator::Eq,
                    int(1),
                )))),
            )
        })
        .and_then(|m| {
            m.add_constraint(
                Constraint::new(
                    "balance",
                    eq(
                        var("inventory", [p(), t()]),
                        var("inventory", [p(), index_sub(t(), int(1))])
                            + var("produce", [p(), t()])
                            - param("demand", [p(), t()]),
                    ),
                )
                .with_quantifiers(over_products_and_periods(Some(Comparison::index(
                    t(),
                    ComparisonOperator::Gt,
                    int(1),
                )))),
            )
        })
        .and_then(|m| {
            m.set_objective(Objective::minimize(
                "total_cost",
                sum(
                    param("prod_cost", [p()]) * var("produce", [p(), t()])
                        + param("hold_cost", [p()]) * var("inventory", [p(), t()]),
                    [bind("p", "PRODUCTS"), bind("t", "PERIODS")],
                    None,
                ),
            ))
        })
        .expect("planning fixture is well formed");
    model
}

fn demand() -> Parameter {
    let entries = PRODUCTS.iter().zip(DEMAND).flat_map(|(&p, row)| {
        PERIODS
            .iter()
            .zip(row)
            .map(move |(&t, value)| IndexElement::new([IndexValue::from(p), IndexValue::from(t)], value))
    });
    Parameter::indexed("demand", ["PRODUCTS", "PERIODS"], entries).expect("demand table is valid")
}

fn per_product(name: &str, values: [f64; 2]) -> Parameter {
    let entries = PRODUCTS
        .iter()
        .zip(values)
        .map(|(&p, value)| IndexElement::new([p], value));
    Parameter::indexed(name, ["PRODUCTS"], entries).expect("product table is valid")
}
