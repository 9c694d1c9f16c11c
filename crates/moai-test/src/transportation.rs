//! Transportation problem fixtures.
//!
//! Three warehouses ship to four customers. Supply rows bound what each
//! warehouse sends out, demand rows require each customer to be served,
//! and the objective minimizes the total shipping cost.

use moai_compiler::builders::*;
use moai_compiler::{Constraint, Model, Objective, Quantifier};
use moai_core::{IndexElement, Parameter, Set, Variable};

pub const WAREHOUSES: [&str; 3] = ["W1", "W2", "W3"];
pub const CUSTOMERS: [&str; 4] = ["C1", "C2", "C3", "C4"];

const SUPPLY: [f64; 3] = [100.0, 150.0, 120.0];
const DEMAND: [f64; 4] = [80.0, 70.0, 60.0, 50.0];

// Row per warehouse, column per customer.
const COST: [[f64; 4]; 3] = [
    [4.0, 6.0, 8.0, 5.0],
    [5.0, 4.0, 7.0, 6.0],
    [6.0, 5.0, 4.0, 3.0],
];

/// Creates the transportation model.
///
/// `supply_limit` yields one instance per warehouse, `demand_satisfaction`
/// one per customer, and the objective sums twelve cost terms.
///
/// # Examples
///
/// ```
/// use moai_test::transportation_model;
///
/// let model = transportation_model();
/// assert_eq!(model.set_names(), vec!["WAREHOUSES", "CUSTOMERS"]);
/// assert_eq!(model.variable("ship").unwrap().dimension(), 2);
/// ```
pub fn transportation_model() -> Model {
    let mut model = Model::new("TransportationProblem");
    let w = || index_var("w");
    let c = || index_var("c");

    model
        .add_set(Set::new("WAREHOUSES", WAREHOUSES))
        .and_then(|m| m.add_set(Set::new("CUSTOMERS", CUSTOMERS)))
        .and_then(|m| m.add_parameter(supply()))
        .and_then(|m| m.add_parameter(demand()))
        .and_then(|m| m.add_parameter(cost()))
        .and_then(|m| m.add_variable(Variable::new("ship").with_indices(["WAREHOUSES", "CUSTOMERS"])))
        .and_then(|m| {
            m.add_constraint(
                Constraint::new(
                    "supply_limit",
                    le(
                        sum(var("ship", [w(), c()]), [bind("c", "CUSTOMERS")], None),
                        param("supply", [w()]),
                    ),
                )
                .with_quantifiers(vec![Quantifier::new("w", "WAREHOUSES")]),
            )
        })
        .and_then(|m| {
            m.add_constraint(
                Constraint::new(
                    "demand_satisfaction",
                    ge(
                        sum(var("ship", [w(), c()]), [bind("w", "WAREHOUSES")], None),
                        param("demand", [c()]),
                    ),
                )
                .with_quantifiers(vec![Quantifier::new("c", "CUSTOMERS")]),
            )
        })
        .and_then(|m| {
            m.set_objective(Objective::minimize(
                "total_cost",
                sum(
                    param("cost", [w(), c()]) * var("ship", [w(), c()]),
                    [bind("w", "WAREHOUSES"), bind("c", "CUSTOMERS")],
                    None,
                ),
            ))
        })
        .expect("transportation fixture is well formed");
    model
}

fn supply() -> Parameter {
    let entries = WAREHOUSES
        .iter()
        .zip(SUPPLY)
        .map(|(&w, value)| IndexElement::new([w], value));
    Parameter::indexed("supply", ["WAREHOUSES"], entries).expect("supply table is valid")
}

fn demand() -> Parameter {
    let entries = CUSTOMERS
        .iter()
        .zip(DEMAND)
        .map(|(&c, value)| IndexElement::new([c], value));
    Parameter::indexed("demand", ["CUSTOMERS"], entries).expect("demand table is valid")
}

fn cost() -> Parameter {
    let entries = WAREHOUSES.iter().zip(COST).flat_map(|(&w, row)| {
        CUSTOMERS
            .iter()
            .zip(row)
            .map(move |(&c, value)| IndexElement::new([w, c], value))
    });
    Parameter::indexed("cost", ["WAREHOUSES", "CUSTOMERS"], entries).expect("cost table is valid")
}
