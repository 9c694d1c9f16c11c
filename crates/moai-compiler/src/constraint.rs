//! Comparisons, quantified constraints and the objective.

use std::fmt;

use serde::{Deserialize, Serialize};

use moai_core::Result;

use crate::expr::Expr;
use crate::ops::ComparisonOperator;
use crate::registry::Named;

/// `left op right`.
///
/// Used both as a constraint body and as a filter condition on
/// quantifiers and aggregations. Documents tag it either `comparison` or
/// `index_comparison`; the two forms evaluate identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Comparison {
    #[serde(rename = "type", default)]
    tag: ComparisonTag,
    pub left: Expr,
    pub op: ComparisonOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ComparisonTag {
    #[default]
    Comparison,
    IndexComparison,
}

impl Comparison {
    pub fn new(left: Expr, op: ComparisonOperator, right: Expr) -> Self {
        Self {
            tag: ComparisonTag::Comparison,
            left,
            op,
            right,
        }
    }

    /// A comparison between index expressions, typically a filter.
    pub fn index(left: Expr, op: ComparisonOperator, right: Expr) -> Self {
        Self {
            tag: ComparisonTag::IndexComparison,
            left,
            op,
            right,
        }
    }

    /// Returns true if the document tagged this as an index comparison.
    pub fn is_index_comparison(&self) -> bool {
        self.tag == ComparisonTag::IndexComparison
    }

    /// Checks index positions on both sides.
    pub fn validate(&self) -> Result<()> {
        self.left.validate()?;
        self.right.validate()
    }

    /// Checks that both sides are index expressions, as a filter
    /// condition requires.
    pub fn validate_index(&self) -> Result<()> {
        let owner = self.display();
        self.left.validate_index(&owner)?;
        self.right.validate_index(&owner)
    }

    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// `for index_var in over [if condition]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quantifier {
    #[serde(rename = "index", alias = "index_var")]
    pub index_var: String,
    pub over: String,
    #[serde(default)]
    pub condition: Option<Comparison>,
}

impl Quantifier {
    pub fn new(index_var: impl Into<String>, over: impl Into<String>) -> Self {
        Self {
            index_var: index_var.into(),
            over: over.into(),
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: Comparison) -> Self {
        self.condition = Some(condition);
        self
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for {} in {}", self.index_var, self.over)?;
        if let Some(condition) = &self.condition {
            write!(f, " if {}", condition)?;
        }
        Ok(())
    }
}

/// A named comparison, instantiated once per surviving element of the
/// product of its quantified sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraint {
    #[serde(rename = "type", default)]
    tag: ConstraintTag,
    name: String,
    expr: Comparison,
    #[serde(default)]
    quantifiers: Option<Vec<Quantifier>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConstraintTag {
    #[default]
    Constraint,
}

impl Constraint {
    /// Creates an unquantified constraint.
    pub fn new(name: impl Into<String>, expr: Comparison) -> Self {
        Self {
            tag: ConstraintTag::Constraint,
            name: name.into(),
            expr,
            quantifiers: None,
        }
    }

    pub fn with_quantifiers(mut self, quantifiers: Vec<Quantifier>) -> Self {
        self.quantifiers = if quantifiers.is_empty() {
            None
        } else {
            Some(quantifiers)
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &Comparison {
        &self.expr
    }

    /// Quantifiers, outermost first. Empty when unquantified.
    pub fn quantifiers(&self) -> &[Quantifier] {
        self.quantifiers.as_deref().unwrap_or(&[])
    }

    pub fn is_quantified(&self) -> bool {
        !self.quantifiers().is_empty()
    }

    /// Checks every index position in the body and the conditions.
    pub fn validate(&self) -> Result<()> {
        self.expr.validate()?;
        for quantifier in self.quantifiers() {
            if let Some(condition) = &quantifier.condition {
                condition.validate_index()?;
            }
        }
        Ok(())
    }

    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl Named for Constraint {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        for (i, quantifier) in self.quantifiers().iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}", quantifier)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    #[default]
    Min,
    Max,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Min => f.write_str("min"),
            Sense::Max => f.write_str("max"),
        }
    }
}

/// The single unindexed objective of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Objective {
    name: String,
    expr: Expr,
    #[serde(default)]
    sense: Sense,
}

impl Objective {
    pub fn new(name: impl Into<String>, expr: Expr, sense: Sense) -> Self {
        Self {
            name: name.into(),
            expr,
            sense,
        }
    }

    pub fn minimize(name: impl Into<String>, expr: Expr) -> Self {
        Self::new(name, expr, Sense::Min)
    }

    pub fn maximize(name: impl Into<String>, expr: Expr) -> Self {
        Self::new(name, expr, Sense::Max)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.sense, self.name, self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::IndexBinding;
    use moai_core::CompileError;

    fn x_at(index: &str) -> Expr {
        Expr::variable_at("x", vec![Expr::index_var(index)])
    }

    #[test]
    fn test_constraint_display_lists_quantifiers() {
        let body = Comparison::new(
            x_at("i") + Expr::variable_at("y", vec![Expr::index_var("j")]),
            ComparisonOperator::Le,
            Expr::int(1),
        );
        let constraint = Constraint::new("pairs", body).with_quantifiers(vec![
            Quantifier::new("i", "I"),
            Quantifier::new("j", "J").with_condition(Comparison::index(
                Expr::index_var("i"),
                ComparisonOperator::Ne,
                Expr::index_var("j"),
            )),
        ]);
        assert_eq!(
            constraint.display(),
            "(x[i] + y[j]) <= 1 for i in I, for j in J if i != j"
        );
    }

    #[test]
    fn test_unquantified_constraint_display() {
        let constraint = Constraint::new(
            "cap",
            Comparison::new(Expr::variable("total"), ComparisonOperator::Le, Expr::int(100)),
        )
        .with_quantifiers(vec![]);
        assert!(!constraint.is_quantified());
        assert_eq!(constraint.display(), "total <= 100");
    }

    #[test]
    fn test_constraint_document() {
        let json = r#"{
            "type": "constraint",
            "name": "upper",
            "expr": {
                "type": "comparison", "op": "le",
                "left": {"type": "variable", "name": "x",
                         "index_expr": [{"type": "index_variable", "name": "i"}]},
                "right": {"type": "parameter", "name": "cost",
                          "index_expr": [{"type": "index_variable", "name": "i"}]}
            },
            "quantifiers": [{"index": "i", "over": "I", "condition": null}]
        }"#;
        let constraint: Constraint = serde_json::from_str(json).unwrap();
        assert_eq!(constraint.name(), "upper");
        assert_eq!(constraint.display(), "x[i] <= cost[i] for i in I");

        let unknown = serde_json::from_str::<Constraint>(
            r#"{"type": "constraint", "name": "c", "weight": 2,
                "expr": {"type": "comparison", "op": "eq",
                         "left": {"type": "number", "value": 1},
                         "right": {"type": "number", "value": 1}}}"#,
        );
        assert!(unknown.is_err());
    }

    #[test]
    fn test_objective_defaults_to_min() {
        let objective: Objective = serde_json::from_str(
            r#"{"name": "cost", "expr": {"type": "variable", "name": "total"}}"#,
        )
        .unwrap();
        assert_eq!(objective.sense(), Sense::Min);
        assert_eq!(objective.to_string(), "min cost: total");
    }

    #[test]
    fn test_validate_walks_conditions() {
        let bad_condition = Comparison::index(
            Expr::parameter_at("p", vec![Expr::variable("x")]),
            ComparisonOperator::Gt,
            Expr::int(0),
        );
        let constraint = Constraint::new(
            "c",
            Comparison::new(
                Expr::sum(x_at("i"), vec![IndexBinding::new("i", "I")], None),
                ComparisonOperator::Le,
                Expr::int(1),
            ),
        )
        .with_quantifiers(vec![Quantifier::new("k", "K").with_condition(bad_condition)]);
        assert!(constraint.validate().is_err());
    }

    #[test]
    fn test_quantifier_condition_rejects_references() {
        let body = Comparison::new(x_at("i"), ComparisonOperator::Le, Expr::int(1));
        let on_variable = Constraint::new("c", body.clone()).with_quantifiers(vec![
            Quantifier::new("i", "I").with_condition(Comparison::index(
                x_at("i"),
                ComparisonOperator::Gt,
                Expr::int(0),
            )),
        ]);
        assert!(matches!(
            on_variable.validate(),
            Err(CompileError::InvalidIndexExpression { name, .. }) if name == "x[i] > 0"
        ));

        let on_parameter = Constraint::new("c", body.clone()).with_quantifiers(vec![
            Quantifier::new("i", "I").with_condition(Comparison::index(
                Expr::parameter("threshold"),
                ComparisonOperator::Lt,
                Expr::index_var("i"),
            )),
        ]);
        assert!(on_parameter.validate().is_err());

        let on_index = Constraint::new("c", body).with_quantifiers(vec![
            Quantifier::new("i", "I").with_condition(Comparison::index(
                Expr::index_var("i") - Expr::int(1),
                ComparisonOperator::Ge,
                Expr::int(1),
            )),
        ]);
        assert!(on_index.validate().is_ok());
    }
}
