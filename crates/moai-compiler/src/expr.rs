//! Expression trees for declarative model definitions.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use moai_core::{CompileError, IndexSnapshot, Number, Result};

use crate::constraint::Comparison;
use crate::ops::{AggregateOperator, BinaryOperator, UnaryOperator};

/// An expression tree node.
///
/// Expressions are evaluated under an index context and resolve either to
/// a host scalar or to a symbolic expression over decision variables.
/// In documents each node is an object discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum Expr {
    Number {
        value: Number,
    },
    String {
        value: String,
    },
    /// Placeholder bound by a quantifier or aggregation.
    IndexVariable {
        name: String,
    },
    Variable {
        name: String,
        #[serde(default)]
        index_expr: Option<Vec<Expr>>,
    },
    Parameter {
        name: String,
        #[serde(default)]
        index_expr: Option<Vec<Expr>>,
    },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Aggregation(Box<Aggregation>),
}

/// Binds an index variable to the elements of a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexBinding {
    #[serde(rename = "type", default)]
    tag: BindingTag,
    index_var: String,
    set_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BindingTag {
    #[default]
    IndexBinding,
}

impl IndexBinding {
    pub fn new(index_var: impl Into<String>, set_name: impl Into<String>) -> Self {
        Self {
            tag: BindingTag::IndexBinding,
            index_var: index_var.into(),
            set_name: set_name.into(),
        }
    }

    pub fn index_var(&self) -> &str {
        &self.index_var
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }
}

/// A fold over the Cartesian product of one or more bound sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Aggregation {
    pub op: AggregateOperator,
    pub expr: Box<Expr>,
    pub bindings: Vec<IndexBinding>,
    #[serde(default)]
    pub condition: Option<Comparison>,
}

impl Aggregation {
    pub fn new(
        op: AggregateOperator,
        expr: Expr,
        bindings: Vec<IndexBinding>,
        condition: Option<Comparison>,
    ) -> Self {
        Self {
            op,
            expr: Box::new(expr),
            bindings,
            condition,
        }
    }
}

impl Expr {
    // Constructors for every node kind

    pub fn number(value: impl Into<Number>) -> Self {
        Expr::Number {
            value: value.into(),
        }
    }

    pub fn int(value: i64) -> Self {
        Expr::Number {
            value: Number::Int(value),
        }
    }

    pub fn float(value: f64) -> Self {
        Expr::Number {
            value: Number::Float(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String {
            value: value.into(),
        }
    }

    pub fn index_var(name: impl Into<String>) -> Self {
        Expr::IndexVariable { name: name.into() }
    }

    /// Unindexed variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable {
            name: name.into(),
            index_expr: None,
        }
    }

    pub fn variable_at(name: impl Into<String>, index: Vec<Expr>) -> Self {
        Expr::Variable {
            name: name.into(),
            index_expr: Some(index),
        }
    }

    /// Unindexed parameter reference.
    pub fn parameter(name: impl Into<String>) -> Self {
        Expr::Parameter {
            name: name.into(),
            index_expr: None,
        }
    }

    pub fn parameter_at(name: impl Into<String>, index: Vec<Expr>) -> Self {
        Expr::Parameter {
            name: name.into(),
            index_expr: Some(index),
        }
    }

    pub fn unary(op: UnaryOperator, expr: Expr) -> Self {
        Expr::UnaryOp {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn negate(expr: Expr) -> Self {
        Expr::unary(UnaryOperator::Negate, expr)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOperator::Add, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOperator::Sub, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOperator::Mul, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn div(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOperator::Div, left, right)
    }

    pub fn aggregation(aggregation: Aggregation) -> Self {
        Expr::Aggregation(Box::new(aggregation))
    }

    /// `sum(body for bindings [if condition])`.
    pub fn sum(body: Expr, bindings: Vec<IndexBinding>, condition: Option<Comparison>) -> Self {
        Expr::aggregation(Aggregation::new(
            AggregateOperator::Sum,
            body,
            bindings,
            condition,
        ))
    }

    /// Returns true if this node may appear in an index position.
    ///
    /// Only literals, index variables and unary/binary operators over
    /// them are index expressions.
    pub fn is_index_expr(&self) -> bool {
        match self {
            Expr::Number { .. } | Expr::String { .. } | Expr::IndexVariable { .. } => true,
            Expr::UnaryOp { expr, .. } => expr.is_index_expr(),
            Expr::BinaryOp { left, right, .. } => left.is_index_expr() && right.is_index_expr(),
            Expr::Variable { .. } | Expr::Parameter { .. } | Expr::Aggregation(_) => false,
        }
    }

    /// Checks that this tree is an index expression.
    ///
    /// `owner` names the reference or condition the expression indexes.
    pub fn validate_index(&self, owner: &str) -> Result<()> {
        match self {
            Expr::Number { .. } | Expr::String { .. } | Expr::IndexVariable { .. } => Ok(()),
            Expr::UnaryOp { expr, .. } => expr.validate_index(owner),
            Expr::BinaryOp { left, right, .. } => {
                left.validate_index(owner)?;
                right.validate_index(owner)
            }
            Expr::Variable { name, .. } | Expr::Parameter { name, .. } => {
                Err(CompileError::InvalidIndexExpression {
                    name: owner.to_string(),
                    detail: format!("reference to `{}` cannot appear in an index position", name),
                    context: IndexSnapshot::empty(),
                })
            }
            Expr::Aggregation(agg) => Err(CompileError::InvalidIndexExpression {
                name: owner.to_string(),
                detail: format!("{} aggregation cannot appear in an index position", agg.op),
                context: IndexSnapshot::empty(),
            }),
        }
    }

    /// Checks every index position and filter condition in the tree.
    pub fn validate(&self) -> Result<()> {
        match self {
            Expr::Number { .. } | Expr::String { .. } | Expr::IndexVariable { .. } => Ok(()),
            Expr::Variable { name, index_expr } | Expr::Parameter { name, index_expr } => {
                for position in index_expr.iter().flatten() {
                    position.validate_index(name)?;
                }
                Ok(())
            }
            Expr::UnaryOp { expr, .. } => expr.validate(),
            Expr::BinaryOp { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Expr::Aggregation(agg) => {
                if let Some(condition) = &agg.condition {
                    condition.validate_index()?;
                }
                agg.expr.validate()
            }
        }
    }

    /// Fully parenthesized infix rendering. Never evaluates.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

fn write_index_list(f: &mut fmt::Formatter<'_>, name: &str, index: &Option<Vec<Expr>>) -> fmt::Result {
    f.write_str(name)?;
    match index {
        Some(positions) if !positions.is_empty() => {
            f.write_str("[")?;
            for (i, position) in positions.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", position)?;
            }
            f.write_str("]")
        }
        _ => Ok(()),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number { value } => write!(f, "{}", value),
            Expr::String { value } => f.write_str(value),
            Expr::IndexVariable { name } => f.write_str(name),
            Expr::Variable { name, index_expr } | Expr::Parameter { name, index_expr } => {
                write_index_list(f, name, index_expr)
            }
            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Negate => write!(f, "(-{})", expr),
                _ => write!(f, "({} {})", op, expr),
            },
            Expr::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Aggregation(agg) => write!(f, "{}", agg),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} for ", self.op, self.expr)?;
        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} in {}", binding.index_var, binding.set_name)?;
        }
        if let Some(condition) = &self.condition {
            write!(f, " if {}", condition)?;
        }
        f.write_str(")")
    }
}

// Implement std::ops traits for operator syntax

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOperator::Add, self, rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOperator::Sub, self, rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOperator::Mul, self, rhs)
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::binary(BinaryOperator::Div, self, rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::negate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Comparison;
    use crate::ops::ComparisonOperator;

    #[test]
    fn test_display_leaves() {
        assert_eq!(Expr::index_var("i").display(), "i");
        assert_eq!(Expr::int(5).display(), "5");
        assert_eq!(Expr::float(5.0).display(), "5.0");
        assert_eq!(Expr::string("a").display(), "a");
        assert_eq!(Expr::variable("x").display(), "x");
        assert_eq!(Expr::variable_at("x", vec![]).display(), "x");
    }

    #[test]
    fn test_display_parenthesizes_every_operator() {
        let nested = Expr::index_var("i") + Expr::int(1) + Expr::int(2);
        assert_eq!(nested.display(), "((i + 1) + 2)");
        assert_eq!((-Expr::index_var("i")).display(), "(-i)");
        assert_eq!(
            Expr::unary(UnaryOperator::Sin, Expr::variable("a")).display(),
            "(sin a)"
        );
    }

    #[test]
    fn test_display_index_lists() {
        let x = Expr::variable_at(
            "x",
            vec![Expr::index_var("t") - Expr::int(1), Expr::index_var("i")],
        );
        assert_eq!(x.display(), "x[(t - 1), i]");
    }

    #[test]
    fn test_display_aggregation_with_unbound_indices() {
        let body = Expr::parameter_at("cost", vec![Expr::index_var("i")])
            * Expr::variable_at("x", vec![Expr::index_var("i")]);
        let sum = Expr::sum(
            body,
            vec![IndexBinding::new("i", "I")],
            Some(Comparison::index(
                Expr::index_var("i"),
                ComparisonOperator::Ne,
                Expr::index_var("j"),
            )),
        );
        assert_eq!(sum.display(), "sum((cost[i] * x[i]) for i in I if i != j)");
    }

    #[test]
    fn test_validate_rejects_references_in_index_positions() {
        let bad = Expr::variable_at("x", vec![Expr::parameter("p")]);
        assert!(matches!(
            bad.validate(),
            Err(CompileError::InvalidIndexExpression { name, .. }) if name == "x"
        ));

        let good = Expr::variable_at("x", vec![Expr::index_var("t") - Expr::int(1)]);
        assert!(good.validate().is_ok());
        assert!(!Expr::variable("x").is_index_expr());
    }

    #[test]
    fn test_nested_aggregations_with_conditions() {
        let inner = Expr::sum(
            Expr::variable_at("x", vec![Expr::index_var("j")]),
            vec![IndexBinding::new("j", "J")],
            Some(Comparison::index(
                Expr::index_var("j"),
                ComparisonOperator::Ne,
                Expr::index_var("i"),
            )),
        );
        let outer = Expr::sum(
            inner,
            vec![IndexBinding::new("i", "I")],
            Some(Comparison::index(
                Expr::index_var("i"),
                ComparisonOperator::Gt,
                Expr::int(1),
            )),
        );
        assert_eq!(
            outer.display(),
            "sum(sum(x[j] for j in J if j != i) for i in I if i > 1)"
        );
        assert!(outer.validate().is_ok());

        let back: Expr = serde_json::from_str(&serde_json::to_string(&outer).unwrap()).unwrap();
        assert_eq!(back, outer);
    }

    #[test]
    fn test_aggregation_condition_must_be_index_expression() {
        let over_variable = Expr::sum(
            Expr::variable_at("x", vec![Expr::index_var("i")]),
            vec![IndexBinding::new("i", "I")],
            Some(Comparison::index(
                Expr::variable_at("x", vec![Expr::index_var("i")]),
                ComparisonOperator::Gt,
                Expr::int(0),
            )),
        );
        assert!(matches!(
            over_variable.validate(),
            Err(CompileError::InvalidIndexExpression { name, .. }) if name == "x[i] > 0"
        ));

        let over_parameter = Expr::sum(
            Expr::variable_at("x", vec![Expr::index_var("i")]),
            vec![IndexBinding::new("i", "I")],
            Some(Comparison::index(
                Expr::int(10),
                ComparisonOperator::Le,
                Expr::parameter_at("cost", vec![Expr::index_var("i")]),
            )),
        );
        assert!(over_parameter.validate().is_err());
    }

    #[test]
    fn test_document_shape() {
        let json = r#"{
            "type": "binary_op", "op": "mul",
            "left": {"type": "parameter", "name": "cost",
                     "index_expr": [{"type": "index_variable", "name": "i"}]},
            "right": {"type": "variable", "name": "x",
                      "index_expr": [{"type": "index_variable", "name": "i"}]}
        }"#;
        let expr: Expr = serde_json::from_str(json).unwrap();
        assert_eq!(expr.display(), "(cost[i] * x[i])");

        let unknown = serde_json::from_str::<Expr>(r#"{"type": "number", "value": 1, "unit": "kg"}"#);
        assert!(unknown.is_err());
        let bad_tag = serde_json::from_str::<Expr>(r#"{"type": "matrix", "value": 1}"#);
        assert!(bad_tag.is_err());
    }

    #[test]
    fn test_document_aggregation() {
        let json = r#"{
            "type": "aggregation", "op": "sum",
            "expr": {"type": "variable", "name": "x",
                     "index_expr": [{"type": "index_variable", "name": "i"}]},
            "bindings": [{"type": "index_binding", "index_var": "i", "set_name": "I"}],
            "condition": null
        }"#;
        let expr: Expr = serde_json::from_str(json).unwrap();
        assert_eq!(expr.display(), "sum(x[i] for i in I)");
        let back: Expr = serde_json::from_str(&serde_json::to_string(&expr).unwrap()).unwrap();
        assert_eq!(back, expr);
    }
}
