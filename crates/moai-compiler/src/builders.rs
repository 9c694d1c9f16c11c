//! Short constructors for writing models in code.
//!
//! ```
//! use moai_compiler::builders::*;
//!
//! // x[t - 1] <= capacity
//! let c = le(
//!     var("x", [index_sub(index_var("t"), int(1))]),
//!     param("capacity", []),
//! );
//! assert_eq!(c.display(), "x[(t - 1)] <= capacity");
//! ```

use moai_core::{Number, Result};

use crate::constraint::Comparison;
use crate::expr::{Expr, IndexBinding};
use crate::ops::{BinaryOperator, ComparisonOperator, UnaryOperator};

/// Variable reference. An empty index list means unindexed.
pub fn var(name: &str, index: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::variable_at(name, index.into_iter().collect())
}

/// Parameter reference. An empty index list means unindexed.
pub fn param(name: &str, index: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::parameter_at(name, index.into_iter().collect())
}

pub fn num(value: impl Into<Number>) -> Expr {
    Expr::number(value)
}

pub fn int(value: i64) -> Expr {
    Expr::int(value)
}

pub fn string(value: &str) -> Expr {
    Expr::string(value)
}

pub fn index_var(name: &str) -> Expr {
    Expr::index_var(name)
}

/// Binary operation from an operator name such as `"add"` or `"*"`.
pub fn binop(left: Expr, right: Expr, op: &str) -> Result<Expr> {
    Ok(Expr::binary(op.parse::<BinaryOperator>()?, left, right))
}

/// Unary operation from an operator name such as `"sin"` or `"sub"`.
pub fn unary_op(operand: Expr, op: &str) -> Result<Expr> {
    Ok(Expr::unary(op.parse::<UnaryOperator>()?, operand))
}

pub fn sin(argument: Expr) -> Expr {
    Expr::unary(UnaryOperator::Sin, argument)
}

pub fn cos(argument: Expr) -> Expr {
    Expr::unary(UnaryOperator::Cos, argument)
}

pub fn tan(argument: Expr) -> Expr {
    Expr::unary(UnaryOperator::Tan, argument)
}

pub fn exp(argument: Expr) -> Expr {
    Expr::unary(UnaryOperator::Exp, argument)
}

pub fn log(argument: Expr) -> Expr {
    Expr::unary(UnaryOperator::Log, argument)
}

pub fn negate(operand: Expr) -> Expr {
    Expr::negate(operand)
}

pub fn le(left: Expr, right: Expr) -> Comparison {
    Comparison::new(left, ComparisonOperator::Le, right)
}

pub fn lt(left: Expr, right: Expr) -> Comparison {
    Comparison::new(left, ComparisonOperator::Lt, right)
}

pub fn eq(left: Expr, right: Expr) -> Comparison {
    Comparison::new(left, ComparisonOperator::Eq, right)
}

pub fn gt(left: Expr, right: Expr) -> Comparison {
    Comparison::new(left, ComparisonOperator::Gt, right)
}

pub fn ge(left: Expr, right: Expr) -> Comparison {
    Comparison::new(left, ComparisonOperator::Ge, right)
}

pub fn ne(left: Expr, right: Expr) -> Comparison {
    Comparison::new(left, ComparisonOperator::Ne, right)
}

/// `sum(body for bindings [if condition])`.
pub fn sum(
    body: Expr,
    bindings: impl IntoIterator<Item = IndexBinding>,
    condition: Option<Comparison>,
) -> Expr {
    Expr::sum(body, bindings.into_iter().collect(), condition)
}

/// `index_var in set_name`.
pub fn bind(index_var: &str, set_name: &str) -> IndexBinding {
    IndexBinding::new(index_var, set_name)
}

pub fn index_add(left: Expr, right: Expr) -> Expr {
    Expr::add(left, right)
}

pub fn index_sub(left: Expr, right: Expr) -> Expr {
    Expr::sub(left, right)
}

pub fn index_negate(expr: Expr) -> Expr {
    Expr::negate(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moai_core::CompileError;

    #[test]
    fn test_builders_match_constructors() {
        assert_eq!(var("x", []), Expr::variable_at("x", vec![]));
        assert_eq!(var("x", []).display(), "x");
        assert_eq!(
            sum(var("x", [index_var("i")]), [bind("i", "I")], None).display(),
            "sum(x[i] for i in I)"
        );
        assert_eq!(index_negate(index_var("t")).display(), "(-t)");
        assert_eq!(ne(index_var("i"), index_var("j")).display(), "i != j");
    }

    #[test]
    fn test_named_operators() {
        let e = binop(int(2), index_var("t"), "mul").unwrap();
        assert_eq!(e.display(), "(2 * t)");
        let e = unary_op(var("x", []), "sub").unwrap();
        assert_eq!(e.display(), "(-x)");

        assert!(matches!(
            binop(int(1), int(2), "pow"),
            Err(CompileError::UnsupportedOperator { op }) if op == "pow"
        ));
        assert!(unary_op(int(1), "sqrt").is_err());
    }
}
