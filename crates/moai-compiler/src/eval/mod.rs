//! Expression evaluation under an index context.
//!
//! Evaluation is pure: it reads declarations and asks the target for
//! variable handles, but never mutates either.

mod arith;
mod compare;


use moai_core::{
    CompileError, IndexTuple, Parameter, RefKind, Result, Scalar, Set, Variable,
};
use moai_config::LimitsConfig;

use crate::constraint::Comparison;
use crate::context::IndexContext;
use crate::expand::expand_aggregation;
use crate::expr::Expr;
use crate::ops::{BinaryOperator, UnaryOperator};
use crate::registry::NamedList;
use crate::symbolic::{Resolved, ResolvedComparison, Symbolic};
use crate::target::TargetModel;

pub(crate) use arith::binary as host_binary;

/// Everything evaluation reads besides the index bindings.
pub struct EvalContext<'a, T: TargetModel> {
    pub sets: &'a NamedList<Set>,
    pub parameters: &'a NamedList<Parameter>,
    pub variables: &'a NamedList<Variable>,
    /// Source of variable handles.
    pub target: &'a T,
    pub limits: LimitsConfig,
}

impl<'a, T: TargetModel> EvalContext<'a, T> {
    pub fn new(
        sets: &'a NamedList<Set>,
        parameters: &'a NamedList<Parameter>,
        variables: &'a NamedList<Variable>,
        target: &'a T,
    ) -> Self {
        Self {
            sets,
            parameters,
            variables,
            target,
            limits: LimitsConfig::default(),
        }
    }

    pub fn with_limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Looks up a set by name.
    pub fn set(&self, name: &str) -> Result<&'a Set> {
        self.sets.get(name).ok_or_else(|| CompileError::UnknownSet {
            name: name.to_string(),
        })
    }
}

/// Evaluates an expression to a host scalar or a symbolic expression.
pub fn eval_expr<T: TargetModel>(
    expr: &Expr,
    ctx: &EvalContext<'_, T>,
    index: &IndexContext<'_>,
) -> Result<Resolved<T::Var>> {
    match expr {
        Expr::Number { value } => Ok(Resolved::Host(Scalar::from(*value))),

        Expr::String { value } => Ok(Resolved::Host(Scalar::Str(value.clone()))),

        Expr::IndexVariable { name } => index
            .get(name)
            .map(|value| Resolved::Host(Scalar::from(value.clone())))
            .ok_or_else(|| CompileError::UnboundIndexVariable {
                name: name.clone(),
                context: index.snapshot(),
            }),

        Expr::Variable { name, index_expr } => {
            let variable = ctx
                .variables
                .get(name)
                .ok_or_else(|| CompileError::UnknownVariable {
                    name: name.clone(),
                    context: index.snapshot(),
                })?;
            let tuple = resolve_index(
                RefKind::Variable,
                name,
                variable.dimension(),
                index_expr.as_deref(),
                ctx,
                index,
            )?;
            match ctx.target.variable(name, &tuple) {
                Some(handle) => Ok(Resolved::Symbolic(Symbolic::Var(handle))),
                None => Err(CompileError::VariableIndexOutOfRange {
                    name: name.clone(),
                    index: tuple,
                    context: index.snapshot(),
                }),
            }
        }

        Expr::Parameter { name, index_expr } => {
            let parameter = ctx
                .parameters
                .get(name)
                .ok_or_else(|| CompileError::UnknownParameter {
                    name: name.clone(),
                    context: index.snapshot(),
                })?;
            let tuple = resolve_index(
                RefKind::Parameter,
                name,
                parameter.dimension(),
                index_expr.as_deref(),
                ctx,
                index,
            )?;
            match parameter.get(&tuple) {
                Some(value) => Ok(Resolved::Host(Scalar::from(value))),
                None => Err(CompileError::MissingParameterValue {
                    name: name.clone(),
                    index: tuple,
                    context: index.snapshot(),
                }),
            }
        }

        Expr::UnaryOp { op, expr } => match eval_expr(expr, ctx, index)? {
            Resolved::Host(value) => {
                arith::unary(*op, &value, || index.snapshot()).map(Resolved::Host)
            }
            Resolved::Symbolic(operand) => Ok(Resolved::Symbolic(match op {
                UnaryOperator::Negate => Symbolic::Neg(Box::new(operand)),
                _ => Symbolic::Call(*op, Box::new(operand)),
            })),
        },

        Expr::BinaryOp { op, left, right } => {
            let left = eval_expr(left, ctx, index)?;
            let right = eval_expr(right, ctx, index)?;
            match (left, right) {
                (Resolved::Host(l), Resolved::Host(r)) => {
                    arith::binary(*op, &l, &r, || index.snapshot()).map(Resolved::Host)
                }
                (l, r) => {
                    let l = lift(l, op.name(), index)?;
                    let r = lift(r, op.name(), index)?;
                    Ok(Resolved::Symbolic(match op {
                        BinaryOperator::Add => Symbolic::Sum(vec![l, r]),
                        BinaryOperator::Sub => Symbolic::Difference(Box::new(l), Box::new(r)),
                        BinaryOperator::Mul => Symbolic::Product(Box::new(l), Box::new(r)),
                        BinaryOperator::Div => Symbolic::Quotient(Box::new(l), Box::new(r)),
                    }))
                }
            }
        }

        Expr::Aggregation(aggregation) => expand_aggregation(aggregation, ctx, index),
    }
}

/// Evaluates both sides of a comparison.
pub fn eval_comparison<T: TargetModel>(
    comparison: &Comparison,
    ctx: &EvalContext<'_, T>,
    index: &IndexContext<'_>,
) -> Result<ResolvedComparison<T::Var>> {
    let left = eval_expr(&comparison.left, ctx, index)?;
    let right = eval_expr(&comparison.right, ctx, index)?;
    Ok(ResolvedComparison::new(left, comparison.op, right))
}

/// Evaluates a filter condition to a boolean.
///
/// # Errors
///
/// `NonScalarCondition` if either side references a decision variable.
pub fn eval_condition<T: TargetModel>(
    condition: &Comparison,
    ctx: &EvalContext<'_, T>,
    index: &IndexContext<'_>,
) -> Result<bool> {
    let resolved = eval_comparison(condition, ctx, index)?;
    match (resolved.left.as_host(), resolved.right.as_host()) {
        (Some(left), Some(right)) => {
            compare::holds(condition.op, left, right, || index.snapshot())
        }
        _ => Err(CompileError::NonScalarCondition {
            condition: condition.display(),
            context: index.snapshot(),
        }),
    }
}

/// Lifts an operand into a symbolic node for mixed arithmetic.
pub(crate) fn lift<V>(value: Resolved<V>, op: &str, index: &IndexContext<'_>) -> Result<Symbolic<V>> {
    match value {
        Resolved::Host(Scalar::Str(s)) => Err(CompileError::TypeMismatch {
            op: op.to_string(),
            detail: format!("string operand `{}` in a symbolic expression", s),
            context: index.snapshot(),
        }),
        other => other.into_symbolic().ok_or_else(|| CompileError::TypeMismatch {
            op: op.to_string(),
            detail: "operand has no symbolic form".to_string(),
            context: index.snapshot(),
        }),
    }
}

/// Resolves the index positions of a variable or parameter reference to
/// a concrete tuple. A missing list means dimension 0.
fn resolve_index<T: TargetModel>(
    kind: RefKind,
    name: &str,
    dimension: usize,
    positions: Option<&[Expr]>,
    ctx: &EvalContext<'_, T>,
    index: &IndexContext<'_>,
) -> Result<IndexTuple> {
    let positions = positions.unwrap_or(&[]);
    if positions.len() != dimension {
        return Err(CompileError::DimensionMismatch {
            kind,
            name: name.to_string(),
            expected: dimension,
            found: positions.len(),
            context: index.snapshot(),
        });
    }

    positions
        .iter()
        .map(|position| match eval_expr(position, ctx, index)? {
            Resolved::Host(value) => {
                value
                    .to_index_value()
                    .ok_or_else(|| CompileError::InvalidIndexExpression {
                        name: name.to_string(),
                        detail: format!("`{}` evaluated to {} `{}`", position, value.kind(), value),
                        context: index.snapshot(),
                    })
            }
            Resolved::Symbolic(_) => Err(CompileError::InvalidIndexExpression {
                name: name.to_string(),
                detail: format!("`{}` references a decision variable", position),
                context: index.snapshot(),
            }),
        })
        .collect()
}
