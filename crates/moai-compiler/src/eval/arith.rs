//! Eager host arithmetic.

use moai_core::{CompileError, IndexSnapshot, Result, Scalar};

use crate::ops::{BinaryOperator, UnaryOperator};

/// Folds a unary operator over a host operand.
///
/// Negation keeps integers integral; every math function works on the
/// value widened to f64.
pub(crate) fn unary(
    op: UnaryOperator,
    value: &Scalar,
    context: impl FnOnce() -> IndexSnapshot,
) -> Result<Scalar> {
    match (op, value) {
        (UnaryOperator::Negate, Scalar::Int(v)) => Ok(v
            .checked_neg()
            .map(Scalar::Int)
            .unwrap_or(Scalar::Float(-(*v as f64)))),
        (_, Scalar::Str(s)) => Err(CompileError::TypeMismatch {
            op: op.name().to_string(),
            detail: format!("string operand `{}`", s),
            context: context(),
        }),
        (_, other) => {
            let x = other.as_f64().unwrap_or_default();
            Ok(Scalar::Float(op.apply_f64(x)))
        }
    }
}

/// Folds a binary operator over two host operands.
///
/// Integer add/sub/mul stays integral (widening to float on overflow);
/// division always yields a float.
pub(crate) fn binary(
    op: BinaryOperator,
    left: &Scalar,
    right: &Scalar,
    context: impl FnOnce() -> IndexSnapshot,
) -> Result<Scalar> {
    let (l, r) = match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            return Err(CompileError::TypeMismatch {
                op: op.name().to_string(),
                detail: format!(
                    "cannot apply `{}` to {} `{}` and {} `{}`",
                    op,
                    left.kind(),
                    left,
                    right.kind(),
                    right
                ),
                context: context(),
            })
        }
    };

    if let (Scalar::Int(a), Scalar::Int(b)) = (left, right) {
        let exact = match op {
            BinaryOperator::Add => Some(a.checked_add(*b)),
            BinaryOperator::Sub => Some(a.checked_sub(*b)),
            BinaryOperator::Mul => Some(a.checked_mul(*b)),
            BinaryOperator::Div => None,
        };
        if let Some(Some(v)) = exact {
            return Ok(Scalar::Int(v));
        }
    }

    match op {
        BinaryOperator::Add => Ok(Scalar::Float(l + r)),
        BinaryOperator::Sub => Ok(Scalar::Float(l - r)),
        BinaryOperator::Mul => Ok(Scalar::Float(l * r)),
        BinaryOperator::Div => {
            if r == 0.0 {
                return Err(CompileError::DivisionByZero { context: context() });
            }
            Ok(Scalar::Float(l / r))
        }
    }
}
