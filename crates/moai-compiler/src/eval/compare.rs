//! Host scalar comparison for filter conditions.

use std::cmp::Ordering;

use moai_core::{CompileError, IndexSnapshot, Result, Scalar};

use crate::ops::ComparisonOperator;

/// Checks if two scalars are equal. Values of different kinds are never
/// equal; integers and floats compare numerically.
pub fn scalars_equal(a: &Scalar, b: &Scalar) -> bool {
    match (a, b) {
        (Scalar::Int(x), Scalar::Int(y)) => x == y,
        (Scalar::Str(x), Scalar::Str(y)) => x == y,
        (Scalar::Int(x), Scalar::Float(y)) => *x as f64 == *y,
        (Scalar::Float(x), Scalar::Int(y)) => *x == *y as f64,
        (Scalar::Float(x), Scalar::Float(y)) => x == y,
        _ => false,
    }
}

/// Orders two scalars of compatible kinds.
pub fn compare_scalars(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::Int(x), Scalar::Int(y)) => Some(x.cmp(y)),
        (Scalar::Str(x), Scalar::Str(y)) => Some(x.cmp(y)),
        (Scalar::Int(x), Scalar::Float(y)) => (*x as f64).partial_cmp(y),
        (Scalar::Float(x), Scalar::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Scalar::Float(x), Scalar::Float(y)) => x.partial_cmp(y),
        _ => None,
    }
}

/// Applies a comparison operator to two host scalars.
///
/// Ordering a string against a number is a `TypeMismatch`; a NaN operand
/// satisfies only `ne`.
pub(crate) fn holds(
    op: ComparisonOperator,
    left: &Scalar,
    right: &Scalar,
    context: impl FnOnce() -> IndexSnapshot,
) -> Result<bool> {
    match op {
        ComparisonOperator::Eq => return Ok(scalars_equal(left, right)),
        ComparisonOperator::Ne => return Ok(!scalars_equal(left, right)),
        _ => {}
    }
    if left.is_numeric() != right.is_numeric() {
        return Err(CompileError::TypeMismatch {
            op: op.name().to_string(),
            detail: format!("cannot order {} `{}` against {} `{}`", left.kind(), left, right.kind(), right),
            context: context(),
        });
    }
    Ok(compare_scalars(left, right).is_some_and(|ordering| op.holds(ordering)))
}
