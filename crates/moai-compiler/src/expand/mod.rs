//! Quantifier and aggregation expansion.

mod product;


use tracing::trace;

use moai_core::{CompileError, IndexTuple, Result, Scalar};

use crate::constraint::Constraint;
use crate::context::IndexContext;
use crate::eval::{eval_comparison, eval_condition, eval_expr, host_binary, lift, EvalContext};
use crate::expr::Aggregation;
use crate::ops::{AggregateOperator, BinaryOperator};
use crate::symbolic::{Resolved, ResolvedComparison, Symbolic};
use crate::target::TargetModel;

pub use product::CartesianProduct;

/// One concrete constraint. `index` is None when unquantified.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintInstance<V> {
    pub index: Option<IndexTuple>,
    pub comparison: ResolvedComparison<V>,
}

/// All instances of one constraint, in enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpansion<V> {
    pub instances: Vec<ConstraintInstance<V>>,
    /// Combinations rejected by a quantifier condition.
    pub skipped: u64,
}

/// Expands a constraint into one comparison per surviving combination.
///
/// The first quantifier is outermost. Every quantifier condition is
/// evaluated with all quantifier bindings in scope; a combination failing
/// any of them is skipped.
pub fn expand_constraint<T: TargetModel>(
    constraint: &Constraint,
    ctx: &EvalContext<'_, T>,
) -> Result<ConstraintExpansion<T::Var>> {
    let root = IndexContext::root();
    let quantifiers = constraint.quantifiers();

    if quantifiers.is_empty() {
        let comparison = eval_comparison(constraint.expr(), ctx, &root)?;
        return Ok(ConstraintExpansion {
            instances: vec![ConstraintInstance {
                index: None,
                comparison,
            }],
            skipped: 0,
        });
    }

    let axes = quantifiers
        .iter()
        .map(|q| ctx.set(&q.over).map(|set| set.elements()))
        .collect::<Result<Vec<_>>>()?;
    let product = CartesianProduct::new(axes);
    check_limit(product.size(), ctx.limits.max_instances_per_constraint, || {
        constraint.name().to_string()
    })?;

    let mut instances = Vec::new();
    let mut skipped = 0u64;
    'combinations: for tuple in product {
        let scope = root.child(
            quantifiers
                .iter()
                .map(|q| q.index_var.as_str())
                .zip(tuple.iter().cloned()),
        );

        for quantifier in quantifiers {
            if let Some(condition) = &quantifier.condition {
                if !eval_condition(condition, ctx, &scope)? {
                    trace!(
                        constraint = constraint.name(),
                        bindings = %scope.snapshot(),
                        "combination skipped"
                    );
                    skipped += 1;
                    continue 'combinations;
                }
            }
        }

        let comparison = eval_comparison(constraint.expr(), ctx, &scope)?;
        instances.push(ConstraintInstance {
            index: Some(tuple),
            comparison,
        });
    }

    Ok(ConstraintExpansion { instances, skipped })
}

/// Folds an aggregation into a single value.
///
/// Bindings are layered over `outer`, shadowing outer names only inside
/// the aggregation. An empty sum is `0`; a single term is returned as is.
pub fn expand_aggregation<T: TargetModel>(
    aggregation: &Aggregation,
    ctx: &EvalContext<'_, T>,
    outer: &IndexContext<'_>,
) -> Result<Resolved<T::Var>> {
    if aggregation.op != AggregateOperator::Sum {
        return Err(CompileError::UnsupportedAggregationOperator {
            op: aggregation.op.name().to_string(),
        });
    }

    let axes = aggregation
        .bindings
        .iter()
        .map(|b| ctx.set(b.set_name()).map(|set| set.elements()))
        .collect::<Result<Vec<_>>>()?;
    let product = CartesianProduct::new(axes);
    check_limit(product.size(), ctx.limits.max_aggregation_terms, || {
        aggregation.to_string()
    })?;

    let mut terms = Vec::new();
    for tuple in product {
        let scope = outer.child(
            aggregation
                .bindings
                .iter()
                .map(|b| b.index_var())
                .zip(tuple.into_iter()),
        );

        if let Some(condition) = &aggregation.condition {
            if !eval_condition(condition, ctx, &scope)? {
                continue;
            }
        }
        terms.push(eval_expr(&aggregation.expr, ctx, &scope)?);
    }

    fold_sum(terms, outer)
}

fn fold_sum<V>(mut terms: Vec<Resolved<V>>, outer: &IndexContext<'_>) -> Result<Resolved<V>> {
    match terms.len() {
        0 => return Ok(Resolved::Host(Scalar::Int(0))),
        1 => return Ok(terms.remove(0)),
        _ => {}
    }

    if terms.iter().all(Resolved::is_host) {
        let mut total = Scalar::Int(0);
        for term in &terms {
            if let Some(value) = term.as_host() {
                total = host_binary(BinaryOperator::Add, &total, value, || outer.snapshot())?;
            }
        }
        return Ok(Resolved::Host(total));
    }

    let terms = terms
        .into_iter()
        .map(|term| lift(term, AggregateOperator::Sum.name(), outer))
        .collect::<Result<Vec<_>>>()?;
    Ok(Resolved::Symbolic(Symbolic::Sum(terms)))
}

// The name is only rendered once the limit is exceeded.
fn check_limit<F>(combinations: u64, limit: Option<u64>, name: F) -> Result<()>
where
    F: FnOnce() -> String,
{
    match limit {
        Some(limit) if combinations > limit => Err(CompileError::LimitExceeded {
            name: name(),
            combinations,
            limit,
        }),
        _ => Ok(()),
    }
}
