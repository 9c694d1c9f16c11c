//! Values produced by evaluation.

use std::fmt;

use moai_core::{Number, Scalar};

use crate::ops::{ComparisonOperator, UnaryOperator};

/// An expression over decision-variable handles of type `V`.
///
/// Built only when at least one operand is not a host value; host
/// operands mixed into a symbolic node are carried as [`Symbolic::Const`].
#[derive(Debug, Clone, PartialEq)]
pub enum Symbolic<V> {
    Var(V),
    Const(Number),
    /// N-ary sum, terms in evaluation order.
    Sum(Vec<Symbolic<V>>),
    Difference(Box<Symbolic<V>>, Box<Symbolic<V>>),
    Product(Box<Symbolic<V>>, Box<Symbolic<V>>),
    Quotient(Box<Symbolic<V>>, Box<Symbolic<V>>),
    Neg(Box<Symbolic<V>>),
    Call(UnaryOperator, Box<Symbolic<V>>),
}

impl<V> Symbolic<V> {
    /// Collects the variable handles in left-to-right order.
    pub fn vars(&self) -> Vec<&V> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a V>) {
        match self {
            Symbolic::Var(v) => out.push(v),
            Symbolic::Const(_) => {}
            Symbolic::Sum(terms) => terms.iter().for_each(|t| t.collect_vars(out)),
            Symbolic::Difference(l, r) | Symbolic::Product(l, r) | Symbolic::Quotient(l, r) => {
                l.collect_vars(out);
                r.collect_vars(out);
            }
            Symbolic::Neg(e) | Symbolic::Call(_, e) => e.collect_vars(out),
        }
    }

    /// Number of top-level terms: the length of a sum, 1 otherwise.
    pub fn term_count(&self) -> usize {
        match self {
            Symbolic::Sum(terms) => terms.len(),
            _ => 1,
        }
    }

    /// Rewrites every handle, keeping the tree shape.
    pub fn map_vars<W, F>(self, f: &mut F) -> Symbolic<W>
    where
        F: FnMut(V) -> W,
    {
        match self {
            Symbolic::Var(v) => Symbolic::Var(f(v)),
            Symbolic::Const(n) => Symbolic::Const(n),
            Symbolic::Sum(terms) => Symbolic::Sum(terms.into_iter().map(|t| t.map_vars(f)).collect()),
            Symbolic::Difference(l, r) => {
                let l = l.map_vars(f);
                Symbolic::Difference(Box::new(l), Box::new(r.map_vars(f)))
            }
            Symbolic::Product(l, r) => {
                let l = l.map_vars(f);
                Symbolic::Product(Box::new(l), Box::new(r.map_vars(f)))
            }
            Symbolic::Quotient(l, r) => {
                let l = l.map_vars(f);
                Symbolic::Quotient(Box::new(l), Box::new(r.map_vars(f)))
            }
            Symbolic::Neg(e) => Symbolic::Neg(Box::new(e.map_vars(f))),
            Symbolic::Call(op, e) => Symbolic::Call(op, Box::new(e.map_vars(f))),
        }
    }
}

impl<V: fmt::Display> fmt::Display for Symbolic<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbolic::Var(v) => write!(f, "{}", v),
            Symbolic::Const(n) => write!(f, "{}", n),
            Symbolic::Sum(terms) => {
                f.write_str("(")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{}", term)?;
                }
                f.write_str(")")
            }
            Symbolic::Difference(l, r) => write!(f, "({} - {})", l, r),
            Symbolic::Product(l, r) => write!(f, "({} * {})", l, r),
            Symbolic::Quotient(l, r) => write!(f, "({} / {})", l, r),
            Symbolic::Neg(e) => write!(f, "(-{})", e),
            Symbolic::Call(op, e) => write!(f, "({} {})", op, e),
        }
    }
}

/// Result of evaluating an expression: a host scalar or a symbolic
/// expression over decision variables.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<V> {
    Host(Scalar),
    Symbolic(Symbolic<V>),
}

impl<V> Resolved<V> {
    pub fn is_host(&self) -> bool {
        matches!(self, Resolved::Host(_))
    }

    pub fn as_host(&self) -> Option<&Scalar> {
        match self {
            Resolved::Host(s) => Some(s),
            Resolved::Symbolic(_) => None,
        }
    }

    pub fn as_symbolic(&self) -> Option<&Symbolic<V>> {
        match self {
            Resolved::Symbolic(s) => Some(s),
            Resolved::Host(_) => None,
        }
    }

    /// Lifts into a symbolic node. Strings have no symbolic form.
    pub fn into_symbolic(self) -> Option<Symbolic<V>> {
        match self {
            Resolved::Symbolic(s) => Some(s),
            Resolved::Host(scalar) => scalar.as_number().map(Symbolic::Const),
        }
    }
}

impl<V> From<Scalar> for Resolved<V> {
    fn from(value: Scalar) -> Self {
        Resolved::Host(value)
    }
}

impl<V> From<Symbolic<V>> for Resolved<V> {
    fn from(value: Symbolic<V>) -> Self {
        Resolved::Symbolic(value)
    }
}

impl<V: fmt::Display> fmt::Display for Resolved<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Host(s) => write!(f, "{}", s),
            Resolved::Symbolic(s) => write!(f, "{}", s),
        }
    }
}

/// A comparison with both sides evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComparison<V> {
    pub left: Resolved<V>,
    pub op: ComparisonOperator,
    pub right: Resolved<V>,
}

impl<V> ResolvedComparison<V> {
    pub fn new(left: Resolved<V>, op: ComparisonOperator, right: Resolved<V>) -> Self {
        Self { left, op, right }
    }

    /// True when neither side references a decision variable.
    pub fn is_host(&self) -> bool {
        self.left.is_host() && self.right.is_host()
    }
}

impl<V: fmt::Display> fmt::Display for ResolvedComparison<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let sum: Symbolic<&str> = Symbolic::Sum(vec![
            Symbolic::Var("a"),
            Symbolic::Neg(Box::new(Symbolic::Var("b"))),
            Symbolic::Call(UnaryOperator::Sin, Box::new(Symbolic::Var("c"))),
        ]);
        assert_eq!(sum.to_string(), "(a + (-b) + (sin c))");
        assert_eq!(sum.term_count(), 3);
        assert_eq!(sum.vars(), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn test_host_strings_have_no_symbolic_form() {
        let s: Resolved<&str> = Resolved::Host(Scalar::from("a"));
        assert!(s.into_symbolic().is_none());
        let n: Resolved<&str> = Resolved::Host(Scalar::Int(2));
        assert_eq!(n.into_symbolic(), Some(Symbolic::Const(Number::Int(2))));
    }

    #[test]
    fn test_map_vars() {
        let expr: Symbolic<u32> = Symbolic::Product(
            Box::new(Symbolic::Const(Number::Float(2.0))),
            Box::new(Symbolic::Var(7)),
        );
        let mapped = expr.map_vars(&mut |v| format!("v{}", v));
        assert_eq!(mapped.to_string(), "(2.0 * v7)");
    }

    #[test]
    fn test_resolved_comparison_display() {
        let cmp: ResolvedComparison<&str> = ResolvedComparison::new(
            Resolved::Symbolic(Symbolic::Var("x[1]")),
            ComparisonOperator::Le,
            Resolved::Host(Scalar::Float(5.0)),
        );
        assert_eq!(cmp.to_string(), "x[1] <= 5.0");
        assert!(!cmp.is_host());
    }
}
