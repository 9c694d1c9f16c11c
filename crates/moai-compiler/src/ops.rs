//! Operator tags for expression nodes.
//!
//! Each operator parses from its document name (`"add"`) or its symbol
//! (`"+"`); anything else is rejected with `UnsupportedOperator`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use moai_core::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    #[serde(alias = "sub")]
    Negate,
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
}

impl UnaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "negate",
            UnaryOperator::Sin => "sin",
            UnaryOperator::Cos => "cos",
            UnaryOperator::Tan => "tan",
            UnaryOperator::Exp => "exp",
            UnaryOperator::Log => "log",
        }
    }

    /// Applies the math function to a host float. Negation is handled by
    /// the caller so integers stay integral.
    pub fn apply_f64(&self, x: f64) -> f64 {
        match self {
            UnaryOperator::Negate => -x,
            UnaryOperator::Sin => x.sin(),
            UnaryOperator::Cos => x.cos(),
            UnaryOperator::Tan => x.tan(),
            UnaryOperator::Exp => x.exp(),
            UnaryOperator::Log => x.ln(),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => f.write_str("-"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for UnaryOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "negate" | "sub" | "-" => Ok(UnaryOperator::Negate),
            "sin" => Ok(UnaryOperator::Sin),
            "cos" => Ok(UnaryOperator::Cos),
            "tan" => Ok(UnaryOperator::Tan),
            "exp" => Ok(UnaryOperator::Exp),
            "log" => Ok(UnaryOperator::Log),
            other => Err(CompileError::UnsupportedOperator {
                op: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for BinaryOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" | "+" => Ok(BinaryOperator::Add),
            "sub" | "-" => Ok(BinaryOperator::Sub),
            "mul" | "*" => Ok(BinaryOperator::Mul),
            "div" | "/" => Ok(BinaryOperator::Div),
            other => Err(CompileError::UnsupportedOperator {
                op: other.to_string(),
            }),
        }
    }
}

/// Aggregation operators. Only `Sum` folds; the others are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOperator {
    Sum,
    Prod,
    Min,
    Max,
}

impl AggregateOperator {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateOperator::Sum => "sum",
            AggregateOperator::Prod => "prod",
            AggregateOperator::Min => "min",
            AggregateOperator::Max => "max",
        }
    }
}

impl fmt::Display for AggregateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(AggregateOperator::Sum),
            "prod" => Ok(AggregateOperator::Prod),
            "min" => Ok(AggregateOperator::Min),
            "max" => Ok(AggregateOperator::Max),
            other => Err(CompileError::UnsupportedAggregationOperator {
                op: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Le,
    Lt,
    Eq,
    Gt,
    Ge,
    Ne,
}

impl ComparisonOperator {
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonOperator::Le => "le",
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Eq => "eq",
            ComparisonOperator::Gt => "gt",
            ComparisonOperator::Ge => "ge",
            ComparisonOperator::Ne => "ne",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Eq => "==",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Ne => "!=",
        }
    }

    /// Tests an ordering against this operator.
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        match self {
            ComparisonOperator::Le => ordering.is_le(),
            ComparisonOperator::Lt => ordering.is_lt(),
            ComparisonOperator::Eq => ordering.is_eq(),
            ComparisonOperator::Gt => ordering.is_gt(),
            ComparisonOperator::Ge => ordering.is_ge(),
            ComparisonOperator::Ne => ordering.is_ne(),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ComparisonOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "le" | "<=" => Ok(ComparisonOperator::Le),
            "lt" | "<" => Ok(ComparisonOperator::Lt),
            "eq" | "==" | "=" => Ok(ComparisonOperator::Eq),
            "gt" | ">" => Ok(ComparisonOperator::Gt),
            "ge" | ">=" => Ok(ComparisonOperator::Ge),
            "ne" | "!=" => Ok(ComparisonOperator::Ne),
            other => Err(CompileError::UnsupportedOperator {
                op: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_symbols() {
        assert_eq!("add".parse::<BinaryOperator>().unwrap(), BinaryOperator::Add);
        assert_eq!("/".parse::<BinaryOperator>().unwrap(), BinaryOperator::Div);
        assert_eq!("sub".parse::<UnaryOperator>().unwrap(), UnaryOperator::Negate);
        assert_eq!(">=".parse::<ComparisonOperator>().unwrap(), ComparisonOperator::Ge);
    }

    #[test]
    fn test_unknown_operators_are_rejected() {
        assert!(matches!(
            "pow".parse::<BinaryOperator>(),
            Err(CompileError::UnsupportedOperator { op }) if op == "pow"
        ));
        assert!(matches!(
            "avg".parse::<AggregateOperator>(),
            Err(CompileError::UnsupportedAggregationOperator { .. })
        ));
    }

    #[test]
    fn test_document_names() {
        let op: UnaryOperator = serde_json::from_str(r#""sub""#).unwrap();
        assert_eq!(op, UnaryOperator::Negate);
        assert_eq!(
            serde_json::to_string(&ComparisonOperator::Ne).unwrap(),
            r#""ne""#
        );
    }
}
