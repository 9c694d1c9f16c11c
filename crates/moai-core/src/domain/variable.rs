//! Decision variable declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The domain shared by every member of a variable family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Reals")]
    Real,
    #[default]
    #[serde(rename = "NonNegativeReals")]
    NonNegativeReal,
    #[serde(rename = "Integers")]
    Integer,
    #[serde(rename = "NonNegativeIntegers")]
    NonNegativeInteger,
    Binary,
}

impl Domain {
    /// Returns true for the real-valued domains.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Domain::Real | Domain::NonNegativeReal)
    }

    /// Returns true for integer domains, including binary.
    pub fn is_integer(&self) -> bool {
        !self.is_continuous()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Real => "Reals",
            Domain::NonNegativeReal => "NonNegativeReals",
            Domain::Integer => "Integers",
            Domain::NonNegativeInteger => "NonNegativeIntegers",
            Domain::Binary => "Binary",
        };
        f.write_str(name)
    }
}

/// A family of decision variables.
///
/// A variable indexed by N sets denotes one scalar decision variable per
/// element of the Cartesian product of those sets. All members share the
/// domain and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variable {
    name: String,
    #[serde(default)]
    indices: Vec<String>,
    #[serde(default)]
    domain: Domain,
    #[serde(default)]
    lb: Option<f64>,
    #[serde(default)]
    ub: Option<f64>,
}

impl Variable {
    /// Creates an unindexed, non-negative real variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indices: Vec::new(),
            domain: Domain::default(),
            lb: None,
            ub: None,
        }
    }

    /// Sets the names of the sets this family is indexed over.
    pub fn with_indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices = indices.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the variable domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Sets lower and upper bounds; None leaves a side unbounded.
    pub fn with_bounds(mut self, lb: Option<f64>, ub: Option<f64>) -> Self {
        self.lb = lb;
        self.ub = ub;
        self
    }

    /// Returns the family name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the index set names in order.
    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    /// Returns the variable domain.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Returns the lower bound, if any.
    pub fn lb(&self) -> Option<f64> {
        self.lb
    }

    /// Returns the upper bound, if any.
    pub fn ub(&self) -> Option<f64> {
        self.ub
    }

    /// Returns the (lower, upper) bound pair.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.lb, self.ub)
    }

    /// Number of sets the family is indexed over.
    pub fn dimension(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the domain is real-valued.
    pub fn is_continuous(&self) -> bool {
        self.domain.is_continuous()
    }

    /// Returns true if the domain is integral.
    pub fn is_integer(&self) -> bool {
        self.domain.is_integer()
    }

    /// Returns true for the binary domain.
    pub fn is_binary(&self) -> bool {
        self.domain == Domain::Binary
    }
}
