//! Declarations that make up a model's registry and data tables.
//!
//! - [`Set`] - named ordered collections of index elements
//! - [`Parameter`] - scalar or sparse indexed numeric data
//! - [`Variable`] - families of decision variables over set products

mod parameter;
mod set;
mod variable;

#[cfg(test)]
mod tests;

pub use parameter::{IndexElement, Parameter, ParameterValues};
pub use set::Set;
pub use variable::{Domain, Variable};
