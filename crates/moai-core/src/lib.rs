//! MOAI Core - value types and declarations for the model compiler
//!
//! This crate provides the leaf abstractions the compiler works over:
//! - Host values (`IndexValue`, `Number`, `Scalar`) and index tuples
//! - Declarations for sets, parameters and decision variables
//! - The `CompileError` taxonomy shared by every MOAI crate

pub mod domain;
pub mod error;
pub mod value;

pub use domain::{Domain, IndexElement, Parameter, ParameterValues, Set, Variable};
pub use error::{CompileError, RefKind, Result};
pub use value::{format_index, IndexSnapshot, IndexTuple, IndexValue, Number, Scalar};
