//! Shared test fixtures for MOAI crates.
//!
//! - [`cost`] - a one-set model with a bound per element
//! - [`transportation`] - warehouses shipping to customers
//! - [`planning`] - production with inventory carried between periods
//! - [`recording`] - a target that logs every call it receives
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! moai-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use moai_test::{transportation_model, RecordingTarget};
//!
//! let model = transportation_model();
//! assert_eq!(model.constraint_names(), vec!["supply_limit", "demand_satisfaction"]);
//! let target = RecordingTarget::new();
//! assert!(target.calls().is_empty());
//! ```

pub mod cost;
pub mod planning;
pub mod recording;
pub mod transportation;

pub use cost::{cost_model, COST_MODEL_JSON};
pub use planning::production_planning_model;
pub use recording::{RecordingTarget, TargetCall};
pub use transportation::transportation_model;
