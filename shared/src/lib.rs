//! Shared types and domain logic for the Paddy Yield Advisory Platform
//!
//! This crate contains everything about a prediction that does not depend on
//! the trained model artifacts: the input feature schema, the output schemas,
//! the deterministic fertilizer calculation, and boundary validation.

pub mod error;
pub mod features;
pub mod fertilizer;
pub mod outputs;
pub mod validation;

pub use error::*;
pub use features::*;
pub use fertilizer::*;
pub use outputs::*;
pub use validation::*;
