//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the goal-tracking domain.

mod errors;
mod ids;
mod percentage;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{RecordId, PATH_SEPARATOR};
pub use percentage::Percentage;
