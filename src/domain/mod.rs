//! Domain layer containing the metrics engine and its view models.
//!
//! # Module Organization
//!
//! - `foundation` - Shared value objects (percentages, record ids, errors)
//! - `metrics` - Normalization, hierarchy building, aggregation, classification and filtering
//! - `dashboard` - Classified trees, metas tables and region maps for the front-end

pub mod dashboard;
pub mod foundation;
pub mod metrics;
