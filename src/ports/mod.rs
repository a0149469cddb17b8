//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the metrics engine and the outside world. Adapters implement these ports.
//!
//! - `MetricsSource` - Read-only provider of domain rows and relation edges

mod metrics_source;

pub use metrics_source::{MetricsSource, SourceError};
