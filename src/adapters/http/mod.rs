//! HTTP adapters - REST API implementations.

pub mod dashboard;

// Re-export key types for convenience
pub use dashboard::dashboard_routes;
pub use dashboard::DashboardAppState;
