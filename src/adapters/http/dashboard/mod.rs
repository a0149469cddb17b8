//! Dashboard HTTP adapter module.
//!
//! Read-only JSON endpoints consumed by the rendering front-end.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::{DashboardApiError, DashboardAppState};
pub use routes::dashboard_routes;
