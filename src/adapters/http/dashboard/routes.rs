//! HTTP routes for dashboard endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{
    get_domain_tree, get_region_map, list_domains, load_dashboard_tab, query_metas,
    DashboardAppState,
};

/// Creates the dashboard router with all routes.
pub fn dashboard_routes(state: DashboardAppState) -> Router {
    Router::new()
        // GET /api/domains
        .route("/api/domains", get(list_domains))
        // GET /api/domains/:domain/tree
        .route("/api/domains/:domain/tree", get(get_domain_tree))
        // GET /api/domains/:domain/metas
        .route("/api/domains/:domain/metas", get(query_metas))
        // GET /api/domains/:domain/map
        .route("/api/domains/:domain/map", get(get_region_map))
        // GET /api/tabs
        .route("/api/tabs", get(load_dashboard_tab))
        .with_state(state)
}
