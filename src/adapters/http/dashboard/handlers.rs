//! HTTP handlers for dashboard endpoints.
//!
//! These handlers connect Axum routes to application layer query handlers.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use crate::application::handlers::{
    DashboardError, DomainLoader, GetDomainTreeHandler, GetDomainTreeQuery, GetRegionMapHandler,
    GetRegionMapQuery, ListDomainsHandler, LoadDashboardTabHandler, LoadDashboardTabQuery,
    QueryMetasHandler, QueryMetasQuery,
};
use crate::domain::foundation::ErrorCode;

use super::dto::{
    DashboardTab, DomainSnapshot, DomainSummary, ErrorResponse, MapParams, MetasParams,
    MetasTable, RegionMap, TabParams,
};

/// Tree depth used by the map when the client does not ask for one.
const DEFAULT_MAP_LEVEL: usize = 1;

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Dashboard API error that implements IntoResponse.
#[derive(Debug)]
pub enum DashboardApiError {
    BadRequest(String),
    NotFound(String),
    /// The data source failed or returned unusable data
    BadGateway(ErrorCode, String),
}

impl IntoResponse for DashboardApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            DashboardApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            DashboardApiError::NotFound(key) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found("Domain", &key))
            }
            DashboardApiError::BadGateway(code, msg) => {
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(code, msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<DashboardError> for DashboardApiError {
    fn from(error: DashboardError) -> Self {
        let code = error.code();
        match error {
            DashboardError::UnknownDomain(key) => DashboardApiError::NotFound(key),
            DashboardError::InvalidInput(msg) => DashboardApiError::BadRequest(msg),
            DashboardError::Source(source) => {
                warn!(error = %source, "Data source error");
                DashboardApiError::BadGateway(code, source.to_string())
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing dashboard dependencies.
#[derive(Clone)]
pub struct DashboardAppState {
    pub loader: DomainLoader,
}

impl DashboardAppState {
    pub fn new(loader: DomainLoader) -> Self {
        Self { loader }
    }

    pub fn list_domains_handler(&self) -> ListDomainsHandler {
        ListDomainsHandler::new(self.loader.clone())
    }

    pub fn domain_tree_handler(&self) -> GetDomainTreeHandler {
        GetDomainTreeHandler::new(self.loader.clone())
    }

    pub fn region_map_handler(&self) -> GetRegionMapHandler {
        GetRegionMapHandler::new(self.loader.clone())
    }

    pub fn query_metas_handler(&self) -> QueryMetasHandler {
        QueryMetasHandler::new(self.loader.clone())
    }

    pub fn dashboard_tab_handler(&self) -> LoadDashboardTabHandler {
        LoadDashboardTabHandler::new(self.loader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/domains
///
/// Lists the configured domains.
pub async fn list_domains(State(state): State<DashboardAppState>) -> Json<Vec<DomainSummary>> {
    Json(state.list_domains_handler().handle())
}

/// GET /api/domains/:domain/tree
///
/// Returns the classified forest of one domain.
pub async fn get_domain_tree(
    State(state): State<DashboardAppState>,
    Path(domain): Path<String>,
) -> Result<Json<DomainSnapshot>, DashboardApiError> {
    let snapshot = state
        .domain_tree_handler()
        .handle(GetDomainTreeQuery { domain })
        .await?;
    Ok(Json(snapshot))
}

/// GET /api/domains/:domain/metas?levels=1,2&kind=total&min=90&max=110&q=text
///
/// Returns the filtered flat table with summary statistics.
pub async fn query_metas(
    State(state): State<DashboardAppState>,
    Path(domain): Path<String>,
    Query(params): Query<MetasParams>,
) -> Result<Json<MetasTable>, DashboardApiError> {
    let criteria = params
        .into_criteria()
        .map_err(DashboardApiError::BadRequest)?;

    let table = state
        .query_metas_handler()
        .handle(QueryMetasQuery { domain, criteria })
        .await?;
    Ok(Json(table))
}

/// GET /api/domains/:domain/map?level=1
///
/// Returns the per-region summary for the choropleth.
pub async fn get_region_map(
    State(state): State<DashboardAppState>,
    Path(domain): Path<String>,
    Query(params): Query<MapParams>,
) -> Result<Json<RegionMap>, DashboardApiError> {
    let query = GetRegionMapQuery {
        domain,
        level: params.level.unwrap_or(DEFAULT_MAP_LEVEL),
    };
    let map = state.region_map_handler().handle(query).await?;
    Ok(Json(map))
}

/// GET /api/tabs?domains=a,b
///
/// Loads several domains at once; fails if any of them fails.
pub async fn load_dashboard_tab(
    State(state): State<DashboardAppState>,
    Query(params): Query<TabParams>,
) -> Result<Json<DashboardTab>, DashboardApiError> {
    let query = LoadDashboardTabQuery {
        domains: params.domain_keys(),
    };
    let tab = state.dashboard_tab_handler().handle(query).await?;
    Ok(Json(tab))
}
