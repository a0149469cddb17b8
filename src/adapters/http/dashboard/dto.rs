//! HTTP DTOs for dashboard endpoints.
//!
//! Dashboard is read-only, so we only have query-string and response DTOs.
//! The domain view models are already designed for serialization,
//! so we re-export them directly.

pub use crate::application::handlers::DomainSummary;
pub use crate::domain::dashboard::{DashboardTab, DomainSnapshot, MetasTable, RegionMap};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorCode;
use crate::domain::metrics::{FilterCriteria, KindFilter};

// ════════════════════════════════════════════════════════════════════════════════
// Query-string DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters for the metas table endpoint.
///
/// Everything arrives as text so malformed values produce a JSON error
/// body instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct MetasParams {
    /// Comma-separated hierarchy levels, e.g. `1,2`.
    pub levels: Option<String>,
    /// `all`, `total`, `subtotal` or `detail`.
    pub kind: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    /// Case-insensitive description search.
    pub q: Option<String>,
}

impl MetasParams {
    pub fn into_criteria(self) -> Result<FilterCriteria, String> {
        let levels = match self.levels.as_deref() {
            None => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u8>()
                        .map_err(|_| format!("invalid level '{}'", s))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") | Some("all") => KindFilter::All,
            Some("total") => KindFilter::Total,
            Some("subtotal") => KindFilter::Subtotal,
            Some("detail") => KindFilter::Detail,
            Some(other) => return Err(format!("invalid kind '{}'", other)),
        };

        Ok(FilterCriteria {
            levels,
            kind,
            percentage_min: parse_bound("min", self.min.as_deref())?,
            percentage_max: parse_bound("max", self.max.as_deref())?,
            search_text: self.q.filter(|q| !q.trim().is_empty()),
        })
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<f64>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("invalid {} '{}'", name, value)),
    }
}

/// Query parameters for the region map endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MapParams {
    pub level: Option<usize>,
}

/// Query parameters for the tab endpoint.
#[derive(Debug, Deserialize)]
pub struct TabParams {
    /// Comma-separated domain keys.
    pub domains: String,
}

impl TabParams {
    pub fn domain_keys(&self) -> Vec<String> {
        self.domains
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFilter, message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new(
            ErrorCode::DomainNotFound,
            format!("{} not found: {}", resource_type, id),
        )
    }

}
