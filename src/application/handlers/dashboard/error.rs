use crate::domain::foundation::ErrorCode;
use crate::ports::SourceError;

/// Errors that can occur in dashboard query handlers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl DashboardError {
    /// Machine-readable code reported to API clients
    pub fn code(&self) -> ErrorCode {
        match self {
            DashboardError::UnknownDomain(_) => ErrorCode::DomainNotFound,
            DashboardError::InvalidInput(_) => ErrorCode::InvalidFilter,
            DashboardError::Source(SourceError::NotFound(_)) => ErrorCode::DatasetNotFound,
            DashboardError::Source(SourceError::Unavailable(_)) => ErrorCode::SourceUnavailable,
            DashboardError::Source(SourceError::Malformed { .. }) => ErrorCode::MalformedData,
        }
    }
}
