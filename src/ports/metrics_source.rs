//! Metrics Source Port - read-only access to pre-computed domain data.
//!
//! A source delivers, per domain key, the flat JSON rows the normalizer
//! consumes and (for relation-mode domains) the parent/child edge table.
//! The engine never writes back.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::metrics::Relation;

/// Errors that can occur while fetching domain data
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed data in {dataset}: {reason}")]
    Malformed { dataset: String, reason: String },
}

impl SourceError {
    pub fn malformed(dataset: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Malformed {
            dataset: dataset.into(),
            reason: reason.into(),
        }
    }
}

/// Port for fetching raw rows and relation edges per domain
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the flat rows of a domain, one JSON object per record.
    ///
    /// # Errors
    /// `NotFound` if the domain has no dataset, `Malformed` if the payload
    /// is not a JSON array.
    async fn fetch_rows(&self, domain: &str) -> Result<Vec<Value>, SourceError>;

    /// Fetch the parent/child edges of a relation-mode domain.
    async fn fetch_relations(&self, domain: &str) -> Result<Vec<Relation>, SourceError>;
}
