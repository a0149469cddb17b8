//! Memoizing Metrics Source Decorator
//!
//! Wraps another source and keeps the first successful response per domain
//! for the life of the process. Failures are never cached, so a later call
//! retries the inner source. There is no invalidation.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::metrics::Relation;
use crate::ports::{MetricsSource, SourceError};

pub struct MemoizingSource {
    inner: Arc<dyn MetricsSource>,
    rows: RwLock<HashMap<String, Vec<Value>>>,
    relations: RwLock<HashMap<String, Vec<Relation>>>,
}

impl MemoizingSource {
    pub fn new(inner: Arc<dyn MetricsSource>) -> Self {
        Self {
            inner,
            rows: RwLock::new(HashMap::new()),
            relations: RwLock::new(HashMap::new()),
        }
    }

    /// Number of domains whose rows are cached
    pub async fn cached_domains(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl MetricsSource for MemoizingSource {
    async fn fetch_rows(&self, domain: &str) -> Result<Vec<Value>, SourceError> {
        if let Some(rows) = self.rows.read().await.get(domain) {
            debug!(domain, "Serving memoized rows");
            return Ok(rows.clone());
        }

        // Concurrent first loads may both reach the inner source; last write wins
        let rows = self.inner.fetch_rows(domain).await?;
        self.rows
            .write()
            .await
            .insert(domain.to_string(), rows.clone());
        Ok(rows)
    }

    async fn fetch_relations(&self, domain: &str) -> Result<Vec<Relation>, SourceError> {
        if let Some(relations) = self.relations.read().await.get(domain) {
            debug!(domain, "Serving memoized relations");
            return Ok(relations.clone());
        }

        let relations = self.inner.fetch_relations(domain).await?;
        self.relations
            .write()
            .await
            .insert(domain.to_string(), relations.clone());
        Ok(relations)
    }
}
