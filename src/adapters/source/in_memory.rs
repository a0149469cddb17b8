//! In-Memory Metrics Source Adapter
//!
//! Serves rows and relations from memory. Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::metrics::Relation;
use crate::ports::{MetricsSource, SourceError};

/// In-memory metrics source
///
/// # Example
///
/// ```ignore
/// let source = InMemorySource::new()
///     .with_rows("formacion", vec![json!({ "id": 1, "meta": 10 })])
///     .with_relations("formacion", vec![]);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
    rows: RwLock<HashMap<String, Vec<Value>>>,
    relations: RwLock<HashMap<String, Vec<Relation>>>,
    /// Domains that answer with `Unavailable`
    failing: RwLock<HashSet<String>>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, domain: impl Into<String>, rows: Vec<Value>) -> Self {
        self.rows.get_mut().insert(domain.into(), rows);
        self
    }

    pub fn with_relations(mut self, domain: impl Into<String>, relations: Vec<Relation>) -> Self {
        self.relations.get_mut().insert(domain.into(), relations);
        self
    }

    /// Makes every fetch for `domain` fail as if the upstream were down
    pub fn with_failure(mut self, domain: impl Into<String>) -> Self {
        self.failing.get_mut().insert(domain.into());
        self
    }

    /// Replaces a domain's rows (simulates a refreshed export)
    pub async fn replace_rows(&self, domain: &str, rows: Vec<Value>) {
        self.rows.write().await.insert(domain.to_string(), rows);
    }

    /// Number of fetch calls served, successful or not
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn check_available(&self, domain: &str) -> Result<(), SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.read().await.contains(domain) {
            return Err(SourceError::Unavailable(format!(
                "{} is not reachable",
                domain
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsSource for InMemorySource {
    async fn fetch_rows(&self, domain: &str) -> Result<Vec<Value>, SourceError> {
        self.check_available(domain).await?;
        self.rows
            .read()
            .await
            .get(domain)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(domain.to_string()))
    }

    async fn fetch_relations(&self, domain: &str) -> Result<Vec<Relation>, SourceError> {
        self.check_available(domain).await?;
        self.relations
            .read()
            .await
            .get(domain)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(domain.to_string()))
    }
}
