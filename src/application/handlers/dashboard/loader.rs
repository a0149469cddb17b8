//! Shared fetch-and-assemble step used by the dashboard handlers.

use std::sync::Arc;

use tracing::debug;

use crate::domain::metrics::{AssembledDomain, DomainCatalog, DomainDefinition, NormalizedBatch};
use crate::ports::MetricsSource;

use super::DashboardError;

/// Resolves a domain key and runs the full engine pipeline over fresh data.
#[derive(Clone)]
pub struct DomainLoader {
    source: Arc<dyn MetricsSource>,
    catalog: Arc<DomainCatalog>,
}

impl DomainLoader {
    pub fn new(source: Arc<dyn MetricsSource>, catalog: Arc<DomainCatalog>) -> Self {
        Self { source, catalog }
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }

    pub fn definition(&self, key: &str) -> Result<&DomainDefinition, DashboardError> {
        self.catalog
            .get(key)
            .ok_or_else(|| DashboardError::UnknownDomain(key.to_string()))
    }

    /// Fetches a domain's rows and normalizes them without building a tree.
    pub async fn normalize(
        &self,
        key: &str,
    ) -> Result<(&DomainDefinition, NormalizedBatch), DashboardError> {
        let definition = self.definition(key)?;
        let rows = self.source.fetch_rows(key).await?;
        Ok((definition, definition.normalize(&rows)))
    }

    /// Fetches rows (and relations when the domain needs them) concurrently,
    /// then normalizes, builds, aggregates and sorts.
    pub async fn assemble(
        &self,
        key: &str,
    ) -> Result<(&DomainDefinition, AssembledDomain), DashboardError> {
        let definition = self.definition(key)?;

        let relations = async {
            if definition.needs_relations() {
                self.source.fetch_relations(key).await
            } else {
                Ok(Vec::new())
            }
        };
        let (rows, relations) = tokio::try_join!(self.source.fetch_rows(key), relations)?;
        debug!(
            domain = key,
            rows = rows.len(),
            relations = relations.len(),
            "Fetched domain data"
        );

        let assembled = definition.assemble(&rows, &relations);
        Ok((definition, assembled))
    }
}
