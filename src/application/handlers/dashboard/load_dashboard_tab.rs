//! LoadDashboardTabHandler - Loads several domains for one dashboard tab.
//!
//! All domains are fetched concurrently and the tab is all-or-nothing: the
//! first failure fails the whole load. There is no retry and no
//! cancellation of the remaining fetches beyond dropping their futures.

use chrono::Utc;
use futures::future::try_join_all;
use tracing::error;

use crate::domain::dashboard::{DashboardTab, DomainSnapshot};

use super::{DashboardError, DomainLoader};

/// Upper bound on domains per tab.
const MAX_TAB_DOMAINS: usize = 16;

#[derive(Debug, Clone)]
pub struct LoadDashboardTabQuery {
    pub domains: Vec<String>,
}

pub type LoadDashboardTabResult = DashboardTab;

pub struct LoadDashboardTabHandler {
    loader: DomainLoader,
}

impl LoadDashboardTabHandler {
    pub fn new(loader: DomainLoader) -> Self {
        Self { loader }
    }

    pub async fn handle(
        &self,
        query: LoadDashboardTabQuery,
    ) -> Result<LoadDashboardTabResult, DashboardError> {
        if query.domains.is_empty() {
            return Err(DashboardError::InvalidInput(
                "at least one domain is required".to_string(),
            ));
        }
        if query.domains.len() > MAX_TAB_DOMAINS {
            return Err(DashboardError::InvalidInput(format!(
                "a tab can show at most {} domains",
                MAX_TAB_DOMAINS
            )));
        }

        let loaded_at = Utc::now();
        let loads = query.domains.iter().map(|key| async move {
            let (definition, assembled) = self.loader.assemble(key).await?;
            Ok::<_, DashboardError>(DomainSnapshot::from_assembled(
                definition, assembled, loaded_at,
            ))
        });

        let snapshots = try_join_all(loads).await.map_err(|e| {
            error!(domains = ?query.domains, error = %e, "Failed to load dashboard tab");
            e
        })?;

        Ok(DashboardTab {
            snapshots,
            loaded_at,
        })
    }
}
