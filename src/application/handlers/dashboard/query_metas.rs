//! QueryMetasHandler - Query handler for the filtered metas table.
//!
//! Works on the flat record list as delivered by the source; no tree is
//! built and no parent values are derived.

use tracing::debug;

use crate::domain::dashboard::MetasTable;
use crate::domain::metrics::{filter, FilterCriteria};

use super::{DashboardError, DomainLoader};

/// Query to filter one domain's records.
#[derive(Debug, Clone)]
pub struct QueryMetasQuery {
    pub domain: String,
    pub criteria: FilterCriteria,
}

pub type QueryMetasResult = MetasTable;

pub struct QueryMetasHandler {
    loader: DomainLoader,
}

impl QueryMetasHandler {
    pub fn new(loader: DomainLoader) -> Self {
        Self { loader }
    }

    pub async fn handle(&self, query: QueryMetasQuery) -> Result<QueryMetasResult, DashboardError> {
        validate_criteria(&query.criteria)?;
        let (definition, batch) = self.loader.normalize(&query.domain).await?;
        let filtered = filter(&batch.records, &query.criteria);
        debug!(
            domain = %query.domain,
            matched = filtered.len(),
            of = batch.records.len(),
            "Filtered metas"
        );

        Ok(MetasTable::new(
            definition.key.clone(),
            query.criteria,
            &filtered,
            &definition.threshold_set(),
            definition.aggregation,
        ))
    }
}

fn validate_criteria(criteria: &FilterCriteria) -> Result<(), DashboardError> {
    let bounds = [criteria.percentage_min, criteria.percentage_max];
    if bounds.iter().flatten().any(|b| !b.is_finite()) {
        return Err(DashboardError::InvalidInput(
            "percentage bounds must be finite numbers".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (criteria.percentage_min, criteria.percentage_max) {
        if min > max {
            return Err(DashboardError::InvalidInput(format!(
                "percentage min {} is greater than max {}",
                min, max
            )));
        }
    }
    Ok(())
}
