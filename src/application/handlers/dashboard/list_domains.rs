//! ListDomainsHandler - Describes the configured domains.

use serde::Serialize;

use crate::domain::metrics::{AggregationMode, HierarchyMode, ThresholdSet};

use super::DomainLoader;

/// Catalog entry as shown in the front-end's domain picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSummary {
    pub key: String,
    pub title: String,
    pub hierarchy: HierarchyMode,
    pub aggregation: AggregationMode,
    pub thresholds: ThresholdSet,
}

pub struct ListDomainsHandler {
    loader: DomainLoader,
}

impl ListDomainsHandler {
    pub fn new(loader: DomainLoader) -> Self {
        Self { loader }
    }

    pub fn handle(&self) -> Vec<DomainSummary> {
        self.loader
            .catalog()
            .domains()
            .iter()
            .map(|d| DomainSummary {
                key: d.key.clone(),
                title: d.title.clone(),
                hierarchy: d.hierarchy,
                aggregation: d.aggregation,
                thresholds: d.threshold_set(),
            })
            .collect()
    }
}
