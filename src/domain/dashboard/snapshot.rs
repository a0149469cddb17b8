use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::metrics::{
    AssembledDomain, BuildWarning, CategoryBreakdown, DomainDefinition, HierarchyMode,
};

use super::tree_view::ClassifiedNode;

/// One domain's classified forest, rebuilt from scratch on every load
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSnapshot {
    pub domain: String,
    pub title: String,
    pub hierarchy: HierarchyMode,

    pub trees: Vec<ClassifiedNode>,

    /// Category counts across every node
    pub breakdown: CategoryBreakdown,

    /// Data-integrity findings from tree construction
    pub warnings: Vec<BuildWarning>,
    pub skipped_rows: usize,

    pub loaded_at: DateTime<Utc>,
}

impl DomainSnapshot {
    pub fn from_assembled(
        definition: &DomainDefinition,
        assembled: AssembledDomain,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        let thresholds = definition.threshold_set();
        let trees: Vec<ClassifiedNode> = assembled
            .forest
            .roots
            .iter()
            .map(|root| ClassifiedNode::from_node(root, &thresholds))
            .collect();
        let breakdown = trees
            .iter()
            .flat_map(|tree| tree.walk())
            .map(|node| node.category)
            .collect();

        Self {
            domain: definition.key.clone(),
            title: definition.title.clone(),
            hierarchy: definition.hierarchy,
            trees,
            breakdown,
            warnings: assembled.forest.warnings,
            skipped_rows: assembled.skipped_rows,
            loaded_at,
        }
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(|t| t.walk().len()).sum()
    }

    /// Returns true if the source produced data-integrity warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty() || self.skipped_rows > 0
    }
}

/// Several domains loaded together for one dashboard tab
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTab {
    pub snapshots: Vec<DomainSnapshot>,
    pub loaded_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;
