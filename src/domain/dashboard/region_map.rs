use serde::Serialize;

use crate::domain::foundation::{Percentage, RecordId};
use crate::domain::metrics::{Category, CategoryBreakdown, Forest, SemaphoreColor, ThresholdSet};

/// One shaded region on the choropleth
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCell {
    pub id: RecordId,
    pub description: String,
    pub target: Option<f64>,
    pub executed: Option<f64>,
    pub percentage: Option<Percentage>,
    pub category: Option<Category>,
    pub color: Option<SemaphoreColor>,
}

/// Per-region summary for the map view.
///
/// Always classified with the three-bucket [`ThresholdSet::LEGACY_MAP`]
/// set, whatever the domain's table thresholds are.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMap {
    pub domain: String,
    /// Tree depth the regions were taken from
    pub level: usize,
    pub regions: Vec<RegionCell>,
    pub breakdown: CategoryBreakdown,
}

impl RegionMap {
    pub fn from_forest(domain: impl Into<String>, forest: &Forest, level: usize) -> Self {
        let thresholds = ThresholdSet::LEGACY_MAP;
        let regions: Vec<RegionCell> = forest
            .iter()
            .filter(|node| node.level == level)
            .map(|node| {
                let percentage = node.record.effective_percentage();
                let category = thresholds.classify(percentage);
                RegionCell {
                    id: node.record.id.clone(),
                    description: node.record.description.clone(),
                    target: node.record.target,
                    executed: node.record.executed,
                    percentage,
                    category,
                    color: category.map(|c| c.color()),
                }
            })
            .collect();
        let breakdown = regions.iter().map(|r| r.category).collect();

        Self {
            domain: domain.into(),
            level,
            regions,
            breakdown,
        }
    }

    pub fn region(&self, id: &RecordId) -> Option<&RegionCell> {
        self.regions.iter().find(|r| &r.id == id)
    }
}

#[cfg(test)]
#[path = "region_map_test.rs"]
mod region_map_test;
