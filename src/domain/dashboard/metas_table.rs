use serde::Serialize;

use crate::domain::foundation::{Percentage, RecordId};
use crate::domain::metrics::{
    summarize, synthesize_total, AggregationMode, Category, FilterCriteria, FilterStats, Record,
    RecordKind, SemaphoreColor, ThresholdSet,
};

/// Id of the total row built when the filtered rows carry none.
const SYNTHESIZED_TOTAL_ID: &str = "total";

/// A flat metas-table row, classified for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetasRow {
    pub id: RecordId,
    pub description: String,
    pub target: Option<f64>,
    pub executed: Option<f64>,
    pub percentage: Option<Percentage>,
    pub category: Option<Category>,
    pub color: Option<SemaphoreColor>,
    pub hierarchy_level: Option<u8>,
    pub kind: RecordKind,
}

impl MetasRow {
    pub fn from_record(record: &Record, thresholds: &ThresholdSet) -> Self {
        let percentage = record.effective_percentage();
        let category = thresholds.classify(percentage);
        Self {
            id: record.id.clone(),
            description: record.description.clone(),
            target: record.target,
            executed: record.executed,
            percentage,
            category,
            color: category.map(|c| c.color()),
            hierarchy_level: record.hierarchy_level,
            kind: record.kind(),
        }
    }
}

/// Filtered rows for one domain plus summary statistics over them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetasTable {
    pub domain: String,
    pub criteria: FilterCriteria,
    pub rows: Vec<MetasRow>,
    /// Aggregate of the detail rows, present only when no total row matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<MetasRow>,
    pub stats: FilterStats,
}

impl MetasTable {
    /// Builds the table from records that already passed `criteria`.
    pub fn new(
        domain: impl Into<String>,
        criteria: FilterCriteria,
        filtered: &[Record],
        thresholds: &ThresholdSet,
        aggregation: AggregationMode,
    ) -> Self {
        Self {
            domain: domain.into(),
            criteria,
            rows: filtered
                .iter()
                .map(|record| MetasRow::from_record(record, thresholds))
                .collect(),
            total: total_row(filtered, aggregation)
                .map(|record| MetasRow::from_record(&record, thresholds)),
            stats: summarize(filtered),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn total_row(filtered: &[Record], aggregation: AggregationMode) -> Option<Record> {
    let kinds = || filtered.iter().map(Record::kind);
    if kinds().any(|kind| kind == RecordKind::Total)
        || !kinds().any(|kind| kind == RecordKind::Detail)
    {
        return None;
    }
    let id = RecordId::new(SYNTHESIZED_TOTAL_ID).ok()?;
    Some(synthesize_total(id, "Total", filtered, aggregation))
}

#[cfg(test)]
#[path = "metas_table_test.rs"]
mod metas_table_test;
