//! Canonical goal-vs-execution record and relation edge.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, RecordId};

/// One row of a goal domain after normalization.
///
/// `target` and `executed` keep `None` as "not tracked"; they are never
/// coerced to zero. `percentage` holds only a value supplied upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub description: String,
    pub target: Option<f64>,
    pub executed: Option<f64>,
    pub percentage: Option<Percentage>,
    /// Flat hierarchy tag (1..5) used by the metas table filters.
    pub hierarchy_level: Option<u8>,
    pub is_subtotal: bool,
    pub is_total: bool,
}

/// Presentation kind derived from the subtotal/total flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Total,
    Subtotal,
    Detail,
}

impl Record {
    /// Creates a detail record with no values.
    pub fn new(id: RecordId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            target: None,
            executed: None,
            percentage: None,
            hierarchy_level: None,
            is_subtotal: false,
            is_total: false,
        }
    }

    /// Sets target and executed values.
    pub fn with_values(mut self, target: Option<f64>, executed: Option<f64>) -> Self {
        self.target = target;
        self.executed = executed;
        self
    }

    /// Sets an upstream-supplied percentage.
    pub fn with_percentage(mut self, percentage: Option<Percentage>) -> Self {
        self.percentage = percentage;
        self
    }

    /// Sets the flat hierarchy tag.
    pub fn with_hierarchy_level(mut self, level: u8) -> Self {
        self.hierarchy_level = Some(level);
        self
    }

    /// Marks the record as a subtotal row.
    pub fn as_subtotal(mut self) -> Self {
        self.is_subtotal = true;
        self
    }

    /// Marks the record as a total row.
    pub fn as_total(mut self) -> Self {
        self.is_total = true;
        self
    }

    /// Total wins over subtotal when both flags are set.
    pub fn kind(&self) -> RecordKind {
        if self.is_total {
            RecordKind::Total
        } else if self.is_subtotal {
            RecordKind::Subtotal
        } else {
            RecordKind::Detail
        }
    }

    /// Supplied percentage, or `executed / target * 100` when computable.
    pub fn effective_percentage(&self) -> Option<Percentage> {
        self.percentage
            .or_else(|| Percentage::of(self.executed, self.target))
    }
}

/// Directed parent -> child edge of an explicit hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(alias = "idPadre", alias = "parent_id")]
    pub parent_id: RecordId,
    #[serde(alias = "idHijo", alias = "child_id")]
    pub child_id: RecordId,
}

impl Relation {
    pub fn new(parent_id: RecordId, child_id: RecordId) -> Self {
        Self { parent_id, child_id }
    }
}
