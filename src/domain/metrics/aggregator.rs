//! Aggregator - derives parent values from children.
//!
//! Count domains (enrollment, quotas) sum children; rate domains (retention)
//! take the plain arithmetic mean of children, each child weighing the same
//! regardless of its population. Null children are left out of both the sum
//! and the mean divisor; a group with no non-null child stays `None`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, RecordId};

use super::hierarchy::{Forest, Node};
use super::record::{Record, RecordKind};

/// How children combine into a parent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    #[default]
    Sum,
    /// Unweighted arithmetic mean.
    Mean,
}

/// Which parents get recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    /// Only fields the source left empty.
    #[default]
    MissingOnly,
    /// Every parent field, overwriting source values.
    AllParents,
}

impl AggregationMode {
    /// Combines the non-null values; `None` when there are none.
    pub fn combine<I>(&self, values: I) -> Option<f64>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let (sum, count) = values
            .into_iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return None;
        }
        match self {
            AggregationMode::Sum => Some(sum),
            AggregationMode::Mean => Some(sum / count as f64),
        }
    }
}

/// Fills derived values and percentages across the whole forest.
pub fn derive_missing_values(forest: &mut Forest, mode: AggregationMode, derivation: Derivation) {
    for root in &mut forest.roots {
        derive_node(root, mode, derivation);
    }
}

/// Post-order: children are settled before their parent reads them.
///
/// After this call every node's `percentage` holds its final value: the
/// supplied one, or one derived from `executed / target`.
pub fn derive_node(node: &mut Node, mode: AggregationMode, derivation: Derivation) {
    for child in &mut node.children {
        derive_node(child, mode, derivation);
    }

    let overwrite = derivation == Derivation::AllParents && !node.is_leaf();
    let record = &mut node.record;

    if !node.children.is_empty() {
        if overwrite || record.target.is_none() {
            record.target = mode.combine(node.children.iter().map(|c| c.record.target));
        }
        if overwrite || record.executed.is_none() {
            record.executed = mode.combine(node.children.iter().map(|c| c.record.executed));
        }
    }

    if overwrite || record.percentage.is_none() {
        record.percentage = Percentage::of(record.executed, record.target);
        if record.percentage.is_none() && mode == AggregationMode::Mean && !node.children.is_empty()
        {
            record.percentage = mode
                .combine(
                    node.children
                        .iter()
                        .map(|c| c.record.percentage.map(|p| p.exact())),
                )
                .and_then(Percentage::from_whole);
        }
    }
}

/// Builds a total row over the detail rows of a flat table.
///
/// Rows already flagged as subtotal or total are excluded so nothing is
/// counted twice.
pub fn synthesize_total(
    id: RecordId,
    description: impl Into<String>,
    records: &[Record],
    mode: AggregationMode,
) -> Record {
    let details: Vec<&Record> = records
        .iter()
        .filter(|r| r.kind() == RecordKind::Detail)
        .collect();
    let target = mode.combine(details.iter().map(|r| r.target));
    let executed = mode.combine(details.iter().map(|r| r.executed));
    let mut percentage = Percentage::of(executed, target);
    if percentage.is_none() && mode == AggregationMode::Mean {
        percentage = mode
            .combine(
                details
                    .iter()
                    .map(|r| r.effective_percentage().map(|p| p.exact())),
            )
            .and_then(Percentage::from_whole);
    }

    Record::new(id, description)
        .with_values(target, executed)
        .with_percentage(percentage)
        .as_total()
}
