use serde::Serialize;

use crate::domain::foundation::{Percentage, RecordId};
use crate::domain::metrics::{Category, Node, SemaphoreColor, ThresholdSet};

/// A tree node as handed to the rendering front-end
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedNode {
    pub id: RecordId,
    pub description: String,
    pub target: Option<f64>,
    pub executed: Option<f64>,
    pub percentage: Option<Percentage>,

    /// Semaphore category; absent means "no data"
    pub category: Option<Category>,
    pub color: Option<SemaphoreColor>,

    /// Tree depth, root = 0
    pub level: usize,
    pub hierarchy_level: Option<u8>,
    pub is_subtotal: bool,
    pub is_total: bool,

    pub children: Vec<ClassifiedNode>,
}

impl ClassifiedNode {
    /// Classifies a node and its whole subtree.
    pub fn from_node(node: &Node, thresholds: &ThresholdSet) -> Self {
        let record = &node.record;
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
            level: node.level,
            hierarchy_level: record.hierarchy_level,
            is_subtotal: record.is_subtotal,
            is_total: record.is_total,
            children: node
                .children
                .iter()
                .map(|child| Self::from_node(child, thresholds))
                .collect(),
        }
    }

    /// Pre-order walk over this subtree.
    pub fn walk(&self) -> Vec<&ClassifiedNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

#[cfg(test)]
#[path = "tree_view_test.rs"]
mod tree_view_test;
