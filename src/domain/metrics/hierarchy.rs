//! Hierarchy Builder - turns flat records into a forest of trees.
//!
//! Two construction strategies mirror the shapes sources deliver:
//!
//! - **Relations**: integer or opaque ids plus a `{parent, child}` edge table.
//! - **Path ids**: dot-separated ids (`"1.1.2"`) whose parent is the id with
//!   the last segment stripped.
//!
//! Construction is permissive: edges that cannot be honoured are dropped and
//! the affected record stays a root, but every drop is reported as a
//! [`BuildWarning`] so callers can surface data-integrity problems. No record
//! is ever lost or duplicated.
//!
//! Trees never grow deeper than [`MAX_TREE_LEVEL`]; a record that would sit
//! below it is detached and starts a new root, so every walk over a forest
//! has bounded depth whatever the relation table describes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::domain::foundation::RecordId;

use super::record::{Record, Relation};

/// Deepest level a node can occupy.
pub const MAX_TREE_LEVEL: usize = 63;

/// How a domain's records are linked into trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyMode {
    /// Explicit `{parent, child}` relation table.
    #[default]
    Relations,
    /// Dot-separated hierarchical ids.
    PathIds,
    /// No hierarchy; every record is a root.
    Flat,
}

/// Ordering applied to the children of every node, keyed on `target`.
///
/// Missing targets always sort last; ties keep source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Children of even-level nodes ascending, of odd-level nodes descending.
    #[default]
    Alternating,
    Ascending,
    Descending,
    /// Keep source order.
    Source,
}

impl SortPolicy {
    /// Direction for the children of a node at `parent_level`; `None` keeps source order.
    fn descending_at(&self, parent_level: usize) -> Option<bool> {
        match self {
            SortPolicy::Alternating => Some(parent_level % 2 == 1),
            SortPolicy::Ascending => Some(false),
            SortPolicy::Descending => Some(true),
            SortPolicy::Source => None,
        }
    }
}

/// A record placed in a tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(flatten)]
    pub record: Record,
    /// Depth from the root, root = 0.
    pub level: usize,
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Pre-order depth-first iterator over this subtree.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    fn sort_children(&mut self, policy: SortPolicy) {
        if let Some(descending) = policy.descending_at(self.level) {
            self.children
                .sort_by(|a, b| compare_targets(a.record.target, b.record.target, descending));
        }
        for child in &mut self.children {
            child.sort_children(policy);
        }
    }
}

/// Pre-order iterator over nodes.
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// An edge or record that could not be placed as the source described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BuildWarning {
    /// A second record reused an id; it was kept as a root.
    DuplicateId { id: RecordId },
    /// Relation points at a parent that is not in the record set.
    UnknownParent { parent: RecordId, child: RecordId },
    /// Relation points at a child that is not in the record set.
    UnknownChild { parent: RecordId, child: RecordId },
    /// Child already attached elsewhere; the later edge was dropped.
    DuplicateChild {
        child: RecordId,
        kept_parent: RecordId,
        dropped_parent: RecordId,
    },
    SelfReference { id: RecordId },
    /// Edge would close a cycle.
    Cycle { parent: RecordId, child: RecordId },
    /// Path id whose parent path is not in the record set; kept as a root.
    MissingPathParent { child: RecordId, parent: RecordId },
    /// Record would sit below `MAX_TREE_LEVEL`; detached as a new root.
    TooDeep { id: RecordId, parent: RecordId },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::DuplicateId { id } => write!(f, "duplicate record id {}", id),
            BuildWarning::UnknownParent { parent, child } => {
                write!(f, "relation {} -> {} has unknown parent", parent, child)
            }
            BuildWarning::UnknownChild { parent, child } => {
                write!(f, "relation {} -> {} has unknown child", parent, child)
            }
            BuildWarning::DuplicateChild {
                child,
                kept_parent,
                dropped_parent,
            } => write!(
                f,
                "record {} already under {}, dropped edge from {}",
                child, kept_parent, dropped_parent
            ),
            BuildWarning::SelfReference { id } => write!(f, "record {} is its own parent", id),
            BuildWarning::Cycle { parent, child } => {
                write!(f, "relation {} -> {} would create a cycle", parent, child)
            }
            BuildWarning::MissingPathParent { child, parent } => {
                write!(f, "record {} has no parent record {}", child, parent)
            }
            BuildWarning::TooDeep { id, parent } => write!(
                f,
                "record {} is nested more than {} levels deep, detached from {}",
                id, MAX_TREE_LEVEL, parent
            ),
        }
    }
}

/// Root trees plus everything dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forest {
    pub roots: Vec<Node>,
    pub warnings: Vec<BuildWarning>,
}

impl Forest {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(Node::node_count).sum()
    }

    /// Pre-order iterator over all trees, roots in order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().flat_map(Node::iter)
    }

    pub fn find(&self, id: &RecordId) -> Option<&Node> {
        self.iter().find(|node| &node.record.id == id)
    }

    /// Re-sorts children of every node; roots keep their order.
    pub fn sort(&mut self, policy: SortPolicy) {
        for root in &mut self.roots {
            root.sort_children(policy);
        }
    }
}

/// Builds a forest from explicit relations, or from path ids when `relations` is `None`,
/// and sorts it.
///
/// The sort sees targets as the source supplied them. Parents whose target is
/// derived later rank as missing here; [`DomainDefinition::assemble`] sorts
/// after aggregation instead, so use [`build_with_mode`] and [`Forest::sort`]
/// when derived targets should drive the order.
///
/// [`DomainDefinition::assemble`]: super::DomainDefinition::assemble
pub fn build(records: Vec<Record>, relations: Option<&[Relation]>, sort: SortPolicy) -> Forest {
    let mut forest = match relations {
        Some(relations) => build_from_relations(records, relations),
        None => build_from_paths(records),
    };
    forest.sort(sort);
    forest
}

/// Builds a forest for the given mode without sorting.
pub fn build_with_mode(records: Vec<Record>, mode: HierarchyMode, relations: &[Relation]) -> Forest {
    match mode {
        HierarchyMode::Relations => build_from_relations(records, relations),
        HierarchyMode::PathIds => build_from_paths(records),
        HierarchyMode::Flat => build_flat(records),
    }
}

/// Every record becomes a root at level 0.
pub fn build_flat(records: Vec<Record>) -> Forest {
    let parent_of = vec![None; records.len()];
    assemble(records, parent_of, Vec::new())
}

/// Links records through a relation table.
///
/// Edges are linked in order; cycles are broken afterwards in a single pass.
pub fn build_from_relations(records: Vec<Record>, relations: &[Relation]) -> Forest {
    let (index, mut warnings) = index_records(&records);
    let mut parent_of: Vec<Option<usize>> = vec![None; records.len()];
    // Position in `relations` of the edge that linked each child.
    let mut linked_by: Vec<usize> = vec![0; records.len()];

    for (order, relation) in relations.iter().enumerate() {
        let Some(&parent) = index.get(&relation.parent_id) else {
            warnings.push(BuildWarning::UnknownParent {
                parent: relation.parent_id.clone(),
                child: relation.child_id.clone(),
            });
            continue;
        };
        let Some(&child) = index.get(&relation.child_id) else {
            warnings.push(BuildWarning::UnknownChild {
                parent: relation.parent_id.clone(),
                child: relation.child_id.clone(),
            });
            continue;
        };
        if parent == child {
            warnings.push(BuildWarning::SelfReference {
                id: relation.child_id.clone(),
            });
            continue;
        }
        if let Some(existing) = parent_of[child] {
            // Repeated identical edges are harmless.
            if existing != parent {
                warnings.push(BuildWarning::DuplicateChild {
                    child: relation.child_id.clone(),
                    kept_parent: records[existing].id.clone(),
                    dropped_parent: relation.parent_id.clone(),
                });
            }
            continue;
        }
        parent_of[child] = Some(parent);
        linked_by[child] = order;
    }

    break_cycles(&records, &mut parent_of, &linked_by, &mut warnings);
    assemble(records, parent_of, warnings)
}

/// Links records whose ids are dot-separated paths.
pub fn build_from_paths(records: Vec<Record>) -> Forest {
    let (index, mut warnings) = index_records(&records);
    let mut parent_of: Vec<Option<usize>> = vec![None; records.len()];

    for (position, record) in records.iter().enumerate() {
        let Some(parent_id) = record.id.parent_path() else {
            continue;
        };
        match index.get(&parent_id) {
            Some(&parent) => parent_of[position] = Some(parent),
            None => warnings.push(BuildWarning::MissingPathParent {
                child: record.id.clone(),
                parent: parent_id,
            }),
        }
    }

    assemble(records, parent_of, warnings)
}

fn index_records(records: &[Record]) -> (HashMap<RecordId, usize>, Vec<BuildWarning>) {
    let mut index = HashMap::with_capacity(records.len());
    let mut warnings = Vec::new();
    for (position, record) in records.iter().enumerate() {
        if index.contains_key(&record.id) {
            warnings.push(BuildWarning::DuplicateId {
                id: record.id.clone(),
            });
        } else {
            index.insert(record.id.clone(), position);
        }
    }
    (index, warnings)
}

/// Every record has at most one parent, so each cycle is met once while
/// climbing parent links. The most recently listed edge of a cycle is cut.
fn break_cycles(
    records: &[Record],
    parent_of: &mut [Option<usize>],
    linked_by: &[usize],
    warnings: &mut Vec<BuildWarning>,
) {
    #[derive(Clone, Copy, PartialEq)]
    enum Visit {
        Unseen,
        OnPath,
        Done,
    }

    let mut visit = vec![Visit::Unseen; parent_of.len()];
    let mut path = Vec::new();
    for start in 0..parent_of.len() {
        let mut current = Some(start);
        while let Some(position) = current {
            if visit[position] != Visit::Unseen {
                break;
            }
            visit[position] = Visit::OnPath;
            path.push(position);
            current = parent_of[position];
        }

        if let Some(closing) = current.filter(|&p| visit[p] == Visit::OnPath) {
            let from = path.iter().position(|&p| p == closing).unwrap_or(0);
            let cut = path[from..].iter().copied().max_by_key(|&p| linked_by[p]);
            if let Some(child) = cut {
                if let Some(parent) = parent_of[child].take() {
                    warnings.push(BuildWarning::Cycle {
                        parent: records[parent].id.clone(),
                        child: records[child].id.clone(),
                    });
                }
            }
        }

        for position in path.drain(..) {
            visit[position] = Visit::Done;
        }
    }
}

/// Detaches records that would sit below `MAX_TREE_LEVEL`. Levels are
/// resolved top-down, so a detached record's own subtree restarts at 0.
/// `parent_of` must be acyclic.
fn detach_deep_records(
    records: &[Record],
    parent_of: &mut [Option<usize>],
    warnings: &mut Vec<BuildWarning>,
) {
    let mut level: Vec<Option<usize>> = vec![None; parent_of.len()];
    let mut pending = Vec::new();
    for start in 0..parent_of.len() {
        let mut current = start;
        while level[current].is_none() {
            pending.push(current);
            match parent_of[current] {
                Some(parent) => current = parent,
                None => break,
            }
        }

        while let Some(position) = pending.pop() {
            let depth = parent_of[position]
                .and_then(|parent| level[parent])
                .map_or(0, |parent_level| parent_level + 1);
            if depth > MAX_TREE_LEVEL {
                if let Some(parent) = parent_of[position].take() {
                    warnings.push(BuildWarning::TooDeep {
                        id: records[position].id.clone(),
                        parent: records[parent].id.clone(),
                    });
                }
                level[position] = Some(0);
            } else {
                level[position] = Some(depth);
            }
        }
    }
}

fn assemble(
    records: Vec<Record>,
    mut parent_of: Vec<Option<usize>>,
    mut warnings: Vec<BuildWarning>,
) -> Forest {
    detach_deep_records(&records, &mut parent_of, &mut warnings);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for (position, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(position),
            None => roots.push(position),
        }
    }

    let mut slots: Vec<Option<Record>> = records.into_iter().map(Some).collect();
    let roots: Vec<Node> = roots
        .into_iter()
        .filter_map(|root| place(root, 0, &children, &mut slots))
        .collect();

    for warning in &warnings {
        warn!(%warning, "Hierarchy edge dropped");
    }
    debug!(
        roots = roots.len(),
        dropped = warnings.len(),
        "Built hierarchy forest"
    );

    Forest { roots, warnings }
}

fn place(
    position: usize,
    level: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<Record>],
) -> Option<Node> {
    let record = slots[position].take()?;
    let children = children[position]
        .iter()
        .filter_map(|&child| place(child, level + 1, children, slots))
        .collect();
    Some(Node {
        record,
        level,
        children,
    })
}

fn compare_targets(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
