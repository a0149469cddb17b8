//! Metrics Module - the goal hierarchy, aggregation and classification engine.
//!
//! Every function here is pure and synchronous: it works on data that has
//! already been fetched and never performs I/O.
//!
//! # Components
//!
//! - `normalizer` - raw source rows to canonical [`Record`]s
//! - `hierarchy` - forest construction from relations or path ids
//! - `aggregator` - sum / mean derivation of parent values and percentages
//! - `classifier` - semaphore categories (bajo, vulnerable, buena, sobreejecucion)
//! - `filter` - compound predicates and statistics for the flat metas table
//! - `definition` - per-domain configuration tying the above together

mod aggregator;
mod classifier;
mod definition;
mod filter;
mod hierarchy;
mod normalizer;
mod record;

pub use aggregator::{derive_missing_values, derive_node, synthesize_total, AggregationMode, Derivation};
pub use classifier::{
    Category, CategoryBreakdown, SemaphoreColor, ThresholdPreset, ThresholdSet, ThresholdSpec,
};
pub use definition::{AssembledDomain, DomainCatalog, DomainDefinition};
pub use filter::{filter, summarize, FilterCriteria, FilterStats, KindFilter};
pub use hierarchy::{
    build, build_flat, build_from_paths, build_from_relations, build_with_mode, BuildWarning,
    Forest, HierarchyMode, Node, NodeIter, SortPolicy, MAX_TREE_LEVEL,
};
pub use normalizer::{
    normalize, normalize_all, normalize_relations, parse_number, FieldMapping, NormalizeError,
    NormalizedBatch, NumericField, PercentScale, PercentageField, RelationBatch, ValueKind,
};
pub use record::{Record, RecordKind, Relation};
