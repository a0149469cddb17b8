//! Dashboard view models handed to the rendering front-end.

pub mod metas_table;
pub mod region_map;
pub mod snapshot;
pub mod tree_view;

pub use metas_table::{MetasRow, MetasTable};
pub use region_map::{RegionCell, RegionMap};
pub use snapshot::{DashboardTab, DomainSnapshot};
pub use tree_view::ClassifiedNode;
