//! Dashboard query handlers.
//!
//! Read-only handlers that fetch fresh source data and run it through the
//! metrics engine. Nothing is stored between calls.

mod error;
mod get_domain_tree;
mod get_region_map;
mod list_domains;
mod load_dashboard_tab;
mod loader;
mod query_metas;

#[cfg(test)]
mod fixtures;

pub use error::DashboardError;
pub use get_domain_tree::{GetDomainTreeHandler, GetDomainTreeQuery, GetDomainTreeResult};
pub use get_region_map::{GetRegionMapHandler, GetRegionMapQuery, GetRegionMapResult};
pub use list_domains::{DomainSummary, ListDomainsHandler};
pub use load_dashboard_tab::{
    LoadDashboardTabHandler, LoadDashboardTabQuery, LoadDashboardTabResult,
};
pub use loader::DomainLoader;
pub use query_metas::{QueryMetasHandler, QueryMetasQuery, QueryMetasResult};
