//! Application handlers.
//!
//! Query handlers that orchestrate the metrics engine over a data source.

pub mod dashboard;

pub use dashboard::{
    DashboardError, DomainLoader, DomainSummary, GetDomainTreeHandler, GetDomainTreeQuery,
    GetRegionMapHandler, GetRegionMapQuery, ListDomainsHandler, LoadDashboardTabHandler,
    LoadDashboardTabQuery, QueryMetasHandler, QueryMetasQuery,
};
