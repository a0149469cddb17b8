//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `source` - Metrics sources (JSON files, in-memory, memoizing decorator)
//! - `http` - Read-only REST API for the front-end

pub mod http;
pub mod source;

pub use source::{InMemorySource, JsonFileSource, MemoizingSource};
