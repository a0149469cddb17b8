//! Metrics source adapters.

mod in_memory;
mod json_file_source;
mod memoizing;

pub use in_memory::InMemorySource;
pub use json_file_source::JsonFileSource;
pub use memoizing::MemoizingSource;
