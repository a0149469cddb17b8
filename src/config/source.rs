//! Data source configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where domain datasets are read from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Directory holding `<domain>.json` and `<domain>.relations.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Keep the first successful fetch of each domain for the process lifetime
    #[serde(default = "default_memoize")]
    pub memoize: bool,
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("source.data_dir"));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            memoize: default_memoize(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_memoize() -> bool {
    true
}
