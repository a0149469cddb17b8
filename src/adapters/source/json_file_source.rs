//! File-based Metrics Source Adapter
//!
//! Reads pre-computed exports from a data directory:
//!
//! - `<dir>/<domain>.json` - array of flat row objects
//! - `<dir>/<domain>.relations.json` - array of `{idPadre, idHijo}` edges
//!
//! A file that is not a JSON array is malformed. Individual edges that lack
//! usable ids are dropped with a warning and the remaining edges are served.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::metrics::{normalize_relations, Relation};
use crate::ports::{MetricsSource, SourceError};

/// Metrics source backed by JSON files on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    base_path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let source = JsonFileSource::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn rows_path(&self, domain: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", domain))
    }

    fn relations_path(&self, domain: &str) -> PathBuf {
        self.base_path.join(format!("{}.relations.json", domain))
    }

    /// Reads a file and checks that it holds a JSON array
    async fn read_array(&self, domain: &str, path: &Path) -> Result<Value, SourceError> {
        // Domain keys come from URLs; never let them leave the data directory
        if domain.is_empty() || domain.contains(['/', '\\']) || domain.contains("..") {
            return Err(SourceError::NotFound(domain.to_string()));
        }

        let text = fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Unavailable(format!("{}: {}", path.display(), e)),
        })?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| SourceError::malformed(path.display().to_string(), e.to_string()))?;
        if !value.is_array() {
            return Err(SourceError::malformed(
                path.display().to_string(),
                "expected a JSON array",
            ));
        }

        debug!(path = %path.display(), "Read dataset file");
        Ok(value)
    }
}

#[async_trait]
impl MetricsSource for JsonFileSource {
    async fn fetch_rows(&self, domain: &str) -> Result<Vec<Value>, SourceError> {
        let path = self.rows_path(domain);
        match self.read_array(domain, &path).await? {
            Value::Array(rows) => Ok(rows),
            _ => Err(SourceError::malformed(domain, "expected a JSON array")),
        }
    }

    async fn fetch_relations(&self, domain: &str) -> Result<Vec<Relation>, SourceError> {
        let path = self.relations_path(domain);
        let Value::Array(edges) = self.read_array(domain, &path).await? else {
            return Err(SourceError::malformed(domain, "expected a JSON array"));
        };
        let batch = normalize_relations(edges);
        if batch.skipped > 0 {
            warn!(
                path = %path.display(),
                skipped = batch.skipped,
                "Dropped malformed relation edges"
            );
        }
        Ok(batch.relations)
    }
}
