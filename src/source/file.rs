//! TOML file property source.
//!
//! Nested tables are flattened into dotted keys, so both of these define the
//! property `temporal.routing.orders.alice`:
//!
//! ```toml
//! [temporal.routing.orders]
//! alice = "strategy: workstation"
//!
//! "temporal.routing.orders.alice" = "strategy: workstation"
//! ```
//!
//! The file is re-read on every enumeration; values are served from the
//! snapshot taken by the most recent enumeration.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{PropertySource, SourceError};

type Snapshot = Arc<BTreeMap<String, String>>;

/// Property source reading a TOML file from disk.
#[derive(Debug)]
pub struct FilePropertySource {
    name: String,
    path: PathBuf,
    snapshot: RwLock<Option<Snapshot>>,
}

impl FilePropertySource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: format!("file:{}", path.display()),
            path,
            snapshot: RwLock::new(None),
        }
    }

    /// Read and flatten the file.
    pub fn load(&self) -> Result<BTreeMap<String, String>, SourceError> {
        let content = fs::read_to_string(&self.path)?;
        let table: toml::Table = content.parse()?;
        let mut properties = BTreeMap::new();
        flatten(None, &table, &mut properties);
        Ok(properties)
    }

    fn reload(&self) -> Snapshot {
        let properties = match self.load() {
            Ok(properties) => properties,
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Failed to read property file");
                BTreeMap::new()
            }
        };
        let snapshot = Arc::new(properties);
        *self.snapshot.write() = Some(snapshot.clone());
        snapshot
    }

    fn current(&self) -> Snapshot {
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return snapshot.clone();
        }
        self.reload()
    }
}

impl PropertySource for FilePropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn property_names(&self) -> Vec<String> {
        self.reload().keys().cloned().collect()
    }

    fn get_property(&self, key: &str) -> Option<String> {
        self.current().get(key).cloned()
    }
}

fn flatten(prefix: Option<&str>, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            toml::Value::Table(nested) => flatten(Some(&full_key), nested, out),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}
