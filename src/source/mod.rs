//! Property source subsystem.
//!
//! # Data Flow
//! ```text
//! TOML property files / inline service config / programmatic updates
//!     → PropertySource (enumerable key/value view)
//!     → PropertySources (ordered, first source holding a key wins)
//!     → routing repository refresh (reads every key in the namespace)
//! ```
//!
//! # Design Decisions
//! - Sources are blocking; async callers run them through `spawn_blocking`
//! - Enumeration returns key names only, values are fetched per key
//! - A source that cannot be read enumerates nothing instead of failing

pub mod file;
pub mod memory;

pub use file::FilePropertySource;
pub use memory::MemoryPropertySource;

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while reading a property source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// An enumerable key/value property source.
pub trait PropertySource: Send + Sync + std::fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// All property keys currently held by this source.
    fn property_names(&self) -> Vec<String>;

    /// Value for `key`, if present.
    fn get_property(&self, key: &str) -> Option<String>;
}

/// Ordered collection of property sources.
///
/// Earlier sources take precedence: a key is resolved from the first source
/// that holds it.
#[derive(Debug, Clone, Default)]
pub struct PropertySources {
    sources: Vec<Arc<dyn PropertySource>>,
}

impl PropertySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower precedence than those already added.
    pub fn with_source(mut self, source: Arc<dyn PropertySource>) -> Self {
        self.push(source);
        self
    }

    pub fn push(&mut self, source: Arc<dyn PropertySource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Read `key` as a boolean, falling back to `default` when absent or unparsable.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_property(key) {
            None => default,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => {
                    tracing::warn!(key = %key, value = %raw, default, "Ignoring non-boolean property value");
                    default
                }
            },
        }
    }
}

impl PropertySource for PropertySources {
    fn name(&self) -> &str {
        "composite"
    }

    fn property_names(&self) -> Vec<String> {
        let names: BTreeSet<String> = self
            .sources
            .iter()
            .flat_map(|source| source.property_names())
            .collect();
        names.into_iter().collect()
    }

    fn get_property(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get_property(key))
    }
}
