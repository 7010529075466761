//! In-memory property source.
//!
//! Used for inline properties from the service config and for tests.

use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::PropertySource;

/// Property source backed by a map that can be updated at runtime.
#[derive(Debug)]
pub struct MemoryPropertySource {
    name: String,
    properties: RwLock<BTreeMap<String, String>>,
}

impl MemoryPropertySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = Self::new(name);
        source.replace_all(pairs);
        source
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.properties.write().remove(key)
    }

    /// Swap the whole property set in one step.
    pub fn replace_all<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let next: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        *self.properties.write() = next;
    }

    pub fn len(&self) -> usize {
        self.properties.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.read().is_empty()
    }
}

impl PropertySource for MemoryPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn property_names(&self) -> Vec<String> {
        self.properties.read().keys().cloned().collect()
    }

    fn get_property(&self, key: &str) -> Option<String> {
        self.properties.read().get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates() {
        let source = MemoryPropertySource::new("test");
        assert!(source.is_empty());

        source.set("temporal.routing.orders.alice", "strategy: workstation");
        assert_eq!(source.len(), 1);
        assert_eq!(
            source.get_property("temporal.routing.orders.alice").as_deref(),
            Some("strategy: workstation")
        );

        assert!(source.remove("temporal.routing.orders.alice").is_some());
        assert!(source.property_names().is_empty());
    }

    #[test]
    fn test_replace_all() {
        let source = MemoryPropertySource::from_pairs("test", [("a", "1"), ("b", "2")]);
        source.replace_all([("c", "3")]);
        assert_eq!(source.property_names(), vec!["c".to_string()]);
        assert_eq!(source.get_property("a"), None);
    }
}
