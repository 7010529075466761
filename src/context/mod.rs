//! Call-scoped routing context.
//!
//! # Data Flow
//! ```text
//! Upstream (request handler, worker) builds RoutingContext
//!     → RoutingContext::scope(ctx, work) for the unit of work
//!     → TaskQueueNamer::name reads RoutingContext::current()
//!     → constraint evaluators read attributes
//! ```
//!
//! # Design Decisions
//! - Attributes are immutable once built; cloning is an `Arc` bump
//! - Outside any scope the current context is empty
//! - Callers that already hold a context pass it explicitly instead

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT: RoutingContext;
}

/// Key/value attributes describing the current unit of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingContext {
    attributes: Arc<BTreeMap<String, String>>,
}

impl RoutingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this context with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.attributes).insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The context of the enclosing scope, or an empty one.
    pub fn current() -> Self {
        CURRENT.try_with(|ctx| ctx.clone()).unwrap_or_default()
    }

    /// Run `work` with this context as the current one.
    pub async fn scope<F>(self, work: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, work).await
    }

    /// Synchronous variant of [`RoutingContext::scope`].
    pub fn sync_scope<R>(self, work: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, work)
    }
}

impl<K, V> FromIterator<(K, V)> for RoutingContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let attributes = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            attributes: Arc::new(attributes),
        }
    }
}
