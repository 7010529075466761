//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use traffic_routing::bootstrap::{self, RoutingEngine};
use traffic_routing::config::RouterConfig;
use traffic_routing::source::{MemoryPropertySource, PropertySources};

pub const ALICE_ORDERS: &str = "strategy: workstation
config:
  user: alice
constraints:
  include:
    mdc/tenant: beta
";

/// A mutable property source the test keeps a handle on.
pub fn memory_source(pairs: &[(&str, &str)]) -> Arc<MemoryPropertySource> {
    Arc::new(MemoryPropertySource::from_pairs(
        "test",
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
    ))
}

/// Build an engine over a single memory source.
pub fn engine(config: &RouterConfig, source: Arc<MemoryPropertySource>) -> RoutingEngine {
    bootstrap::build_with_sources(config, PropertySources::new().with_source(source))
        .expect("engine should build")
}

/// A rule document routing to `user` when `mdc/tenant` equals `tenant`, tagged with `generation`.
pub fn tagged_rule(user: &str, tenant: &str, generation: u64) -> String {
    format!(
        "strategy: workstation\nconfig: {{user: {user}, generation: '{generation}'}}\nconstraints: {{include: {{mdc/tenant: {tenant}}}}}"
    )
}
