//! Route strategies.
//!
//! # Data Flow
//! ```text
//! Matched RoutingRule
//!     → StrategyRegistry::of(rule.strategy)
//!     → RouteStrategy::resolve_task_queue_name(rule)
//!     → destination task queue name
//! ```
//!
//! # Design Decisions
//! - Strategies are pure apart from logging
//! - Missing or blank required config returns the original queue name
//! - Unknown strategy names resolve to no strategy, never an error

pub mod rename;
pub mod workstation;

pub use rename::RenameRouteStrategy;
pub use workstation::WorkstationRouteStrategy;

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::RoutingRule;

/// Computes the destination task queue for a matched rule.
pub trait RouteStrategy: Send + Sync + std::fmt::Debug {
    /// Name referenced by a rule's `strategy` field.
    fn kind(&self) -> &str;

    fn resolve_task_queue_name(&self, rule: &RoutingRule) -> String;
}

/// Strategies by kind.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn RouteStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in strategy.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(Arc::new(WorkstationRouteStrategy))
            .with(Arc::new(RenameRouteStrategy))
    }

    pub fn with(mut self, strategy: Arc<dyn RouteStrategy>) -> Self {
        self.register(strategy);
        self
    }

    /// Register a strategy, replacing any previous one of the same kind.
    pub fn register(&mut self, strategy: Arc<dyn RouteStrategy>) {
        self.strategies.insert(strategy.kind().to_string(), strategy);
    }

    /// Look up a strategy, warning when none is registered under `kind`.
    pub fn of(&self, kind: &str) -> Option<Arc<dyn RouteStrategy>> {
        let strategy = self.strategies.get(kind).cloned();
        if strategy.is_none() {
            tracing::warn!(strategy = %kind, "No route strategy registered, ignoring rule");
        }
        strategy
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

/// Non-blank config value.
fn required_config<'a>(rule: &'a RoutingRule, key: &str) -> Option<&'a str> {
    rule.config
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.kinds(), vec!["rename", "workstation"]);
        assert_eq!(registry.of("workstation").unwrap().kind(), "workstation");
        assert!(registry.of("laptop").is_none());
    }

    #[test]
    fn test_register_replaces_same_kind() {
        #[derive(Debug)]
        struct Fixed;
        impl RouteStrategy for Fixed {
            fn kind(&self) -> &str {
                "workstation"
            }
            fn resolve_task_queue_name(&self, _rule: &RoutingRule) -> String {
                "fixed".to_string()
            }
        }

        let registry = StrategyRegistry::with_defaults().with(Arc::new(Fixed));
        let rule = RoutingRule::new("orders", "alice", "workstation").with_config("user", "alice");
        assert_eq!(registry.of("workstation").unwrap().resolve_task_queue_name(&rule), "fixed");
    }
}
