//! Generic routing namer for deployed workers.

use std::sync::Arc;

use super::{resolve_routed, QueueResolution, TaskQueueNamer};
use crate::context::RoutingContext;
use crate::routing::RouteRepository;
use crate::strategy::StrategyRegistry;

/// Falls back to the original task queue name.
pub struct RoutingTaskQueueNamer {
    repository: Arc<dyn RouteRepository>,
    strategies: Arc<StrategyRegistry>,
}

impl RoutingTaskQueueNamer {
    pub fn new(repository: Arc<dyn RouteRepository>, strategies: Arc<StrategyRegistry>) -> Self {
        Self {
            repository,
            strategies,
        }
    }
}

impl TaskQueueNamer for RoutingTaskQueueNamer {
    fn resolve_with(&self, task_queue: &str, ctx: &RoutingContext) -> QueueResolution {
        resolve_routed(self.repository.as_ref(), &self.strategies, task_queue, ctx, || {
            task_queue.to_string()
        })
    }

    fn variant(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namer::testing::FixedRepository;
    use crate::routing::RoutingRule;

    fn namer(rule: Option<RoutingRule>) -> RoutingTaskQueueNamer {
        RoutingTaskQueueNamer::new(
            Arc::new(FixedRepository { rule: rule.map(Arc::new) }),
            Arc::new(StrategyRegistry::with_defaults()),
        )
    }

    #[test]
    fn test_no_rule_is_identity() {
        assert_eq!(namer(None).name("orders"), "orders");
    }

    #[test]
    fn test_matching_rule_applies_strategy() {
        let rule = RoutingRule::new("orders", "alice", "workstation").with_config("user", "alice");
        let namer = namer(Some(rule));
        assert_eq!(namer.name("orders"), "alice/orders");
        assert_eq!(namer.name("payments"), "payments");

        let resolution = namer.resolve_with("orders", &RoutingContext::new());
        assert_eq!(resolution.rule.map(|rule| rule.identity.clone()).as_deref(), Some("alice"));
    }

    #[test]
    fn test_unknown_strategy_is_identity() {
        let rule = RoutingRule::new("orders", "alice", "carrier-pigeon");
        let resolution = namer(Some(rule)).resolve_with("orders", &RoutingContext::new());
        assert_eq!(resolution.name, "orders");
        assert!(resolution.rule.is_none());
    }
}
