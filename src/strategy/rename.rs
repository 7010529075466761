//! Pass-through rename strategy.

use super::{required_config, RouteStrategy};
use crate::routing::RoutingRule;

/// Sends work to the queue named by the rule's `task_queue` config, verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameRouteStrategy;

impl RouteStrategy for RenameRouteStrategy {
    fn kind(&self) -> &str {
        "rename"
    }

    fn resolve_task_queue_name(&self, rule: &RoutingRule) -> String {
        match required_config(rule, "task_queue") {
            Some(target) => target.to_string(),
            None => {
                tracing::warn!(
                    rule = ?rule,
                    "Misconfigured rename route: missing 'task_queue', will not override task queue"
                );
                rule.task_queue_name.clone()
            }
        }
    }
}
