//! Workstation route strategy.

use super::{required_config, RouteStrategy};
use crate::routing::RoutingRule;

/// Renames task queues for work routed to a developer workstation:
/// `<user>/<task-queue>`.
///
/// Must stay compatible with the names workstation workers poll.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkstationRouteStrategy;

impl RouteStrategy for WorkstationRouteStrategy {
    fn kind(&self) -> &str {
        "workstation"
    }

    fn resolve_task_queue_name(&self, rule: &RoutingRule) -> String {
        match required_config(rule, "user") {
            Some(user) => format!("{}/{}", user, rule.task_queue_name),
            None => {
                tracing::warn!(
                    rule = ?rule,
                    "Misconfigured workstation route: missing 'user', will not override task queue"
                );
                rule.task_queue_name.clone()
            }
        }
    }
}
