//! Workstation routing namer.
//!
//! Used when the process runs on a developer workstation: unrouted work goes to
//! a personal queue rather than the shared one.

use std::sync::Arc;

use super::{resolve_routed, NamerError, QueueResolution, TaskQueueNamer};
use crate::config::NamerSettings;
use crate::context::RoutingContext;
use crate::routing::RouteRepository;
use crate::source::PropertySource;
use crate::strategy::StrategyRegistry;

/// Falls back to `<operator>@<domain>/<task-queue>`.
pub struct WorkstationTaskQueueNamer {
    repository: Arc<dyn RouteRepository>,
    strategies: Arc<StrategyRegistry>,
    operator: String,
    domain: String,
    environment: String,
}

impl WorkstationTaskQueueNamer {
    /// Build the namer, failing if the deployment environment cannot be resolved.
    pub fn new(
        repository: Arc<dyn RouteRepository>,
        strategies: Arc<StrategyRegistry>,
        properties: &dyn PropertySource,
        settings: &NamerSettings,
    ) -> Result<Self, NamerError> {
        let environment = properties
            .get_property(&settings.environment_key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| NamerError::MissingEnvironment {
                key: settings.environment_key.clone(),
            })?;

        let operator = settings
            .operator
            .clone()
            .or_else(local_operator)
            .unwrap_or_else(|| {
                tracing::warn!("Unable to resolve local operator, using 'unknown'");
                "unknown".to_string()
            });

        tracing::info!(
            environment = %environment,
            operator = %operator,
            domain = %settings.domain,
            "Workstation task queue namer initialized"
        );

        Ok(Self {
            repository,
            strategies,
            operator,
            domain: settings.domain.clone(),
            environment,
        })
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Operators are assumed to have an identity matching their email address.
    fn workstation_name(&self, task_queue: &str) -> String {
        format!("{}@{}/{}", self.operator, self.domain, task_queue)
    }
}

impl TaskQueueNamer for WorkstationTaskQueueNamer {
    fn resolve_with(&self, task_queue: &str, ctx: &RoutingContext) -> QueueResolution {
        resolve_routed(self.repository.as_ref(), &self.strategies, task_queue, ctx, || {
            self.workstation_name(task_queue)
        })
    }

    fn variant(&self) -> &'static str {
        "workstation"
    }
}

fn local_operator() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .filter(|user| !user.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namer::testing::FixedRepository;
    use crate::routing::RoutingRule;
    use crate::source::MemoryPropertySource;

    fn settings() -> NamerSettings {
        NamerSettings {
            operator: Some("dev".to_string()),
            domain: "corp.example".to_string(),
            ..NamerSettings::default()
        }
    }

    fn namer(rule: Option<RoutingRule>) -> WorkstationTaskQueueNamer {
        let properties = MemoryPropertySource::from_pairs("test", [("deployment.environment", "test")]);
        WorkstationTaskQueueNamer::new(
            Arc::new(FixedRepository { rule: rule.map(Arc::new) }),
            Arc::new(StrategyRegistry::with_defaults()),
            &properties,
            &settings(),
        )
        .unwrap()
    }

    #[test]
    fn test_fallback_is_workstation_name() {
        let namer = namer(None);
        assert_eq!(namer.environment(), "test");
        assert_eq!(namer.name("orders"), "dev@corp.example/orders");
    }

    #[test]
    fn test_matching_rule_wins_over_fallback() {
        let rule = RoutingRule::new("orders", "alice", "workstation").with_config("user", "alice");
        assert_eq!(namer(Some(rule)).name("orders"), "alice/orders");
    }

    #[test]
    fn test_unknown_strategy_uses_fallback() {
        let rule = RoutingRule::new("orders", "alice", "laptop");
        assert_eq!(namer(Some(rule)).name("orders"), "dev@corp.example/orders");
    }

    #[test]
    fn test_missing_environment_is_fatal() {
        let properties = MemoryPropertySource::new("empty");
        let result = WorkstationTaskQueueNamer::new(
            Arc::new(FixedRepository { rule: None }),
            Arc::new(StrategyRegistry::with_defaults()),
            &properties,
            &settings(),
        );
        assert!(matches!(
            result,
            Err(NamerError::MissingEnvironment { ref key }) if key == "deployment.environment"
        ));
    }
}
