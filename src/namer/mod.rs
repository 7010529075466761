//! Task queue naming.
//!
//! # Data Flow
//! ```text
//! name(task_queue)
//!     → RouteRepository::find_matching(task_queue, current context)
//!     → StrategyRegistry::of(rule.strategy)
//!     → RouteStrategy::resolve_task_queue_name(rule)
//!     → fallback name when no rule or no strategy applies
//! ```
//!
//! # Design Decisions
//! - Naming never fails; every path ends in a usable queue name
//! - Exactly one namer variant is active per process, chosen at startup
//! - Only the workstation namer can fail, and only at construction

pub mod routing;
pub mod workstation;

pub use routing::RoutingTaskQueueNamer;
pub use workstation::WorkstationTaskQueueNamer;

use std::sync::Arc;
use thiserror::Error;

use crate::context::RoutingContext;
use crate::routing::{RouteRepository, RoutingRule};
use crate::strategy::StrategyRegistry;

#[derive(Debug, Error)]
pub enum NamerError {
    #[error("unable to resolve deployment environment from property '{key}'")]
    MissingEnvironment { key: String },
}

/// Outcome of naming one task queue.
#[derive(Debug, Clone)]
pub struct QueueResolution {
    pub name: String,
    /// The rule whose strategy produced `name`; `None` when a fallback was used.
    pub rule: Option<Arc<RoutingRule>>,
}

/// Produces the physical task queue name for a logical one.
pub trait TaskQueueNamer: Send + Sync {
    /// Name `task_queue` for the given context, keeping the rule that applied.
    fn resolve_with(&self, task_queue: &str, ctx: &RoutingContext) -> QueueResolution;

    /// Name `task_queue` for the given context.
    fn name_with(&self, task_queue: &str, ctx: &RoutingContext) -> String {
        self.resolve_with(task_queue, ctx).name
    }

    /// Name `task_queue` for the current call-scoped context.
    fn name(&self, task_queue: &str) -> String {
        self.name_with(task_queue, &RoutingContext::current())
    }

    /// Variant name for diagnostics.
    fn variant(&self) -> &'static str;
}

/// Apply the matching rule's strategy, falling back to `fallback` when no rule
/// matches or its strategy is unknown.
fn resolve_routed(
    repository: &dyn RouteRepository,
    strategies: &StrategyRegistry,
    task_queue: &str,
    ctx: &RoutingContext,
    fallback: impl FnOnce() -> String,
) -> QueueResolution {
    let routed = repository.find_matching(task_queue, ctx).and_then(|rule| {
        let strategy = strategies.of(&rule.strategy)?;
        Some(QueueResolution {
            name: strategy.resolve_task_queue_name(&rule),
            rule: Some(rule),
        })
    });
    routed.unwrap_or_else(|| QueueResolution {
        name: fallback(),
        rule: None,
    })
}
