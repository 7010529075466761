//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Refresh (scheduler tick or cold start):
//!     PropertySource keys under `temporal.routing.`
//!     → rule.rs (parse key segments + YAML/JSON document)
//!     → repository.rs (reconcile per-queue rule sets in the cache)
//!
//! Lookup (per unit of work):
//!     task queue name + RoutingContext
//!     → repository.rs (candidate rules for the queue)
//!     → evaluator.rs (constraints against context)
//!     → exactly one match, or none
//! ```
//!
//! # Design Decisions
//! - Malformed properties are skipped and logged, never fatal
//! - More than one match is treated as no match
//! - Readers never wait on a refresh except on cold start

pub mod evaluator;
pub mod repository;
pub mod rule;

pub use evaluator::{
    ConstraintEvaluator, ContextConstraintEvaluator, DeploymentConstraintEvaluator, EvaluatorChain,
};
pub use repository::{
    PropertyRouteRepository, RefreshOutcome, RefreshReport, RouteRepository, DEFAULT_KEY_PREFIX,
};
pub use rule::{ConstraintModel, RoutingRule, RuleParseError};
