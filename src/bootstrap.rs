//! Startup wiring.
//!
//! # Responsibilities
//! - Build property sources from the service config
//! - Read the `<prefix>.enabled` control key
//! - Assemble evaluators, strategies, repository and the active namer
//!
//! # Design Decisions
//! - Selection is static and config-driven; nothing is swapped at runtime
//! - Fail fast: only the workstation namer can refuse to start

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{EvaluatorKind, NamerVariant, RouterConfig, SourceSettings};
use crate::namer::{NamerError, RoutingTaskQueueNamer, TaskQueueNamer, WorkstationTaskQueueNamer};
use crate::routing::{
    ConstraintEvaluator, ContextConstraintEvaluator, DeploymentConstraintEvaluator, EvaluatorChain,
    PropertyRouteRepository, RouteRepository,
};
use crate::source::{FilePropertySource, MemoryPropertySource, PropertySources};
use crate::strategy::StrategyRegistry;

/// Everything the host needs to route task queues.
pub struct RoutingEngine {
    pub sources: Arc<PropertySources>,
    pub repository: Arc<PropertyRouteRepository>,
    pub strategies: Arc<StrategyRegistry>,
    pub namer: Arc<dyn TaskQueueNamer>,
    /// Property files to watch for hot reload.
    pub watched_files: Vec<PathBuf>,
}

/// Property files first (in configured order), inline properties last.
pub fn build_sources(settings: &SourceSettings) -> PropertySources {
    let mut sources = PropertySources::new();
    for path in &settings.files {
        sources.push(Arc::new(FilePropertySource::new(path)));
    }
    sources.push(Arc::new(MemoryPropertySource::from_pairs(
        "inline",
        settings.properties.clone(),
    )));
    sources
}

/// Whether routing is switched on via `<key_prefix>.enabled` (default true).
pub fn routing_enabled(sources: &PropertySources, key_prefix: &str) -> bool {
    sources.get_bool(&format!("{key_prefix}.enabled"), true)
}

pub fn build_evaluator(config: &RouterConfig) -> EvaluatorChain {
    let evaluators = config
        .routing
        .evaluators
        .iter()
        .map(|kind| -> Arc<dyn ConstraintEvaluator> {
            match kind {
                EvaluatorKind::Context => Arc::new(ContextConstraintEvaluator),
                EvaluatorKind::Deployment => Arc::new(DeploymentConstraintEvaluator::new(
                    config.deployment.metadata.clone(),
                )),
            }
        })
        .collect();
    EvaluatorChain::new(evaluators)
}

pub fn build_namer(
    config: &RouterConfig,
    repository: Arc<dyn RouteRepository>,
    strategies: Arc<StrategyRegistry>,
    sources: &PropertySources,
) -> Result<Arc<dyn TaskQueueNamer>, NamerError> {
    let namer: Arc<dyn TaskQueueNamer> = match config.namer.variant {
        NamerVariant::Generic => Arc::new(RoutingTaskQueueNamer::new(repository, strategies)),
        NamerVariant::Workstation => Arc::new(WorkstationTaskQueueNamer::new(
            repository,
            strategies,
            sources,
            &config.namer,
        )?),
    };
    tracing::info!(variant = config.namer.variant.as_str(), "Task queue namer selected");
    Ok(namer)
}

/// Build the engine reading from the sources named in `config`.
pub fn build(config: &RouterConfig) -> Result<RoutingEngine, NamerError> {
    build_with_sources(config, build_sources(&config.source))
}

/// Build the engine over caller-provided sources.
pub fn build_with_sources(
    config: &RouterConfig,
    sources: PropertySources,
) -> Result<RoutingEngine, NamerError> {
    let sources = Arc::new(sources);
    let repository = Arc::new(PropertyRouteRepository::new(
        sources.clone(),
        Arc::new(build_evaluator(config)),
        config.routing.key_prefix.clone(),
    ));
    let strategies = Arc::new(StrategyRegistry::with_defaults());
    let namer = build_namer(config, repository.clone(), strategies.clone(), &sources)?;

    Ok(RoutingEngine {
        sources,
        repository,
        strategies,
        namer,
        watched_files: config.source.files.iter().map(PathBuf::from).collect(),
    })
}
