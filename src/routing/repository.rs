//! Routing rule repository.
//!
//! # Responsibilities
//! - Project routing properties from a property source into a rule cache
//! - Reconcile the cache in place on every refresh
//! - Find the single rule whose constraints match a context
//!
//! # Design Decisions
//! - Cache is a `DashMap` keyed by task queue; each key's set is reconciled
//!   under that key's write guard, so readers see a whole generation per key
//! - Unchanged rules keep their `Arc` across refreshes
//! - The refresh guard is a try-lock: overlapping scheduled refreshes skip
//! - Readers never take the refresh guard, except a cold-start lookup

use arc_swap::ArcSwap;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::context::RoutingContext;
use crate::observability::metrics;
use crate::routing::evaluator::ConstraintEvaluator;
use crate::routing::rule::{parse_rule, RoutingRule, RuleParseError};
use crate::source::PropertySource;

/// Default namespace for routing properties.
pub const DEFAULT_KEY_PREFIX: &str = "temporal.routing";

/// Repository of routing rules.
pub trait RouteRepository: Send + Sync {
    /// Find the rule registered for `task_queue_name` whose constraints match `ctx`.
    ///
    /// Should more than one rule match, none is returned.
    fn find_matching(&self, task_queue_name: &str, ctx: &RoutingContext) -> Option<Arc<RoutingRule>>;

    /// All rules known to this repository, in no particular order.
    fn list_all(&self) -> Vec<Arc<RoutingRule>>;
}

/// Result of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    /// Another refresh was already running.
    Skipped,
}

/// Summary of the most recent completed refresh.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub generation: u64,
    pub completed_at_unix_ms: u64,
    pub task_queues: usize,
    pub rules: usize,
    pub skipped_properties: usize,
}

type RuleSet = HashSet<Arc<RoutingRule>>;

/// Route repository backed by a [`PropertySource`].
pub struct PropertyRouteRepository {
    source: Arc<dyn PropertySource>,
    evaluator: Arc<dyn ConstraintEvaluator>,
    key_prefix: String,
    namespace: String,
    control_key: String,
    cache: DashMap<String, RuleSet>,
    has_cached: AtomicBool,
    generation: AtomicU64,
    refresh_guard: Mutex<()>,
    last_report: ArcSwap<RefreshReport>,
}

impl PropertyRouteRepository {
    pub fn new(
        source: Arc<dyn PropertySource>,
        evaluator: Arc<dyn ConstraintEvaluator>,
        key_prefix: impl Into<String>,
    ) -> Self {
        let key_prefix = key_prefix.into();
        Self {
            source,
            evaluator,
            namespace: format!("{key_prefix}."),
            control_key: format!("{key_prefix}.enabled"),
            key_prefix,
            cache: DashMap::new(),
            has_cached: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            refresh_guard: Mutex::new(()),
            last_report: ArcSwap::from_pointee(RefreshReport::default()),
        }
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Whether at least one refresh has completed.
    pub fn has_cached(&self) -> bool {
        self.has_cached.load(Ordering::Acquire)
    }

    pub fn last_report(&self) -> Arc<RefreshReport> {
        self.last_report.load_full()
    }

    /// Re-read the property source and reconcile the cache.
    ///
    /// Returns [`RefreshOutcome::Skipped`] without blocking if a refresh is
    /// already in progress.
    pub fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = self.refresh_guard.try_lock() else {
            tracing::debug!("Traffic routing refresh already running, skipping");
            metrics::record_refresh("skipped");
            return RefreshOutcome::Skipped;
        };
        self.refresh_locked();
        RefreshOutcome::Completed
    }

    /// Populate the cache before the first lookup if the scheduler has not yet done so.
    fn ensure_cached(&self) {
        let _guard = self.refresh_guard.lock();
        if self.has_cached() {
            return;
        }
        tracing::debug!("Traffic routing cache empty on first lookup, refreshing synchronously");
        self.refresh_locked();
    }

    fn refresh_locked(&self) {
        let (data, skipped_properties) = self.read_source();
        let task_queues = data.len();
        let rules = data.values().map(HashSet::len).sum();

        self.write_cache(data);
        self.has_cached.store(true, Ordering::Release);

        let report = RefreshReport {
            generation: self.generation.fetch_add(1, Ordering::Relaxed) + 1,
            completed_at_unix_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            task_queues,
            rules,
            skipped_properties,
        };
        tracing::debug!(
            generation = report.generation,
            task_queues,
            rules,
            skipped = skipped_properties,
            "Traffic routing cache refreshed"
        );
        self.last_report.store(Arc::new(report));

        metrics::record_refresh("completed");
        metrics::record_rules_cached(rules);
    }

    fn read_source(&self) -> (HashMap<String, RuleSet>, usize) {
        let mut data: HashMap<String, RuleSet> = HashMap::new();
        let mut skipped = 0;

        for key in self.source.property_names() {
            if !key.starts_with(&self.namespace) || key == self.control_key {
                continue;
            }
            let Some(value) = self.source.get_property(&key) else {
                continue;
            };

            match parse_rule(&self.key_prefix, &key, &value) {
                Ok(rule) => {
                    data.entry(rule.task_queue_name.clone())
                        .or_default()
                        .insert(Arc::new(rule));
                }
                Err(e @ RuleParseError::MalformedKey { .. }) => {
                    tracing::warn!(property = %key, error = %e, "Failed to extract task queue from routing property");
                    metrics::record_parse_failure(e.kind());
                    skipped += 1;
                }
                Err(e) => {
                    tracing::error!(property = %key, error = %e, "Traffic route property invalid");
                    metrics::record_parse_failure(e.kind());
                    skipped += 1;
                }
            }
        }

        (data, skipped)
    }

    fn write_cache(&self, data: HashMap<String, RuleSet>) {
        self.cache.retain(|queue, _| data.contains_key(queue));

        for (queue, rules) in data {
            match self.cache.entry(queue) {
                Entry::Vacant(slot) => {
                    slot.insert(rules);
                }
                Entry::Occupied(mut slot) => {
                    let current = slot.get_mut();
                    current.retain(|rule| rules.contains(rule));
                    for rule in rules {
                        if !current.contains(&rule) {
                            current.insert(rule);
                        }
                    }
                }
            }
        }
    }
}

impl RouteRepository for PropertyRouteRepository {
    fn find_matching(&self, task_queue_name: &str, ctx: &RoutingContext) -> Option<Arc<RoutingRule>> {
        if !self.has_cached() {
            self.ensure_cached();
        }

        let candidates: Vec<Arc<RoutingRule>> = match self.cache.get(task_queue_name) {
            Some(rules) if !rules.is_empty() => rules.iter().cloned().collect(),
            _ => {
                tracing::debug!(task_queue = %task_queue_name, "No traffic routing rules loaded for task queue");
                metrics::record_lookup("no_rules");
                return None;
            }
        };

        let mut matching: Vec<Arc<RoutingRule>> = candidates
            .into_iter()
            .filter(|rule| self.evaluator.evaluate(&rule.constraints, ctx))
            .collect();

        match matching.len() {
            0 => {
                tracing::debug!(task_queue = %task_queue_name, "No traffic routing rules matched");
                metrics::record_lookup("no_match");
                None
            }
            1 => {
                metrics::record_lookup("matched");
                matching.pop()
            }
            count => {
                tracing::warn!(
                    task_queue = %task_queue_name,
                    count,
                    matching = ?matching,
                    "Multiple traffic routing rules matched, selecting none"
                );
                metrics::record_lookup("ambiguous");
                None
            }
        }
    }

    fn list_all(&self) -> Vec<Arc<RoutingRule>> {
        self.cache
            .iter()
            .flat_map(|entry| entry.value().iter().cloned().collect::<Vec<_>>())
            .collect()
    }
}
