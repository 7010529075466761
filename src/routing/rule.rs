//! Routing rule model and parsing.
//!
//! A rule is authored as one property:
//!
//! ```text
//! temporal.routing.{task-queue-name}.{identity} = <YAML or JSON document>
//! ```
//!
//! The document carries `strategy`, an optional `config` string map and
//! optional `constraints` with `include` / `exclude` maps whose values may be
//! null.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Include/exclude expectations over the routing context.
///
/// A `None` value requires the key to be absent; `Some(v)` requires an exact,
/// case-sensitive match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstraintModel {
    pub include: BTreeMap<String, Option<String>>,
    pub exclude: BTreeMap<String, Option<String>>,
}

impl ConstraintModel {
    pub fn is_unconstrained(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// The value half of a routing property.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDocument {
    pub strategy: String,

    #[serde(default)]
    pub config: BTreeMap<String, String>,

    #[serde(default)]
    pub constraints: ConstraintModel,
}

/// A parsed routing rule.
///
/// Equality covers the queue and the document only; the cache relies on it to
/// diff generations. Identical documents under two identities are one rule.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingRule {
    /// Logical task queue, taken from the property key.
    pub task_queue_name: String,

    /// Trailing key segment, usually the author.
    pub identity: String,

    pub strategy: String,
    pub config: BTreeMap<String, String>,
    pub constraints: ConstraintModel,
}

impl RoutingRule {
    pub fn new(
        task_queue_name: impl Into<String>,
        identity: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            task_queue_name: task_queue_name.into(),
            identity: identity.into(),
            strategy: strategy.into(),
            config: BTreeMap::new(),
            constraints: ConstraintModel::default(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn with_include(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.constraints.include.insert(key.into(), value.map(str::to_string));
        self
    }

    pub fn with_exclude(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.constraints.exclude.insert(key.into(), value.map(str::to_string));
        self
    }

    fn from_document(key: RouteKey, document: RouteDocument) -> Self {
        Self {
            task_queue_name: key.task_queue_name,
            identity: key.identity,
            strategy: document.strategy,
            config: document.config,
            constraints: document.constraints,
        }
    }
}

impl PartialEq for RoutingRule {
    fn eq(&self, other: &Self) -> bool {
        self.task_queue_name == other.task_queue_name
            && self.strategy == other.strategy
            && self.config == other.config
            && self.constraints == other.constraints
    }
}

impl Eq for RoutingRule {}

impl Hash for RoutingRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.task_queue_name.hash(state);
        self.strategy.hash(state);
        self.config.hash(state);
        self.constraints.hash(state);
    }
}

/// Key segments of a routing property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    pub task_queue_name: String,
    pub identity: String,
}

/// Why a routing property was skipped.
#[derive(Debug, Error)]
pub enum RuleParseError {
    #[error("must use '{prefix}.{{task-queue-name}}.{{identity}}' format, got '{key}'")]
    MalformedKey { key: String, prefix: String },

    #[error("routing document is empty")]
    EmptyValue,

    #[error("invalid routing document: {0}")]
    InvalidDocument(#[from] serde_yaml::Error),
}

impl RuleParseError {
    /// Metric label for the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            RuleParseError::MalformedKey { .. } => "key",
            RuleParseError::EmptyValue | RuleParseError::InvalidDocument(_) => "value",
        }
    }
}

/// Split `key` into task queue and identity below `prefix`.
///
/// The key must consist of exactly the prefix segments plus two non-empty
/// segments.
pub fn parse_key(prefix: &str, key: &str) -> Result<RouteKey, RuleParseError> {
    let malformed = || RuleParseError::MalformedKey {
        key: key.to_string(),
        prefix: prefix.to_string(),
    };

    let rest = key
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .ok_or_else(malformed)?;

    let segments: Vec<&str> = rest.split('.').collect();
    match segments.as_slice() {
        [queue, identity] if !queue.is_empty() && !identity.is_empty() => Ok(RouteKey {
            task_queue_name: queue.to_string(),
            identity: identity.to_string(),
        }),
        _ => Err(malformed()),
    }
}

pub fn parse_document(value: &str) -> Result<RouteDocument, RuleParseError> {
    if value.trim().is_empty() {
        return Err(RuleParseError::EmptyValue);
    }
    Ok(serde_yaml::from_str(value)?)
}

/// Parse one routing property into a rule.
pub fn parse_rule(prefix: &str, key: &str, value: &str) -> Result<RoutingRule, RuleParseError> {
    let route_key = parse_key(prefix, key)?;
    let document = parse_document(value)?;
    Ok(RoutingRule::from_document(route_key, document))
}
