//! Configuration schema definitions.
//!
//! Service configuration for the traffic router host. Routing rules themselves
//! are not part of this file; they live in the property sources it points to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the traffic router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Rule namespace and refresh cadence.
    pub routing: RoutingSettings,

    /// Where routing properties are read from.
    pub source: SourceSettings,

    /// Which queue namer is active and how it falls back.
    pub namer: NamerSettings,

    /// Static metadata about this deployment.
    pub deployment: DeploymentSettings,

    /// Inspection endpoint.
    pub admin: AdminConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Constraint evaluators that can be enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    /// `mdc/` constraints against the routing context.
    Context,
    /// `env/` constraints against `deployment.metadata`.
    Deployment,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Property namespace; rules live at `<key_prefix>.<task-queue>.<identity>`.
    pub key_prefix: String,

    /// Delay between refresh cycles in seconds.
    pub refresh_interval_secs: u64,

    /// Refresh immediately when a property file changes.
    pub watch_files: bool,

    /// Evaluators combined with AND semantics.
    pub evaluators: Vec<EvaluatorKind>,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            key_prefix: "temporal.routing".to_string(),
            refresh_interval_secs: 10,
            watch_files: true,
            evaluators: vec![EvaluatorKind::Context],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// TOML property files, highest precedence first.
    pub files: Vec<String>,

    /// Inline properties with the lowest precedence.
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamerVariant {
    /// Falls back to the original task queue name.
    #[default]
    Generic,
    /// Falls back to `<operator>@<domain>/<task-queue>`.
    Workstation,
}

impl NamerVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamerVariant::Generic => "generic",
            NamerVariant::Workstation => "workstation",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NamerSettings {
    pub variant: NamerVariant,

    /// Domain used for workstation fallback names.
    pub domain: String,

    /// Operator identity; defaults to the `USER` / `USERNAME` environment variable.
    pub operator: Option<String>,

    /// Property holding the deployment environment, required by the workstation namer.
    pub environment_key: String,
}

impl Default for NamerSettings {
    fn default() -> Self {
        Self {
            variant: NamerVariant::Generic,
            domain: "example.com".to_string(),
            operator: None,
            environment_key: "deployment.environment".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentSettings {
    /// Matched by `env/` constraints, e.g. `region = "us-east-1"`.
    pub metadata: BTreeMap<String, String>,
}

/// Inspection endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    pub enabled: bool,

    /// Bearer token; no authentication when unset.
    pub api_key: Option<String>,

    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
