//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! service config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → bootstrap wires sources, repository, namer
//!
//! Property files (routing rules) change:
//!     watcher.rs detects change
//!     → refresh scheduler refreshes the repository immediately
//! ```
//!
//! # Design Decisions
//! - Service config is immutable once loaded; routing rules are the hot part
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, DeploymentSettings, EvaluatorKind, NamerSettings, NamerVariant,
    ObservabilityConfig, RouterConfig, RoutingSettings, SourceSettings,
};
pub use watcher::PropertyFileWatcher;
