//! Task queue traffic routing library.
//!
//! Resolves, at dispatch time, the physical task queue a unit of work should be
//! sent to, based on routing rules read from hot-reloadable property sources.

pub mod admin;
pub mod bootstrap;
pub mod config;
pub mod context;
pub mod lifecycle;
pub mod namer;
pub mod observability;
pub mod refresh;
pub mod routing;
pub mod source;
pub mod strategy;

pub use config::schema::RouterConfig;
pub use context::RoutingContext;
pub use lifecycle::Shutdown;
pub use namer::TaskQueueNamer;
pub use routing::{PropertyRouteRepository, RouteRepository, RoutingRule};
