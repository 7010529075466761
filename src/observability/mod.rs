//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Repository, strategies, namers, scheduler produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (refresh, parse failure and lookup counters)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Recovered routing errors surface as warn/error events, never panics
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
