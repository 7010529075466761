//! Refresh scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! Fixed-delay ticker ──┐
//!                      ├→ scheduler.rs → spawn_blocking(repository.refresh())
//! File change events ──┘
//! Shutdown broadcast  → scheduler exits
//! ```
//!
//! # Design Decisions
//! - The repository does not schedule itself; the host owns the task
//! - Missed ticks are delayed, not bursted
//! - Overlap is prevented by the repository's try-lock, not by the scheduler

pub mod scheduler;

pub use scheduler::RefreshScheduler;
