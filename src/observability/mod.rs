//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing and config subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (lookup and reload counters)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Metrics are cheap (counter increments with static labels)

pub mod logging;
pub mod metrics;
