//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! adapter, bridge and send queue produce:
//!     → logging.rs (structured log events, one span per exchange)
//!     → metrics.rs (counters)
//! ```
//!
//! # Design Decisions
//! - Exchange ID flows through every event as a span or field
//! - Metrics go through the `metrics` facade; without a recorder they are free

pub mod logging;
pub mod metrics;
