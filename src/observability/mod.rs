//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Finalizer produces:
//!     → logging.rs (structured diagnostics: header/body sizes, parse failures)
//!     → metrics.rs (decision and finalization counters)
//! ```
//!
//! # Design Decisions
//! - Diagnostics never change what is written to a span
//! - Metrics are no-ops until the embedding process installs a recorder

pub mod logging;
pub mod metrics;
