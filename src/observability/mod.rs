//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ApiClient / ReviewApi produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → stderr (fmt subscriber)
//!     → whatever recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a call
//! - Metrics are cheap and optional

pub mod logging;
pub mod metrics;
