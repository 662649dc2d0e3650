//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! One logical API call:
//!     → retries.rs (attempt loop, fixed delay, retry budget)
//!         → timeouts.rs (race each attempt against the budget)
//!             → network stage
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - A 401 ends the call immediately; the credential must be replaced
//! - Composable: both pieces wrap plain futures

pub mod retries;
pub mod timeouts;

pub use retries::{retry_async, RetryPolicy};
pub use timeouts::with_timeout;
