//! Dashboard-facing review API.
//!
//! `service.rs` exposes one typed method per backend operation; `mock.rs`
//! supplies payloads when simulated-response mode is on; `types.rs` holds
//! the wire shapes.

pub mod mock;
pub mod service;
pub mod types;

pub use service::{ReviewApi, BACKEND_UNAVAILABLE};
pub use types::{
    ApiEnvelope, BehaviorPattern, ClusterReport, Comment, CommentPage, CommentQuery,
    DetectionRequest, DetectionResult, HealthStatus, NewComment, RiskLevel, UserBehaviorReport,
};
