//! Review-monitoring API client.
//!
//! Data-access layer for a dashboard that reviews and flags suspected
//! fake-review activity. Calls named backend endpoints with bearer
//! credentials, per-attempt timeouts and bounded fixed-delay retries.
//!
//! ```text
//!   caller ─▶ api::ReviewApi ──(mock mode)──▶ api::mock
//!                  │
//!                  ▼
//!            http::ApiClient ─▶ endpoints (template → URL)
//!                  │          ─▶ auth::SessionContext (bearer token)
//!                  ▼
//!            resilience (retry loop ▶ timeout race) ─▶ backend
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod endpoints;
pub mod http;
pub mod observability;
pub mod resilience;

pub use api::ReviewApi;
pub use auth::SessionContext;
pub use config::ClientConfig;
pub use endpoints::{Endpoint, PathParams};
pub use http::{ApiClient, ApiError, ApiResult, HttpMethod};
