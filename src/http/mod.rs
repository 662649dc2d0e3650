//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! request(endpoint, method, body, params)
//!     → request.rs (URL, cache-bust, request ID)
//!     → client.rs (headers, credential, retry + timeout loop)
//!     → backend
//!     → client.rs (status handling, JSON decode)
//!     → Result<Value, ApiError> (error.rs)
//! ```

pub mod client;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use request::{HttpMethod, CACHE_BUST_PARAM, X_REQUEST_ID};
