//! Endpoint subsystem.
//!
//! # Data Flow
//! ```text
//! Client construction:
//!     ClientConfig::endpoint_table() (defaults + overrides)
//!     → table.rs (compile every template)
//!     → EndpointTable (immutable)
//!
//! Per request:
//!     endpoint key + PathParams
//!     → table.rs (lookup, explicit miss)
//!     → template.rs (substitute placeholders, collect leftover params)
//!     → ResolvedPath { path, query }
//! ```
//!
//! # Design Decisions
//! - Templates compiled once, never re-parsed per request
//! - Unknown keys are an error, never a malformed URL
//! - Parameters without a placeholder become query entries
//! - Placeholder values are encoded, never parsed as URL syntax

pub mod table;
pub mod template;

pub use table::{Endpoint, EndpointTable};
pub use template::{EndpointTemplate, PathParams, ResolveError, ResolvedPath, TemplateError};
