//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the base address is an absolute http(s) URL
//! - Validate value ranges (timeouts > 0)
//! - Check every endpoint template is a well-formed path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the client

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::endpoints::EndpointTemplate;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("timeouts.request_ms must be greater than zero")]
    ZeroTimeout,

    #[error("endpoint '{key}': {reason}")]
    InvalidEndpoint { key: String, reason: String },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.api.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.api.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.api.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (key, template) in &config.endpoints {
        if let Err(e) = EndpointTemplate::parse(template) {
            errors.push(ValidationError::InvalidEndpoint {
                key: key.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
