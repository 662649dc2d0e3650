//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoints::Endpoint;

/// Root configuration for the API client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend address settings.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Simulated-response mode.
    pub mock: MockConfig,

    /// Credential storage settings.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Endpoint overrides and additions, keyed by logical name.
    /// Entries here replace the built-in template with the same key.
    pub endpoints: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Build a configuration from the four connection parameters.
    ///
    /// `endpoints` is layered over the built-in table, so passing an empty
    /// map keeps every default endpoint.
    pub fn new(
        base_url: impl Into<String>,
        endpoints: BTreeMap<String, String>,
        timeout_ms: u64,
        max_retries: u32,
    ) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            timeouts: TimeoutConfig {
                request_ms: timeout_ms,
            },
            retries: RetryConfig {
                max_retries,
                ..RetryConfig::default()
            },
            endpoints,
            ..Self::default()
        }
    }

    /// The effective endpoint table: built-in templates overlaid with
    /// configured entries.
    pub fn endpoint_table(&self) -> BTreeMap<String, String> {
        let mut table: BTreeMap<String, String> = Endpoint::ALL
            .iter()
            .map(|e| (e.key().to_string(), e.default_template().to_string()))
            .collect();
        for (key, template) in &self.endpoints {
            table.insert(key.clone(), template.clone());
        }
        table
    }
}

/// Backend address configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address every endpoint template is appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Budget for one attempt (send + body read) in milliseconds.
    pub request_ms: u64,
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_ms: 30_000 }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional attempts after the first one fails.
    pub max_retries: u32,

    /// Fixed pause between attempts in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_ms: 1000,
        }
    }
}

/// Simulated-response configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MockConfig {
    /// Serve simulated payloads instead of calling the backend.
    pub enabled: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Credential storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// File backing the durable ("remember me") store.
    pub credentials_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(".review-client/credentials.json"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record request metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
