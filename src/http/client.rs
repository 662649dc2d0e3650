//! Resilient API client.
//!
//! # Responsibilities
//! - Resolve endpoint keys and parameters into URLs
//! - Attach JSON content type, bearer credential and request ID
//! - Race every attempt against the configured timeout
//! - Retry transient failures with a fixed delay
//! - Clear the credential and stop on 401
//! - Decode JSON responses into raw or typed values

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::{bearer_token, SessionContext};
use crate::config::{ClientConfig, RetryConfig};
use crate::endpoints::{EndpointTable, PathParams, ResolveError};
use crate::http::error::{error_message, ApiError, ApiResult};
use crate::http::request::{build_url, new_request_id, HttpMethod, X_REQUEST_ID};
use crate::observability::metrics;
use crate::resilience::{retry_async, with_timeout, RetryPolicy};

/// HTTP client for the review backend.
///
/// Cheap to clone; clones share the connection pool and session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    endpoints: Arc<EndpointTable>,
    timeout: Duration,
    retries: RetryConfig,
    metrics_enabled: bool,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client from a configuration and a session context.
    ///
    /// Only shape checks happen here: the base URL must parse, the request
    /// timeout must be non-zero and every endpoint template must be
    /// well-formed.
    pub fn new(config: &ClientConfig, session: SessionContext) -> ApiResult<Self> {
        Url::parse(&config.api.base_url)?;
        if config.timeouts.request_ms == 0 {
            return Err(ApiError::InvalidConfig(
                "timeouts.request_ms must be greater than zero".to_string(),
            ));
        }

        let endpoints = EndpointTable::compile(&config.endpoint_table()).map_err(|(key, e)| {
            ApiError::InvalidUrl(format!("endpoint '{}': {}", key, e))
        })?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        tracing::debug!(
            base_url = %config.api.base_url,
            endpoints = endpoints.len(),
            timeout_ms = config.timeouts.request_ms,
            max_retries = config.retries.max_retries,
            "API client configured"
        );

        Ok(Self {
            http,
            base_url: Arc::from(config.api.base_url.trim_end_matches('/')),
            endpoints: Arc::new(endpoints),
            timeout: config.timeouts.request(),
            retries: config.retries.clone(),
            metrics_enabled: config.observability.metrics_enabled,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the URL a call would use, without sending anything.
    pub fn resolve_url(&self, endpoint: &str, method: HttpMethod, params: &PathParams) -> ApiResult<Url> {
        let template = self
            .endpoints
            .get(endpoint)
            .ok_or_else(|| ApiError::UnknownEndpoint(endpoint.to_string()))?;

        let resolved = template.resolve(params).map_err(|e| match e {
            ResolveError::Missing(name) => ApiError::MissingParameter {
                endpoint: endpoint.to_string(),
                name,
            },
            ResolveError::InvalidValue { name, value } => ApiError::InvalidParameter {
                endpoint: endpoint.to_string(),
                name,
                value,
            },
        })?;

        build_url(&self.base_url, &resolved, method)
    }

    /// Call an endpoint and return the decoded JSON body.
    pub async fn request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&Value>,
        params: &PathParams,
    ) -> ApiResult<Value> {
        let start_time = Instant::now();
        let result = self.execute(endpoint, method, body, params).await;

        if self.metrics_enabled {
            let outcome = match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            metrics::record_request(endpoint, outcome, start_time);
        }

        if let Err(e) = &result {
            tracing::error!(endpoint, method = %method, error = %e, "API request failed");
        }
        result
    }

    /// Call an endpoint, serializing `body` and decoding the response into `T`.
    pub async fn request_json<B, T>(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&B>,
        params: &PathParams,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Decode(format!("request body: {}", e)))?;

        let value = self.request(endpoint, method, body.as_ref(), params).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn execute(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&Value>,
        params: &PathParams,
    ) -> ApiResult<Value> {
        let body = if method.has_body() {
            Some(body.ok_or_else(|| ApiError::MissingBody {
                method: method.to_string(),
            })?)
        } else {
            None
        };

        let url = self.resolve_url(endpoint, method, params)?;
        let url = &url;
        let request_id = new_request_id();
        let request_id = request_id.as_str();

        tracing::debug!(request_id, endpoint, method = %method, url = %url, "Sending request");

        let timeout = self.timeout;
        let mut policy = RetryPolicy::from_config(&self.retries);
        let metrics_enabled = self.metrics_enabled;
        let policy_delay_ms = self.retries.delay_ms;

        retry_async(
            &mut policy,
            move || with_timeout(timeout, self.send_once(url, method, body, request_id)),
            |attempt, error| {
                tracing::warn!(
                    request_id,
                    endpoint,
                    attempt,
                    error = %error,
                    delay_ms = policy_delay_ms,
                    "Attempt failed, retrying"
                );
                if metrics_enabled {
                    metrics::record_retry(endpoint);
                }
            },
        )
        .await
    }

    /// One network attempt: send, check status, read and decode the body.
    async fn send_once(
        &self,
        url: &Url,
        method: HttpMethod,
        body: Option<&Value>,
        request_id: &str,
    ) -> ApiResult<Value> {
        let mut req = self
            .http
            .request(method.into(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(X_REQUEST_ID, request_id);

        if let Some(token) = self.session.token() {
            req = req.header(AUTHORIZATION, bearer_token(&token));
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.reject_credential(request_id);
            return Err(ApiError::AuthenticationFailed);
        }

        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &bytes),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn reject_credential(&self, request_id: &str) {
        tracing::warn!(request_id, "Credential rejected, clearing session token");
        if self.metrics_enabled {
            metrics::record_auth_failure();
        }
        if let Err(e) = self.session.clear_token() {
            tracing::error!(request_id, error = %e, "Failed to clear rejected credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn client() -> ApiClient {
        let config = ClientConfig::new("http://localhost:8000/api", BTreeMap::new(), 1000, 0);
        ApiClient::new(&config, SessionContext::in_memory()).unwrap()
    }

    #[test]
    fn test_resolve_detail_url() {
        let url = client()
            .resolve_url(
                "comments.detail",
                HttpMethod::Put,
                &PathParams::new().with("id", "42"),
            )
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/comments/42");
    }

    #[test]
    fn test_unknown_endpoint() {
        let err = client()
            .resolve_url("comments.archive", HttpMethod::Get, &PathParams::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownEndpoint(key) if key == "comments.archive"));
    }

    #[test]
    fn test_missing_placeholder_value() {
        let err = client()
            .resolve_url("comments.delete", HttpMethod::Delete, &PathParams::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter { name, .. } if name == "id"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = ClientConfig::new("not a url", BTreeMap::new(), 1000, 0);
        assert!(matches!(
            ApiClient::new(&config, SessionContext::in_memory()),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parameter_cannot_escape_its_segment() {
        let client = client();
        for value in ["a#b", "a?x=1", "../../system/users"] {
            let url = client
                .resolve_url(
                    "comments.delete",
                    HttpMethod::Delete,
                    &PathParams::new().with("id", value),
                )
                .unwrap();
            assert!(url.path().starts_with("/api/comments/"), "{value}: {url}");
            assert_eq!(url.path_segments().unwrap().count(), 3, "{value}: {url}");
            assert_eq!(url.query(), None);
            assert_eq!(url.fragment(), None);
        }
    }

    #[test]
    fn test_dot_segment_parameter_rejected() {
        let err = client()
            .resolve_url(
                "comments.delete",
                HttpMethod::Delete,
                &PathParams::new().with("id", ".."),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter { name, .. } if name == "id"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClientConfig::new("http://localhost:8000/api", BTreeMap::new(), 0, 0);
        assert!(matches!(
            ApiClient::new(&config, SessionContext::in_memory()),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_post_without_body_fails_before_network() {
        let err = client()
            .request("comments.create", HttpMethod::Post, None, &PathParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingBody { .. }));
    }
}
