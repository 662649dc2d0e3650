//! Typed operations over the review backend.
//!
//! # Responsibilities
//! - One method per dashboard operation, with typed request and result
//! - Serve simulated payloads when mock mode is on
//! - Keep the health check infallible for status displays

use serde_json::Value;

use crate::api::mock;
use crate::api::types::{
    ApiEnvelope, ClusterReport, ClusterRequest, Comment, CommentPage, CommentQuery,
    DetectionRequest, DetectionResult, HealthStatus, NewComment, UserBehaviorReport,
};
use crate::auth::SessionContext;
use crate::config::ClientConfig;
use crate::endpoints::{Endpoint, PathParams};
use crate::http::{ApiClient, ApiResult, HttpMethod};

/// Message reported when the health endpoint cannot be reached.
pub const BACKEND_UNAVAILABLE: &str = "backend service unavailable";

/// Dashboard-facing API.
#[derive(Debug, Clone)]
pub struct ReviewApi {
    client: ApiClient,
    use_mock_data: bool,
}

impl ReviewApi {
    pub fn new(client: ApiClient, use_mock_data: bool) -> Self {
        Self {
            client,
            use_mock_data,
        }
    }

    /// Build the client and API from one configuration.
    pub fn from_config(config: &ClientConfig, session: SessionContext) -> ApiResult<Self> {
        let client = ApiClient::new(config, session)?;
        Ok(Self::new(client, config.mock.enabled))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn is_mock(&self) -> bool {
        self.use_mock_data
    }

    /// Backend health. Failures are folded into an unsuccessful envelope.
    pub async fn check_health(&self) -> ApiEnvelope<HealthStatus> {
        if self.use_mock_data {
            return ApiEnvelope::ok(mock::health());
        }

        match self
            .call::<ApiEnvelope<HealthStatus>>(Endpoint::Health, HttpMethod::Get, None, &PathParams::new())
            .await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed");
                ApiEnvelope::failed(BACKEND_UNAVAILABLE)
            }
        }
    }

    pub async fn list_comments(&self, query: &CommentQuery) -> ApiResult<ApiEnvelope<CommentPage>> {
        if self.use_mock_data {
            tokio::time::sleep(mock::LIST_LATENCY).await;
            return Ok(ApiEnvelope::ok(mock::comment_page(query)));
        }

        let mut params = PathParams::new();
        if let Some(page) = query.page {
            params.insert("page", page.to_string());
        }
        if let Some(size) = query.page_size {
            params.insert("pageSize", size.to_string());
        }
        if let Some(keyword) = &query.keyword {
            params.insert("keyword", keyword.clone());
        }
        if let Some(platform) = &query.platform {
            params.insert("platform", platform.clone());
        }

        self.call(Endpoint::CommentsList, HttpMethod::Get, None, &params)
            .await
    }

    pub async fn create_comment(&self, comment: &NewComment) -> ApiResult<ApiEnvelope<Comment>> {
        if self.use_mock_data {
            return Ok(ApiEnvelope::ok(mock::created_comment(comment)));
        }

        let body = to_body(comment)?;
        self.call(Endpoint::CommentsCreate, HttpMethod::Post, Some(&body), &PathParams::new())
            .await
    }

    /// Score one text for machine-generated content.
    pub async fn detect_aigc(&self, request: &DetectionRequest) -> ApiResult<ApiEnvelope<DetectionResult>> {
        if self.use_mock_data {
            tokio::time::sleep(mock::DETECT_LATENCY).await;
            return Ok(ApiEnvelope::ok(mock::detection(&mut rand::thread_rng())));
        }

        let body = to_body(request)?;
        self.call(Endpoint::DetectionSingle, HttpMethod::Post, Some(&body), &PathParams::new())
            .await
    }

    /// Check whether a group of accounts behaves as a coordinated cluster.
    pub async fn detect_cluster(&self, user_ids: &[String]) -> ApiResult<ApiEnvelope<ClusterReport>> {
        if self.use_mock_data {
            tokio::time::sleep(mock::CLUSTER_LATENCY).await;
            return Ok(ApiEnvelope::ok(mock::cluster(user_ids)));
        }

        let body = to_body(&ClusterRequest {
            user_ids: user_ids.to_vec(),
        })?;
        self.call(Endpoint::DetectionCluster, HttpMethod::Post, Some(&body), &PathParams::new())
            .await
    }

    pub async fn analyze_user_behavior(&self, user_id: &str) -> ApiResult<ApiEnvelope<UserBehaviorReport>> {
        if self.use_mock_data {
            tokio::time::sleep(mock::ANALYZE_LATENCY).await;
            return Ok(ApiEnvelope::ok(mock::user_behavior(&mut rand::thread_rng())));
        }

        let params = PathParams::new().with("userId", user_id);
        self.call(Endpoint::AnalysisUser, HttpMethod::Get, None, &params)
            .await
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        method: HttpMethod,
        body: Option<&Value>,
        params: &PathParams,
    ) -> ApiResult<T> {
        self.client
            .request_json(endpoint.key(), method, body, params)
            .await
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| crate::http::ApiError::Decode(format!("request body: {}", e)))
}
