//! Request preparation.
//!
//! # Responsibilities
//! - Name the supported HTTP methods
//! - Join base address, resolved path and query entries into a URL
//! - Stamp GET requests with a cache-busting `_t` parameter
//! - Generate the request ID shared by every attempt of one call

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;
use uuid::Uuid;

use crate::endpoints::ResolvedPath;
use crate::http::error::{ApiError, ApiResult};

/// Header carrying the per-call request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query parameter used to defeat intermediary caches on GET.
pub const CACHE_BUST_PARAM: &str = "_t";

/// HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Methods that carry a JSON body.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(format!("unsupported method '{}'", other)),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Build the final URL for one call.
///
/// `base_url` is joined by plain concatenation so a base path like
/// `http://host/api` keeps its `/api` prefix.
pub fn build_url(base_url: &str, resolved: &ResolvedPath, method: HttpMethod) -> ApiResult<Url> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), resolved.path);
    let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))?;

    let cache_bust = method == HttpMethod::Get;
    if !resolved.query.is_empty() || cache_bust {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &resolved.query {
            pairs.append_pair(name, value);
        }
        if cache_bust {
            pairs.append_pair(CACHE_BUST_PARAM, &unix_millis().to_string());
        }
    }

    Ok(url)
}

pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}
