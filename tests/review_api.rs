//! Typed review operations in live mode against a mock backend.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use review_client::api::{
    CommentQuery, DetectionRequest, NewComment, ReviewApi, RiskLevel, BACKEND_UNAVAILABLE,
};
use review_client::auth::SessionContext;

mod common;
use common::CapturedRequest;

async fn live_api<F>(respond: F) -> (ReviewApi, Arc<Mutex<Vec<CapturedRequest>>>)
where
    F: Fn(&CapturedRequest) -> (u16, Value) + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let addr = common::start_programmable_backend(move |req: CapturedRequest| {
        let (status, body) = respond(&req);
        sink.lock().unwrap().push(req);
        std::future::ready((status, body.to_string()))
    })
    .await;

    let config = common::config_for(addr, 2000, 0);
    let api = ReviewApi::from_config(&config, SessionContext::in_memory()).unwrap();
    assert!(!api.is_mock());
    (api, seen)
}

#[tokio::test]
async fn test_health_live() {
    let (api, seen) = live_api(|_| {
        (
            200,
            json!({"success": true, "data": {"status": "healthy", "version": "2.3.1"}}),
        )
    })
    .await;

    let envelope = api.check_health().await;
    assert!(envelope.success);
    let health = envelope.into_data().unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("2.3.1"));
    assert_eq!(seen.lock().unwrap()[0].path(), "/api/health");
}

#[tokio::test]
async fn test_health_unreachable_reports_unavailable() {
    let addr = common::closed_port().await;
    let config = common::config_for(addr, 500, 0);
    let api = ReviewApi::from_config(&config, SessionContext::in_memory()).unwrap();

    let envelope = api.check_health().await;
    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.error.as_deref(), Some(BACKEND_UNAVAILABLE));
}

#[tokio::test]
async fn test_list_comments_sends_query() {
    let (api, seen) = live_api(|_| {
        (
            200,
            json!({
                "success": true,
                "data": {
                    "items": [{"id": 7, "content": "love it", "platform": "shop"}],
                    "total": 1,
                    "page": 2,
                    "pageSize": 20
                }
            }),
        )
    })
    .await;

    let query = CommentQuery {
        page: Some(2),
        page_size: Some(20),
        keyword: Some("refund".to_string()),
        platform: None,
    };
    let page = api.list_comments(&query).await.unwrap().into_data().unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, 7);
    assert_eq!(page.items[0].fields.platform.as_deref(), Some("shop"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].path(), "/api/comments");
    assert_eq!(seen[0].query_value("page").as_deref(), Some("2"));
    assert_eq!(seen[0].query_value("pageSize").as_deref(), Some("20"));
    assert_eq!(seen[0].query_value("keyword").as_deref(), Some("refund"));
    assert!(seen[0].query_value("platform").is_none());
}

#[tokio::test]
async fn test_create_comment_posts_body() {
    let (api, seen) = live_api(|req| {
        let mut created: Value = serde_json::from_str(&req.body).unwrap();
        created["id"] = json!(101);
        (201, json!({"success": true, "data": created}))
    })
    .await;

    let new = NewComment {
        content: "arrived broken".to_string(),
        platform: Some("shop".to_string()),
        user_id: Some("u-9".to_string()),
        rating: Some(1.0),
    };
    let created = api.create_comment(&new).await.unwrap().into_data().unwrap();

    assert_eq!(created.id, 101);
    assert_eq!(created.fields, new);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, "POST");
    let sent: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(sent["userId"], "u-9");
}

#[tokio::test]
async fn test_detect_aigc_live() {
    let (api, seen) = live_api(|_| {
        (
            200,
            json!({
                "success": true,
                "data": {"probability": 0.91, "risk_level": "high", "factors": ["template phrasing"]}
            }),
        )
    })
    .await;

    let request = DetectionRequest {
        content: "Best product ever!!!".to_string(),
        platform: None,
    };
    let result = api.detect_aigc(&request).await.unwrap().into_data().unwrap();

    assert_eq!(result.risk_level, RiskLevel::High);
    assert!((result.probability - 0.91).abs() < f64::EPSILON);
    assert_eq!(seen.lock().unwrap()[0].path(), "/api/detect/single");
}

#[tokio::test]
async fn test_detect_cluster_sends_user_ids() {
    let (api, seen) = live_api(|_| {
        (
            200,
            json!({
                "success": true,
                "data": {
                    "cluster_id": "c-1",
                    "user_count": 3,
                    "risk_level": "medium",
                    "creation_time": "2024-05-01T00:00:00Z"
                }
            }),
        )
    })
    .await;

    let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let report = api.detect_cluster(&ids).await.unwrap().into_data().unwrap();
    assert_eq!(report.risk_level, RiskLevel::Medium);
    assert!(report.suspicious_indicators.is_empty());

    let sent: Value = serde_json::from_str(&seen.lock().unwrap()[0].body).unwrap();
    assert_eq!(sent, json!({"user_ids": ["a", "b", "c"]}));
}

#[tokio::test]
async fn test_analyze_user_behavior_live() {
    let (api, seen) = live_api(|_| {
        (
            200,
            json!({
                "success": true,
                "data": {"risk_score": 0.8, "suspicious_factors": [], "recommendations": []}
            }),
        )
    })
    .await;

    let report = api
        .analyze_user_behavior("user-42")
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(report.risk_level(), RiskLevel::High);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].path(), "/api/analysis/user");
    assert_eq!(seen[0].query_value("userId").as_deref(), Some("user-42"));
}

#[tokio::test]
async fn test_backend_failure_envelope_passes_through() {
    let (api, _) = live_api(|_| (200, json!({"success": false, "error": "quota exceeded"}))).await;

    let envelope = api
        .detect_aigc(&DetectionRequest::default())
        .await
        .unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("quota exceeded"));
    assert!(envelope.into_data().is_none());
}
