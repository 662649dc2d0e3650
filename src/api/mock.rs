//! Simulated backend responses.
//!
//! Used when `mock.enabled` is set. Payloads have the same shape as the
//! real backend's; scores are random.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::api::types::{
    BehaviorPattern, ClusterReport, Comment, CommentPage, CommentQuery, DetectionResult,
    HealthStatus, NewComment, RiskLevel, UserBehaviorReport,
};
use crate::http::request::unix_millis;

pub const LIST_LATENCY: Duration = Duration::from_millis(500);
pub const DETECT_LATENCY: Duration = Duration::from_millis(800);
pub const CLUSTER_LATENCY: Duration = Duration::from_millis(1000);
pub const ANALYZE_LATENCY: Duration = Duration::from_millis(800);

pub const MOCK_VERSION: &str = "1.0.0";

pub fn health() -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        timestamp: Some(Utc::now().to_rfc3339()),
        version: Some(MOCK_VERSION.to_string()),
        service: None,
    }
}

/// Always the empty first page, whatever the query asks for.
pub fn comment_page(_query: &CommentQuery) -> CommentPage {
    CommentPage {
        items: Vec::new(),
        total: 0,
        page: 1,
        page_size: 10,
    }
}

pub fn created_comment(new: &NewComment) -> Comment {
    Comment {
        id: unix_millis() as u64,
        fields: new.clone(),
    }
}

pub fn detection<R: Rng>(rng: &mut R) -> DetectionResult {
    let risk_level = if rng.gen::<f64>() > 0.7 {
        RiskLevel::High
    } else if rng.gen::<f64>() > 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    DetectionResult {
        probability: rng.gen(),
        risk_level,
        factors: vec![
            "high content duplication".to_string(),
            "abnormal rating pattern".to_string(),
            "clustered posting times".to_string(),
        ],
    }
}

pub fn cluster_risk(user_count: usize) -> RiskLevel {
    if user_count > 5 {
        RiskLevel::High
    } else if user_count > 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn cluster(user_ids: &[String]) -> ClusterReport {
    ClusterReport {
        cluster_id: format!("cluster_{}", unix_millis()),
        user_count: user_ids.len(),
        risk_level: cluster_risk(user_ids.len()),
        suspicious_indicators: vec![
            "shared IP address".to_string(),
            "similar review content".to_string(),
            "posted in the same time window".to_string(),
        ],
        creation_time: Utc::now().to_rfc3339(),
    }
}

pub fn user_behavior<R: Rng>(rng: &mut R) -> UserBehaviorReport {
    UserBehaviorReport {
        risk_score: rng.gen(),
        suspicious_factors: vec![
            "burst of reviews in a short period".to_string(),
            "very high content similarity".to_string(),
            "linked to known spam IPs".to_string(),
        ],
        behavior_pattern: Some(BehaviorPattern {
            comment_frequency: "high".to_string(),
            content_similarity: 0.85,
            time_pattern: "clustered".to_string(),
        }),
        recommendations: vec![
            "flag as suspicious".to_string(),
            "keep monitoring".to_string(),
        ],
    }
}
