use serde::{Deserialize, Serialize};

use crate::models::domain::{MatchOutcome, ReliefRequest};

/// Response for a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub request: ReliefRequest,
    pub message: String,
}

/// Response for an approval or rejection decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub request: ReliefRequest,
    /// Tagged match outcome; present only on the approval path
    pub auto_match: Option<MatchOutcome>,
    pub message: String,
}

/// Response for an administrator-triggered re-match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RematchResponse {
    pub request: ReliefRequest,
    pub auto_match: MatchOutcome,
    pub message: String,
}

/// Response for the batch priority sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUpdateResponse {
    pub updated: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
