use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::keywords::SynonymTable;
use crate::core::scoring::{PriorityFactors, UrgencyTier};

/// Approval lifecycle state of a relief request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::PendingApproval => "pending_approval",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "approved" => ApprovalStatus::Approved,
            "rejected" => ApprovalStatus::Rejected,
            _ => ApprovalStatus::PendingApproval,
        }
    }
}

/// Matching sub-state of an approved request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingStatus {
    Unmatched,
    Matched,
    NoMatch,
}

impl MatchingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingStatus::Unmatched => "unmatched",
            MatchingStatus::Matched => "matched",
            MatchingStatus::NoMatch => "no_match",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "matched" => MatchingStatus::Matched,
            "no_match" => MatchingStatus::NoMatch,
            _ => MatchingStatus::Unmatched,
        }
    }
}

/// A citizen relief request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliefRequest {
    pub id: i64,
    pub request_type: String,
    pub description: Option<String>,
    pub people_affected: i32,
    pub urgency: UrgencyTier,
    pub latitude: f64,
    pub longitude: f64,
    pub approval_status: ApprovalStatus,
    pub matching_status: MatchingStatus,
    pub priority_score: u8,
    pub matched_resource_id: Option<i64>,
    pub nearest_distance_km: Option<f64>,
    pub requester_id: Option<i64>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReliefRequest {
    /// Hours the request has been waiting since submission
    pub fn hours_waiting(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_seconds().max(0) as f64 / 3600.0
    }

    /// Assemble the scorer inputs from the request's current attributes
    ///
    /// Weather severity comes from an external feed and is not persisted on
    /// the request, so recomputation scores calm conditions.
    pub fn priority_factors(&self, synonyms: &SynonymTable, now: DateTime<Utc>) -> PriorityFactors {
        PriorityFactors {
            urgency: self.urgency,
            people_affected: self.people_affected.max(0) as u32,
            category: synonyms.detect(&self.request_type),
            hours_waiting: self.hours_waiting(now),
            nearest_distance_km: self.nearest_distance_km,
            weather: None,
        }
    }
}

/// New request attributes accepted at submission
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub request_type: String,
    pub description: Option<String>,
    pub people_affected: i32,
    pub urgency: UrgencyTier,
    pub latitude: f64,
    pub longitude: f64,
    pub requester_id: Option<i64>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
}

/// A relief resource held at a distribution center
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub minimum_reserve: i32,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Resource {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }

    /// Share of stock above the center's reserve floor, in [0, 1]
    pub fn availability_ratio(&self) -> f64 {
        let denominator = self.quantity + self.minimum_reserve;
        if denominator <= 0 {
            return 0.0;
        }
        f64::from(self.quantity) / f64::from(denominator)
    }
}

/// A scored candidate produced during one matching invocation
///
/// Ephemeral: only the winner's resource id and distance are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub resource: Resource,
    pub composite_score: f64,
    pub distance_km: f64,
    pub similarity: f64,
}

/// Outcome of one matching invocation
///
/// "No resource available" is an expected business outcome, so it is data
/// here rather than an error. `Failed` marks a collaborator failure that was
/// downgraded mid-match; the request still ends up `no_match` and the
/// surrounding approval succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        candidate: MatchCandidate,
        alternatives: Vec<MatchCandidate>,
    },
    NoMatch,
    Failed {
        reason: String,
    },
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    /// The matching status the request should carry after this outcome
    pub fn matching_status(&self) -> MatchingStatus {
        match self {
            MatchOutcome::Matched { .. } => MatchingStatus::Matched,
            MatchOutcome::NoMatch | MatchOutcome::Failed { .. } => MatchingStatus::NoMatch,
        }
    }
}
