use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::core::distance::GeoBounds;
use crate::core::matcher::Matcher;
use crate::core::scoring::priority_score;
use crate::models::{
    ApprovalStatus, MatchOutcome, MatchingStatus, NewRequest, ReliefRequest,
};
use crate::services::notifier::{Notifier, NotifyEvent, Recipient};
use crate::services::store::{PostgresStore, StoreError};

/// Errors surfaced by workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of an approval or re-match operation
#[derive(Debug)]
pub struct DecisionOutcome {
    pub request: ReliefRequest,
    /// Present on the approval/re-match path, absent on rejection
    pub auto_match: Option<MatchOutcome>,
}

/// Approval workflow: the state machine gating request lifecycle transitions
///
/// States: `pending_approval` -> {`approved`, `rejected`}; an approved
/// request additionally carries `unmatched` -> {`matched`, `no_match`}.
/// All scoring and matching is pure computation over store snapshots; the
/// caller supplies `now` so elapsed-time scoring stays deterministic and
/// testable.
#[derive(Clone)]
pub struct WorkflowService {
    store: Arc<PostgresStore>,
    notifier: Arc<Notifier>,
    matcher: Matcher,
    service_area: GeoBounds,
}

impl WorkflowService {
    pub fn new(
        store: Arc<PostgresStore>,
        notifier: Arc<Notifier>,
        matcher: Matcher,
        service_area: GeoBounds,
    ) -> Self {
        Self {
            store,
            notifier,
            matcher,
            service_area,
        }
    }

    /// Submit a new request
    ///
    /// Creates the request as `pending_approval`, assigns its initial
    /// priority score, and notifies administrators.
    pub async fn submit(
        &self,
        new: NewRequest,
        now: DateTime<Utc>,
    ) -> Result<ReliefRequest, WorkflowError> {
        if new.people_affected <= 0 {
            return Err(WorkflowError::InvalidInput(
                "people affected must be positive".to_string(),
            ));
        }
        if !self.service_area.contains(new.latitude, new.longitude) {
            return Err(WorkflowError::InvalidInput(
                "coordinates are outside the serviceable territory".to_string(),
            ));
        }
        if new.requester_id.is_none() {
            let has_contact = new
                .contact_name
                .as_deref()
                .is_some_and(|n| !n.trim().is_empty())
                && new
                    .contact_phone
                    .as_deref()
                    .is_some_and(|p| !p.trim().is_empty());
            if !has_contact {
                return Err(WorkflowError::InvalidInput(
                    "anonymous submissions require contact name and phone".to_string(),
                ));
            }
        }

        let mut request = self.store.insert_request(&new).await?;

        let score = priority_score(&request.priority_factors(self.matcher.synonyms(), now));
        self.store.update_score(request.id, score).await?;
        request.priority_score = score;

        info!(
            "Submitted request {} ({}, {} people, priority {})",
            request.id, request.request_type, request.people_affected, score
        );

        self.notify(
            NotifyEvent::NewRequest,
            Recipient::Administrators,
            json!({
                "requestId": request.id,
                "requestType": request.request_type,
                "peopleAffected": request.people_affected,
                "urgency": request.urgency.as_str(),
                "priorityScore": score,
            }),
        )
        .await;

        Ok(request)
    }

    /// Approve a pending request and attempt to match it
    ///
    /// The approval itself commits first; a failure inside the matching
    /// step is downgraded to a `no_match` outcome, never propagated.
    pub async fn approve(
        &self,
        id: i64,
        approver_id: i64,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome, WorkflowError> {
        let request = self.fetch(id).await?;
        self.require_pending(&request)?;

        self.store
            .update_approval(id, ApprovalStatus::Approved, approver_id, None, now)
            .await?;

        info!("Request {} approved by {}", id, approver_id);

        self.notify(
            NotifyEvent::ApprovalResult,
            Recipient::Requester { request_id: id },
            json!({
                "requestId": id,
                "approved": true,
                "approverId": approver_id,
            }),
        )
        .await;

        let outcome = self.run_matching(&request, now).await;

        let request = self.fetch(id).await?;
        Ok(DecisionOutcome {
            request,
            auto_match: Some(outcome),
        })
    }

    /// Reject a pending request
    ///
    /// A rejection reason is required; no matching is attempted.
    pub async fn reject(
        &self,
        id: i64,
        approver_id: i64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome, WorkflowError> {
        if reason.trim().is_empty() {
            return Err(WorkflowError::InvalidInput(
                "a rejection reason is required".to_string(),
            ));
        }

        let request = self.fetch(id).await?;
        self.require_pending(&request)?;

        self.store
            .update_approval(id, ApprovalStatus::Rejected, approver_id, Some(reason), now)
            .await?;

        info!("Request {} rejected by {}: {}", id, approver_id, reason);

        self.notify(
            NotifyEvent::ApprovalResult,
            Recipient::Requester { request_id: id },
            json!({
                "requestId": id,
                "approved": false,
                "reason": reason,
            }),
        )
        .await;

        let request = self.fetch(id).await?;
        Ok(DecisionOutcome {
            request,
            auto_match: None,
        })
    }

    /// Re-run scoring and matching for an already approved request
    ///
    /// Idempotent administrator entry point. "Nothing available" comes back
    /// as a `NoMatch` outcome, distinguishing it from infrastructure
    /// failure.
    pub async fn rematch(&self, id: i64, now: DateTime<Utc>) -> Result<DecisionOutcome, WorkflowError> {
        let request = self.fetch(id).await?;

        if request.approval_status != ApprovalStatus::Approved {
            return Err(WorkflowError::InvalidState(format!(
                "request {} is {}, only approved requests can be re-matched",
                id,
                request.approval_status.as_str()
            )));
        }

        let outcome = self.run_matching(&request, now).await;

        let request = self.fetch(id).await?;
        Ok(DecisionOutcome {
            request,
            auto_match: Some(outcome),
        })
    }

    /// Recompute priority for every request still awaiting resolution
    ///
    /// Safe to run repeatedly and concurrently with individual approvals:
    /// each score derives only from the request's current attributes and
    /// the supplied `now`. Returns the number of requests updated.
    pub async fn recompute_all(&self, now: DateTime<Utc>) -> Result<u64, WorkflowError> {
        let targets = self.store.list_recompute_targets().await?;
        let total = targets.len();

        let mut updated = 0u64;
        for request in targets {
            let score = priority_score(&request.priority_factors(self.matcher.synonyms(), now));
            match self.store.update_score(request.id, score).await {
                Ok(()) => updated += 1,
                Err(e) => {
                    // Skip and keep sweeping; the next run picks it up
                    warn!("Failed to update score for request {}: {}", request.id, e);
                }
            }
        }

        info!("Batch priority sweep updated {}/{} requests", updated, total);

        Ok(updated)
    }

    /// Score, match, and persist the outcome; collaborator failures are
    /// downgraded to `no_match` so the surrounding transition still
    /// succeeds.
    async fn run_matching(&self, request: &ReliefRequest, now: DateTime<Utc>) -> MatchOutcome {
        match self.try_matching(request, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Matching failed for request {}: {}", request.id, e);
                if let Err(mark) = self
                    .store
                    .update_match(request.id, None, None, MatchingStatus::NoMatch)
                    .await
                {
                    error!("Failed to mark request {} as no_match: {}", request.id, mark);
                }
                MatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_matching(
        &self,
        request: &ReliefRequest,
        now: DateTime<Utc>,
    ) -> Result<MatchOutcome, WorkflowError> {
        // Elapsed time has moved since submission, so re-score first
        let score = priority_score(&request.priority_factors(self.matcher.synonyms(), now));
        self.store.update_score(request.id, score).await?;

        let pool = self.store.fetch_ready_resources().await?;
        let outcome = self.matcher.rank(
            &request.request_type,
            request.latitude,
            request.longitude,
            pool,
        );

        match &outcome {
            MatchOutcome::Matched { candidate, .. } => {
                self.store
                    .update_match(
                        request.id,
                        Some(candidate.resource.id),
                        Some(candidate.distance_km),
                        MatchingStatus::Matched,
                    )
                    .await?;

                info!(
                    "Request {} matched to resource {} ({:.1} km, composite {:.1})",
                    request.id, candidate.resource.id, candidate.distance_km, candidate.composite_score
                );

                self.notify(
                    NotifyEvent::MatchFound,
                    Recipient::Administrators,
                    json!({
                        "requestId": request.id,
                        "resourceId": candidate.resource.id,
                        "resourceName": candidate.resource.name,
                        "distanceKm": candidate.distance_km,
                    }),
                )
                .await;
            }
            MatchOutcome::NoMatch => {
                self.store
                    .update_match(request.id, None, None, MatchingStatus::NoMatch)
                    .await?;

                info!("No admissible resource for request {}", request.id);
            }
            MatchOutcome::Failed { .. } => {}
        }

        Ok(outcome)
    }

    async fn fetch(&self, id: i64) -> Result<ReliefRequest, WorkflowError> {
        match self.store.fetch_request(id).await {
            Ok(request) => Ok(request),
            Err(StoreError::NotFound(what)) => Err(WorkflowError::NotFound(what)),
            Err(e) => Err(e.into()),
        }
    }

    fn require_pending(&self, request: &ReliefRequest) -> Result<(), WorkflowError> {
        if request.approval_status != ApprovalStatus::PendingApproval {
            return Err(WorkflowError::InvalidState(format!(
                "request {} is already {}",
                request.id,
                request.approval_status.as_str()
            )));
        }
        Ok(())
    }

    /// Fire-and-forget notification dispatch; failures are logged, never
    /// propagated as workflow failures.
    async fn notify(&self, event: NotifyEvent, recipient: Recipient, payload: serde_json::Value) {
        if let Err(e) = self.notifier.dispatch(event, recipient, payload).await {
            warn!("Notification dispatch failed for {:?}: {}", event, e);
        }
    }
}
