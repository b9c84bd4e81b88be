use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::core::scoring::UrgencyTier;
use crate::models::{
    ApproveRequestBody, BatchUpdateResponse, DecisionResponse, ErrorResponse, HealthResponse,
    MatchOutcome, NewRequest, RematchResponse, SubmitRequestBody, SubmitResponse,
};
use crate::services::{PostgresStore, WorkflowError, WorkflowService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostgresStore>,
    pub workflow: WorkflowService,
}

/// Configure all request-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/requests", web::post().to(submit_request))
        .route("/requests/batch-priorities", web::post().to(batch_priorities))
        .route("/requests/{id}/approve", web::put().to(decide_request))
        .route("/requests/{id}/match", web::post().to(rematch_request));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Submit a new relief request
///
/// POST /api/v1/requests
async fn submit_request(
    state: web::Data<AppState>,
    body: web::Json<SubmitRequestBody>,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for submit request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let body = body.into_inner();
    let urgency = body
        .urgency
        .as_deref()
        .map(UrgencyTier::from_label)
        .unwrap_or(UrgencyTier::Medium);

    let new = NewRequest {
        request_type: body.request_type,
        description: body.description,
        people_affected: body.people_affected,
        urgency,
        latitude: body.latitude,
        longitude: body.longitude,
        requester_id: body.requester_id,
        contact_name: body.contact_name,
        contact_phone: body.contact_phone,
    };

    match state.workflow.submit(new, Utc::now()).await {
        Ok(request) => HttpResponse::Created().json(SubmitResponse {
            request,
            message: "Request submitted and awaiting approval".to_string(),
        }),
        Err(e) => workflow_error_response(e),
    }
}

/// Approve or reject a pending request
///
/// PUT /api/v1/requests/{id}/approve
///
/// Request body:
/// ```json
/// {
///   "approved": true,
///   "approverId": 42,
///   "reason": "optional, required when rejecting"
/// }
/// ```
async fn decide_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ApproveRequestBody>,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let id = path.into_inner();
    let now = Utc::now();

    if body.approved {
        match state.workflow.approve(id, body.approver_id, now).await {
            Ok(outcome) => {
                let message = match &outcome.auto_match {
                    Some(MatchOutcome::Matched { .. }) => {
                        "Request approved and matched to a resource"
                    }
                    _ => "Request approved but no suitable resource was found",
                };
                HttpResponse::Ok().json(DecisionResponse {
                    request: outcome.request,
                    auto_match: outcome.auto_match,
                    message: message.to_string(),
                })
            }
            Err(e) => workflow_error_response(e),
        }
    } else {
        let reason = body.reason.clone().unwrap_or_default();
        match state.workflow.reject(id, body.approver_id, &reason, now).await {
            Ok(outcome) => HttpResponse::Ok().json(DecisionResponse {
                request: outcome.request,
                auto_match: None,
                message: "Request rejected".to_string(),
            }),
            Err(e) => workflow_error_response(e),
        }
    }
}

/// Re-run matching for an approved request
///
/// POST /api/v1/requests/{id}/match
async fn rematch_request(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();

    match state.workflow.rematch(id, Utc::now()).await {
        Ok(outcome) => {
            let auto_match = outcome.auto_match.unwrap_or(MatchOutcome::NoMatch);
            let message = if auto_match.is_matched() {
                "Request matched to a resource"
            } else {
                "No suitable resource was found"
            };
            HttpResponse::Ok().json(RematchResponse {
                request: outcome.request,
                auto_match,
                message: message.to_string(),
            })
        }
        Err(e) => workflow_error_response(e),
    }
}

/// Recompute priority scores for all requests awaiting resolution
///
/// POST /api/v1/requests/batch-priorities
async fn batch_priorities(state: web::Data<AppState>) -> impl Responder {
    match state.workflow.recompute_all(Utc::now()).await {
        Ok(updated) => HttpResponse::Ok().json(BatchUpdateResponse { updated }),
        Err(e) => workflow_error_response(e),
    }
}

fn workflow_error_response(error: WorkflowError) -> HttpResponse {
    match &error {
        WorkflowError::InvalidInput(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid input".to_string(),
            message: message.clone(),
            status_code: 400,
        }),
        WorkflowError::NotFound(what) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: what.clone(),
            status_code: 404,
        }),
        WorkflowError::InvalidState(message) => HttpResponse::Conflict().json(ErrorResponse {
            error: "Invalid state".to_string(),
            message: message.clone(),
            status_code: 409,
        }),
        WorkflowError::Store(e) => {
            tracing::error!("Store failure in workflow operation: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Store failure".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_workflow_error_mapping() {
        let response =
            workflow_error_response(WorkflowError::NotFound("request 9".to_string()));
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);

        let response =
            workflow_error_response(WorkflowError::InvalidState("already approved".to_string()));
        assert_eq!(response.status(), actix_web::http::StatusCode::CONFLICT);
    }
}
