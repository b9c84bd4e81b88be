use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::scoring::UrgencyTier;
use crate::models::{ApprovalStatus, MatchingStatus, NewRequest, ReliefRequest, Resource};

/// Errors that can occur when interacting with the persistence store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// PostgreSQL-backed store for relief requests and the resource pool
///
/// The store is the only shared mutable state in the service: all scoring
/// and matching runs over in-memory snapshots read from here, and updates
/// to a single request row are atomic. Nothing here reserves or decrements
/// resource quantities; that belongs to the delivery subsystem.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Fetch a single request by id
    pub async fn fetch_request(&self, id: i64) -> Result<ReliefRequest, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, request_type, description, people_affected, urgency,
                   latitude, longitude, approval_status, matching_status,
                   priority_score, matched_resource_id, nearest_distance_km,
                   requester_id, contact_name, contact_phone,
                   approved_by, approved_at, rejection_reason, created_at
            FROM relief_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(map_request(&row)),
            None => Err(StoreError::NotFound(format!("request {}", id))),
        }
    }

    /// Fetch every resource eligible for matching
    ///
    /// Eligibility lives in the query: status ready with stock on hand.
    pub async fn fetch_ready_resources(&self) -> Result<Vec<Resource>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, quantity, minimum_reserve, status,
                   latitude, longitude
            FROM resources
            WHERE status = 'ready' AND quantity > 0
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_resource).collect())
    }

    /// Insert a freshly submitted request in its initial state
    pub async fn insert_request(&self, new: &NewRequest) -> Result<ReliefRequest, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO relief_requests
                (request_type, description, people_affected, urgency,
                 latitude, longitude, approval_status, matching_status,
                 priority_score, requester_id, contact_name, contact_phone)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending_approval', 'unmatched', 0, $7, $8, $9)
            RETURNING id, request_type, description, people_affected, urgency,
                      latitude, longitude, approval_status, matching_status,
                      priority_score, matched_resource_id, nearest_distance_km,
                      requester_id, contact_name, contact_phone,
                      approved_by, approved_at, rejection_reason, created_at
            "#,
        )
        .bind(&new.request_type)
        .bind(&new.description)
        .bind(new.people_affected)
        .bind(new.urgency.as_str())
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(new.requester_id)
        .bind(&new.contact_name)
        .bind(&new.contact_phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_request(&row))
    }

    /// Persist a recomputed priority score
    pub async fn update_score(&self, id: i64, score: u8) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE relief_requests SET priority_score = $1 WHERE id = $2")
            .bind(i16::from(score))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("request {}", id)));
        }

        tracing::debug!("Updated priority score for request {}: {}", id, score);

        Ok(())
    }

    /// Record an approval decision
    pub async fn update_approval(
        &self,
        id: i64,
        status: ApprovalStatus,
        approver_id: i64,
        reason: Option<&str>,
        decided_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE relief_requests
            SET approval_status = $1,
                approved_by = $2,
                approved_at = $3,
                rejection_reason = $4
            WHERE id = $5
            "#,
        )
        .bind(status.as_str())
        .bind(approver_id)
        .bind(decided_at)
        .bind(reason)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("request {}", id)));
        }

        Ok(())
    }

    /// Record a matching outcome on the request
    ///
    /// The matched resource reference and the matching status move together
    /// in one statement, so the reference is non-null exactly when the
    /// status is `matched`.
    pub async fn update_match(
        &self,
        id: i64,
        resource_id: Option<i64>,
        distance_km: Option<f64>,
        status: MatchingStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE relief_requests
            SET matched_resource_id = $1,
                nearest_distance_km = $2,
                matching_status = $3
            WHERE id = $4
            "#,
        )
        .bind(resource_id)
        .bind(distance_km)
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("request {}", id)));
        }

        Ok(())
    }

    /// Fetch every approved request for the batch priority sweep
    pub async fn list_recompute_targets(&self) -> Result<Vec<ReliefRequest>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, request_type, description, people_affected, urgency,
                   latitude, longitude, approval_status, matching_status,
                   priority_score, matched_resource_id, nearest_distance_km,
                   requester_id, contact_name, contact_phone,
                   approved_by, approved_at, rejection_reason, created_at
            FROM relief_requests
            WHERE approval_status = 'approved'
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_request).collect())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn map_request(row: &PgRow) -> ReliefRequest {
    let urgency: String = row.get("urgency");
    let approval_status: String = row.get("approval_status");
    let matching_status: String = row.get("matching_status");
    let priority_score: i16 = row.get("priority_score");

    ReliefRequest {
        id: row.get("id"),
        request_type: row.get("request_type"),
        description: row.get("description"),
        people_affected: row.get("people_affected"),
        urgency: UrgencyTier::from_label(&urgency),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        approval_status: ApprovalStatus::from_label(&approval_status),
        matching_status: MatchingStatus::from_label(&matching_status),
        priority_score: priority_score.clamp(0, 100) as u8,
        matched_resource_id: row.get("matched_resource_id"),
        nearest_distance_km: row.get("nearest_distance_km"),
        requester_id: row.get("requester_id"),
        contact_name: row.get("contact_name"),
        contact_phone: row.get("contact_phone"),
        approved_by: row.get("approved_by"),
        approved_at: row.get("approved_at"),
        rejection_reason: row.get("rejection_reason"),
        created_at: row.get("created_at"),
    }
}

fn map_resource(row: &PgRow) -> Resource {
    Resource {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        quantity: row.get("quantity"),
        minimum_reserve: row.get("minimum_reserve"),
        status: row.get("status"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
    }
}
