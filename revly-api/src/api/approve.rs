//! Review approval endpoints
//!
//! The approval flag is the only persisted state in the system; these
//! handlers are the only writers. Ids must be in canonical
//! `"source:localid"` form so flags survive renormalization.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiError;
use crate::{store, AppState};

/// One approval update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalUpdate {
    pub review_id: String,
    pub approved: bool,
}

/// Response for a single approval update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub ok: bool,
    pub review_id: String,
    pub approved: bool,
}

/// Batch approval request
#[derive(Debug, Deserialize)]
pub struct BatchApprovalRequest {
    pub updates: Vec<ApprovalUpdate>,
}

/// Per-item outcome in a batch response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemOutcome {
    pub review_id: String,
    pub approved: bool,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch approval response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchApprovalResponse {
    pub ok: bool,
    pub updated: usize,
    pub failed: usize,
    pub results: Vec<BatchItemOutcome>,
}

fn validate_review_id(review_id: &str) -> Result<(), ApiError> {
    if !review_id.contains(':') {
        return Err(ApiError::BadRequest(
            "reviewId should be in format \"source:id\" (e.g. \"hostaway:12345\")".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/reviews/approve
///
/// Persist one approval flag.
pub async fn set_approval(
    State(state): State<AppState>,
    Json(update): Json<ApprovalUpdate>,
) -> Result<Json<ApprovalResponse>, ApiError> {
    validate_review_id(&update.review_id)?;

    store::set_approval(&state.config.data_dir, &update.review_id, update.approved).await?;
    info!(review_id = %update.review_id, approved = update.approved, "approval updated");

    Ok(Json(ApprovalResponse {
        ok: true,
        review_id: update.review_id,
        approved: update.approved,
    }))
}

/// PATCH /api/reviews/approve
///
/// Persist a batch of approval flags with per-item outcome accounting;
/// one bad item does not abort the rest.
pub async fn set_approvals_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchApprovalRequest>,
) -> Result<Json<BatchApprovalResponse>, ApiError> {
    let mut results = Vec::with_capacity(request.updates.len());
    let mut updated = 0;
    let mut failed = 0;

    for update in request.updates {
        let outcome = if !update.review_id.contains(':') {
            failed += 1;
            BatchItemOutcome {
                review_id: update.review_id,
                approved: update.approved,
                success: false,
                error: Some("invalid reviewId format".to_string()),
            }
        } else {
            match store::set_approval(&state.config.data_dir, &update.review_id, update.approved)
                .await
            {
                Ok(_) => {
                    updated += 1;
                    BatchItemOutcome {
                        review_id: update.review_id,
                        approved: update.approved,
                        success: true,
                        error: None,
                    }
                }
                Err(err) => {
                    failed += 1;
                    BatchItemOutcome {
                        review_id: update.review_id,
                        approved: update.approved,
                        success: false,
                        error: Some(err.to_string()),
                    }
                }
            }
        };
        results.push(outcome);
    }

    Ok(Json(BatchApprovalResponse {
        ok: true,
        updated,
        failed,
        results,
    }))
}
