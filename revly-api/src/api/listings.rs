//! Listing summary endpoint

use axum::extract::State;
use axum::Json;
use revly_common::model::Metrics;
use revly_common::normalize::normalize_hostaway;
use serde::Serialize;

use crate::api::ApiError;
use crate::{clients, store, AppState};

/// One property summary: identity and metrics, no review bodies
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub listing_id: String,
    pub listing_name: String,
    pub metrics: Metrics,
}

/// GET /api/listings
///
/// Summaries of every known listing, derived from the normalized
/// Hostaway feed (the property-management platform is the system of
/// record for the property roster).
pub async fn get_listings(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListingSummary>>, ApiError> {
    let raw = clients::hostaway::fetch_raw(&state).await;
    let approvals = store::load_approvals(&state.config.data_dir)
        .await
        .unwrap_or_default();
    let feed = normalize_hostaway(&raw, &approvals);

    let summaries = feed
        .listings
        .into_iter()
        .map(|listing| ListingSummary {
            listing_id: listing.listing_id,
            listing_name: listing.listing_name,
            metrics: listing.metrics,
        })
        .collect();

    Ok(Json(summaries))
}
