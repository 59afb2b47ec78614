//! Review listing endpoints, one per source channel
//!
//! Each handler runs the same pipeline: fetch raw payload, load approval
//! flags, normalize, then filter/sort/aggregate per the query parameters.
//! Upstream trouble never turns into a 5xx here; it surfaces as a
//! well-formed empty response with a `degraded` reason so the dashboard
//! can render "no data" instead of crashing.

use axum::extract::{Query, State};
use axum::Json;
use revly_common::aggregate::aggregate;
use revly_common::analytics::FilterSpec;
use revly_common::model::{AggregateResponse, NormalizedFeed, CHANNEL_GOOGLE};
use revly_common::normalize::{normalize_google, normalize_hostaway};
use serde::Deserialize;
use tracing::warn;

use crate::api::ApiError;
use crate::{clients, store, AppState};

/// Query parameters shared by the review endpoints: the filter
/// vocabulary plus sort controls, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewQuery {
    pub listing_id: Option<String>,
    pub channel: Option<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub approved: Option<bool>,
    pub search: Option<String>,
    /// Sort field: date (default), rating, author, listing, channel
    pub sort: Option<String>,
    /// Sort direction: asc or desc (default)
    pub dir: Option<String>,
    /// Google Places place id (Google endpoint only)
    pub place_id: Option<String>,
}

impl ReviewQuery {
    fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            listing_id: self.listing_id.clone(),
            channel: self.channel.clone(),
            rating_min: self.rating_min,
            rating_max: self.rating_max,
            category: self.category.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            approved: self.approved,
            search: self.search.clone(),
        }
    }

    fn sort_by(&self) -> &str {
        self.sort.as_deref().unwrap_or("date")
    }

    fn direction(&self) -> &str {
        self.dir.as_deref().unwrap_or("desc")
    }
}

/// GET /api/reviews/hostaway
///
/// Hostaway reviews, normalized and aggregated per the query parameters.
pub async fn get_hostaway_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let raw = clients::hostaway::fetch_raw(&state).await;
    let approvals = load_approvals_tolerant(&state).await;
    let feed = normalize_hostaway(&raw, &approvals);

    let response = aggregate(
        vec![feed],
        &query.filter_spec(),
        query.sort_by(),
        query.direction(),
    );
    Ok(Json(response))
}

/// GET /api/reviews/google?placeId=...
///
/// Google Places reviews for one place. Requires `placeId`; a missing or
/// misconfigured API key degrades to an empty feed rather than failing.
pub async fn get_google_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let Some(place_id) = query.place_id.as_deref().filter(|id| !id.is_empty()) else {
        return Err(ApiError::BadRequest(
            "placeId parameter is required".to_string(),
        ));
    };

    let approvals = load_approvals_tolerant(&state).await;
    let feed = match clients::google::fetch_place_details(&state, place_id).await {
        Ok(raw) => normalize_google(&raw, &approvals),
        Err(err) => {
            warn!(place_id, error = %err, "Google Places fetch failed, serving degraded feed");
            NormalizedFeed::empty(CHANNEL_GOOGLE, err.to_string())
        }
    };

    let response = aggregate(
        vec![feed],
        &query.filter_spec(),
        query.sort_by(),
        query.direction(),
    );
    Ok(Json(response))
}

/// Load approvals, tolerating an unavailable store: every review is then
/// unapproved rather than the whole request failing.
async fn load_approvals_tolerant(state: &AppState) -> revly_common::model::ApprovalMap {
    match store::load_approvals(&state.config.data_dir).await {
        Ok(approvals) => approvals,
        Err(err) => {
            warn!(error = %err, "approval store unavailable, treating all reviews as unapproved");
            revly_common::model::ApprovalMap::new()
        }
    }
}
