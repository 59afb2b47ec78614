//! Google Places API client
//!
//! Fetches place details with attached reviews. Unlike the Hostaway
//! client there is no mock fallback: failures surface as errors and the
//! route layer maps them to an empty degraded feed.

use revly_common::{Error, Result};
use serde_json::Value;

use crate::AppState;

const PLACES_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";
const PLACES_FIELDS: &str = "name,reviews,rating,user_ratings_total";

/// Fetch raw place details (with reviews) for one place id.
pub async fn fetch_place_details(state: &AppState, place_id: &str) -> Result<Value> {
    let Some(api_key) = &state.config.google_api_key else {
        return Err(Error::Config("Google Places API key not configured".to_string()));
    };

    let response = state
        .http
        .get(PLACES_DETAILS_URL)
        .query(&[
            ("place_id", place_id),
            ("fields", PLACES_FIELDS),
            ("key", api_key.as_str()),
        ])
        .send()
        .await
        .map_err(|err| Error::Upstream(format!("Places request failed: {err}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Upstream(format!("Places API error: {status}")));
    }

    response
        .json()
        .await
        .map_err(|err| Error::Upstream(format!("Places response not JSON: {err}")))
}
