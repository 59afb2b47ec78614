//! Google Places review normalizer
//!
//! Maps a Places details response (`{ status, result: { name, rating,
//! reviews: [...] } }`) into the canonical model. Google rates on a 1-5
//! scale and provides no category breakdowns, so `ratingOverall10` is the
//! doubled star rating and `categories` stays empty. The listing slug is
//! derived from the place name with the same slug function as every other
//! source, so cross-source aggregates for one property line up.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::aggregate::group_into_listings;
use crate::model::{ApprovalMap, ListingRef, NormalizedFeed, Review, ReviewType, CHANNEL_GOOGLE};
use crate::normalize::listing_slug;
use crate::time;

/// Raw Places details envelope
#[derive(Debug, Deserialize)]
pub struct GooglePayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<GooglePlace>,
}

/// Place details with attached reviews
#[derive(Debug, Deserialize)]
pub struct GooglePlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub reviews: Vec<GoogleReview>,
}

/// One raw Google review
#[derive(Debug, Deserialize)]
pub struct GoogleReview {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    /// Submission time as unix seconds
    #[serde(default)]
    pub time: Option<i64>,
}

/// Normalize a raw Places details response.
///
/// Same failure policy as every normalizer: an undecodable envelope or a
/// missing `result` object yields an empty-listings feed with a
/// diagnostic reason.
pub fn normalize_google(raw: &Value, approvals: &ApprovalMap) -> NormalizedFeed {
    let payload: GooglePayload = match serde_json::from_value(raw.clone()) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "malformed Google payload, returning empty feed");
            return NormalizedFeed::empty(CHANNEL_GOOGLE, format!("malformed payload: {err}"));
        }
    };

    if payload.status.as_deref().is_some_and(|s| s != "OK") {
        let status = payload.status.unwrap_or_default();
        tracing::warn!(status = %status, "Google Places API returned non-OK status");
        return NormalizedFeed::empty(CHANNEL_GOOGLE, format!("Places API status: {status}"));
    }

    let Some(place) = payload.result else {
        return NormalizedFeed::empty(CHANNEL_GOOGLE, "payload missing result object");
    };

    let listing_name = place
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("Unknown listing")
        .to_string();
    let slug = listing_slug(&listing_name);

    tracing::debug!(
        place = %listing_name,
        place_rating = ?place.rating,
        total_ratings = ?place.user_ratings_total,
        review_count = place.reviews.len(),
        "normalizing Google place reviews"
    );

    let reviews: Vec<Review> = place
        .reviews
        .iter()
        .map(|record| normalize_record(record, approvals, &listing_name, &slug))
        .collect();

    NormalizedFeed {
        source: CHANNEL_GOOGLE.to_string(),
        fetched_at: time::now(),
        listings: group_into_listings(reviews),
        degraded: None,
    }
}

fn normalize_record(
    record: &GoogleReview,
    approvals: &ApprovalMap,
    listing_name: &str,
    slug: &str,
) -> Review {
    let author_name = record
        .author_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("Anonymous")
        .to_string();

    // Stable per-review key: Google exposes no review id, so compose one
    // from the submission time and the compacted author name.
    let compact_author: String = author_name.split_whitespace().collect();
    let id = format!(
        "{CHANNEL_GOOGLE}:{}:{compact_author}",
        record.time.unwrap_or(0)
    );

    let submitted_at = record
        .time
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(time::now);

    let rating_overall5 = record.rating;
    let rating_overall10 = record.rating.map(|r| r * 2.0);

    Review {
        approved: approvals.get(&id).copied().unwrap_or(false),
        id,
        channel: CHANNEL_GOOGLE.to_string(),
        review_type: ReviewType::GuestToHost,
        status: "published".to_string(),
        rating_overall10,
        rating_overall5,
        categories: BTreeMap::new(),
        submitted_at,
        author_name,
        text: record.text.clone().unwrap_or_default(),
        listing: ListingRef {
            name: listing_name.to_string(),
            slug: slug.to_string(),
        },
    }
}
