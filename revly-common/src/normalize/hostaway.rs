//! Hostaway review normalizer
//!
//! Maps the Hostaway `/v1/reviews` envelope (`{ status, result: [...] }`)
//! into the canonical model. Hostaway reviews rate on a 0-10 scale and
//! carry snake_case category sub-ratings; a review may omit the overall
//! rating, in which case it is derived from the category mean. That
//! derived value has a different statistical basis than an explicit
//! overall rating; downstream consumers depend on the distinction, so it
//! is preserved rather than reconciled.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::aggregate::group_into_listings;
use crate::analytics::round_to_tenth;
use crate::model::{
    ApprovalMap, ListingRef, NormalizedFeed, Review, ReviewType, CHANNEL_HOSTAWAY,
};
use crate::normalize::{canonical_category_key, listing_slug, parse_source_timestamp, to_stars5};
use crate::time;

/// Raw Hostaway API envelope
#[derive(Debug, Deserialize)]
pub struct HostawayPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<HostawayReview>>,
}

/// One raw Hostaway review record. Everything except the id is optional
/// so that a sparse record degrades field-by-field instead of sinking
/// the whole batch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostawayReview {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub review_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub public_review: Option<String>,
    #[serde(default)]
    pub review_category: Vec<HostawayCategory>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub listing_name: Option<String>,
}

/// One raw Hostaway category sub-rating
#[derive(Debug, Deserialize)]
pub struct HostawayCategory {
    pub category: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Normalize a raw Hostaway API response.
///
/// A structurally invalid payload (undecodable envelope or missing
/// `result` list) yields an empty-listings feed with a diagnostic reason,
/// never an error: one bad source must not break the aggregate view.
pub fn normalize_hostaway(raw: &Value, approvals: &ApprovalMap) -> NormalizedFeed {
    let payload: HostawayPayload = match serde_json::from_value(raw.clone()) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "malformed Hostaway payload, returning empty feed");
            return NormalizedFeed::empty(CHANNEL_HOSTAWAY, format!("malformed payload: {err}"));
        }
    };

    let Some(records) = payload.result else {
        tracing::warn!(
            status = payload.status.as_deref().unwrap_or("unknown"),
            "Hostaway payload has no result list, returning empty feed"
        );
        return NormalizedFeed::empty(CHANNEL_HOSTAWAY, "payload missing result list");
    };

    let reviews: Vec<Review> = records
        .iter()
        .map(|record| normalize_record(record, approvals))
        .collect();

    NormalizedFeed {
        source: CHANNEL_HOSTAWAY.to_string(),
        fetched_at: time::now(),
        listings: group_into_listings(reviews),
        degraded: None,
    }
}

fn normalize_record(record: &HostawayReview, approvals: &ApprovalMap) -> Review {
    let id = format!("{CHANNEL_HOSTAWAY}:{}", record.id);

    let categories: BTreeMap<String, f64> = record
        .review_category
        .iter()
        .filter_map(|cat| {
            cat.rating
                .map(|rating| (canonical_category_key(&cat.category), rating))
        })
        .collect();

    let rating_overall10 = record
        .rating
        .or_else(|| category_mean(&record.review_category));
    let rating_overall5 = to_stars5(rating_overall10);

    let submitted_at = match record.submitted_at.as_deref() {
        Some(raw) => parse_source_timestamp(raw),
        None => {
            tracing::warn!(review = %id, "Hostaway review has no submission timestamp");
            time::now()
        }
    };

    let review_type = match record.review_type.as_deref() {
        Some("host-to-guest") => ReviewType::HostToGuest,
        _ => ReviewType::GuestToHost,
    };

    let author_name = record
        .guest_name
        .as_deref()
        .or(record.host_name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or("Anonymous")
        .to_string();

    let listing_name = record
        .listing_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("Unknown listing")
        .to_string();

    Review {
        approved: approvals.get(&id).copied().unwrap_or(false),
        id,
        channel: CHANNEL_HOSTAWAY.to_string(),
        review_type,
        status: record.status.clone().unwrap_or_else(|| "pending".to_string()),
        rating_overall10,
        rating_overall5,
        categories,
        submitted_at,
        author_name,
        text: record.public_review.clone().unwrap_or_default(),
        listing: ListingRef {
            slug: listing_slug(&listing_name),
            name: listing_name,
        },
    }
}

/// Mean of the raw category sub-ratings, rounded to 1 decimal.
///
/// A category entry without a rating contributes 0 to the sum but still
/// counts in the denominator; this matches how Hostaway dashboards have
/// historically reported the derived overall score.
fn category_mean(categories: &[HostawayCategory]) -> Option<f64> {
    if categories.is_empty() {
        return None;
    }
    let sum: f64 = categories.iter().map(|cat| cat.rating.unwrap_or(0.0)).sum();
    Some(round_to_tenth(sum / categories.len() as f64))
}
