//! Canonical review data model
//!
//! Every upstream source maps into this schema. The serialized field names
//! are camelCase because the dashboard consumes these objects directly.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::filters::FilterSpec;
use crate::time;

/// Channel identifier for the Hostaway property-management platform
pub const CHANNEL_HOSTAWAY: &str = "hostaway";
/// Channel identifier for Google Places reviews
pub const CHANNEL_GOOGLE: &str = "google";

/// Mapping from canonical review id (`"source:localid"`) to approval flag.
///
/// Owned by the persistence collaborator; the core only reads it.
pub type ApprovalMap = HashMap<String, bool>;

/// Direction of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewType {
    #[serde(rename = "guest-to-host")]
    GuestToHost,
    #[serde(rename = "host-to-guest")]
    HostToGuest,
}

/// Listing reference embedded in each review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRef {
    /// Human-readable property name as reported by the source
    pub name: String,
    /// URL-safe slug derived from `name` (see [`crate::normalize::listing_slug`])
    pub slug: String,
}

/// One guest review, source-agnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Globally unique id, format `"<source>:<source-local-id>"`.
    /// The source prefix guarantees ids from different channels never collide.
    pub id: String,
    /// Originating source (`hostaway`, `google`, ...)
    pub channel: String,
    /// Review direction
    pub review_type: ReviewType,
    /// Upstream publication status, informational only
    pub status: String,
    /// Overall rating on the 0-10 scale, if any
    pub rating_overall10: Option<f64>,
    /// Overall rating on the 0-5 star scale, derived from the 10-scale
    /// by linear scaling rounded to the nearest 0.5. None iff the
    /// 10-scale rating is None.
    pub rating_overall5: Option<f64>,
    /// Category sub-ratings keyed by canonical camelCase name. The key set
    /// is open: new sources introduce new categories without code changes.
    pub categories: BTreeMap<String, f64>,
    /// Submission timestamp, always UTC
    pub submitted_at: DateTime<Utc>,
    /// Display name of the reviewer, `"Anonymous"` when the source omits it
    pub author_name: String,
    /// Free review text, may be empty
    pub text: String,
    /// Publication approval flag; false unless the approval store says otherwise
    pub approved: bool,
    /// The property this review belongs to
    pub listing: ListingRef,
}

/// Aggregate statistics over a set of reviews.
///
/// Always derived, never persisted: any `Metrics` attached to a listing
/// reflects exactly the reviews attached alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Total reviews in the set, including unrated ones
    pub count: usize,
    /// Mean star rating over rated reviews, rounded to nearest 0.5
    pub avg_rating5: Option<f64>,
    /// Mean 10-scale rating over rated reviews, rounded to nearest 0.1
    pub avg_rating10: Option<f64>,
    /// Most recent submission timestamp in the set
    pub last_review_at: Option<DateTime<Utc>>,
    /// Mean rating per category, rounded to 1 decimal. A category absent
    /// from a review does not contribute to that category's denominator.
    pub category_averages: BTreeMap<String, f64>,
    /// Count of rated reviews per integer star bucket 1..=5
    pub rating_distribution: BTreeMap<u8, u64>,
}

impl Metrics {
    /// Zero-value metrics for an empty review set
    pub fn empty() -> Self {
        Self {
            count: 0,
            avg_rating5: None,
            avg_rating10: None,
            last_review_at: None,
            category_averages: BTreeMap::new(),
            rating_distribution: (1..=5).map(|star| (star, 0)).collect(),
        }
    }
}

/// One property and its reviews
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAggregate {
    /// Stable listing identifier (= slug)
    pub listing_id: String,
    /// Human-readable property name
    pub listing_name: String,
    /// Reviews attached to this listing
    pub reviews: Vec<Review>,
    /// Metrics computed over exactly `reviews`
    pub metrics: Metrics,
}

/// Result of one normalization pass over a single source.
///
/// A source that is unreachable or returns a malformed payload still
/// produces a well-shaped feed: empty listings plus a `degraded` reason,
/// so callers can tell "no reviews" from "source broken" without
/// exception inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFeed {
    /// Source channel this feed came from
    pub source: String,
    /// When this normalization pass ran
    pub fetched_at: DateTime<Utc>,
    /// Listings grouped from the source's reviews
    pub listings: Vec<ListingAggregate>,
    /// Diagnostic reason when the feed is empty due to source trouble
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub degraded: Option<String>,
}

impl NormalizedFeed {
    /// Empty-listings feed carrying a diagnostic reason
    pub fn empty(source: &str, reason: impl Into<String>) -> Self {
        Self {
            source: source.to_string(),
            fetched_at: time::now(),
            listings: Vec::new(),
            degraded: Some(reason.into()),
        }
    }
}

/// Final response produced by the aggregation orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    /// Source channel, or `"a+b"` when feeds were combined
    pub source: String,
    /// When this aggregation ran
    pub fetched_at: DateTime<Utc>,
    /// Listings surviving filtering, metrics recomputed per group
    pub listings: Vec<ListingAggregate>,
    /// Total reviews across all returned listings
    pub total_reviews: usize,
    /// Echo of the filter spec, present when filtering was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub applied_filters: Option<FilterSpec>,
    /// Joined diagnostic reasons from degraded input feeds
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub degraded: Option<String>,
}
