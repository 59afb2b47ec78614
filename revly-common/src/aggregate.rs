//! Aggregation orchestrator
//!
//! Composes the pipeline the route layer calls: flatten normalized feeds
//! into one review sequence, filter, sort, regroup by property, and
//! recompute metrics per group. Metrics on every returned listing reflect
//! exactly the reviews attached to it in the same response; no stale
//! aggregate ever reaches the caller.

use std::collections::HashMap;

use crate::analytics::{apply_filters, compute_metrics, sort_reviews, FilterSpec};
use crate::model::{AggregateResponse, ListingAggregate, NormalizedFeed, Review};
use crate::time;

/// Group a flat review sequence into listing aggregates by slug,
/// preserving first-seen listing order and computing metrics per group.
pub fn group_into_listings(reviews: Vec<Review>) -> Vec<ListingAggregate> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, ListingAggregate> = HashMap::new();

    for review in reviews {
        let slug = review.listing.slug.clone();
        let group = groups.entry(slug.clone()).or_insert_with(|| {
            order.push(slug.clone());
            ListingAggregate {
                listing_id: slug,
                listing_name: review.listing.name.clone(),
                reviews: Vec::new(),
                metrics: crate::model::Metrics::empty(),
            }
        });
        group.reviews.push(review);
    }

    order
        .into_iter()
        .filter_map(|slug| groups.remove(&slug))
        .map(|mut group| {
            group.metrics = compute_metrics(&group.reviews);
            group
        })
        .collect()
}

/// Aggregate one or more normalized feeds into the final dashboard
/// response.
///
/// Feeds are concatenated before filtering/sorting so cross-source
/// aggregates for a property are computed over the union, not merged
/// after the fact. When a single-listing filter is set, only that listing
/// is returned, carrying the filtered/sorted set and metrics recomputed
/// over exactly that set. Otherwise the filtered sequence is regrouped by
/// slug; a listing with zero surviving reviews disappears from the
/// output.
pub fn aggregate(
    feeds: Vec<NormalizedFeed>,
    filters: &FilterSpec,
    sort_by: &str,
    direction: &str,
) -> AggregateResponse {
    let source = match feeds.len() {
        1 => feeds[0].source.clone(),
        _ => feeds
            .iter()
            .map(|feed| feed.source.as_str())
            .collect::<Vec<_>>()
            .join("+"),
    };

    let degraded_reasons: Vec<String> = feeds
        .iter()
        .filter_map(|feed| {
            feed.degraded
                .as_ref()
                .map(|reason| format!("{}: {reason}", feed.source))
        })
        .collect();
    let degraded = if degraded_reasons.is_empty() {
        None
    } else {
        Some(degraded_reasons.join("; "))
    };

    // Flatten all listings' reviews into one sequence, remembering
    // listing names so a filtered-to-empty single listing can still be
    // titled correctly.
    let mut listing_names: HashMap<String, String> = HashMap::new();
    let mut all_reviews: Vec<Review> = Vec::new();
    for feed in feeds {
        for listing in feed.listings {
            listing_names
                .entry(listing.listing_id.clone())
                .or_insert(listing.listing_name);
            all_reviews.extend(listing.reviews);
        }
    }

    let filtering = !filters.is_empty();
    let filtered = apply_filters(&all_reviews, filters);
    let sorted = sort_reviews(&filtered, sort_by, direction);
    let total_reviews = sorted.len();

    let listings = match filters.listing_id.as_deref() {
        Some(slug) => match listing_names.get(slug) {
            Some(name) => vec![ListingAggregate {
                listing_id: slug.to_string(),
                listing_name: name.clone(),
                metrics: compute_metrics(&sorted),
                reviews: sorted,
            }],
            None => Vec::new(),
        },
        None => group_into_listings(sorted),
    };

    AggregateResponse {
        source,
        fetched_at: time::now(),
        listings,
        total_reviews,
        applied_filters: filtering.then(|| filters.clone()),
        degraded,
    }
}
