//! Filter/sort engine for canonical reviews
//!
//! Declarative filter predicates combined by logical AND, plus stable
//! sorting over a fixed field vocabulary. Both operations are pure and
//! return new sequences; the system always filters before sorting.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Review;

/// Declarative filter predicate set.
///
/// Every field is optional; present fields are AND-combined. Date bounds
/// are accepted as strings from the query layer and parsed leniently:
/// an unparseable bound disables that dimension instead of failing the
/// request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Listing slug equality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    /// Channel equality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Star-rating lower bound, inclusive; only matches rated reviews
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_min: Option<f64>,
    /// Star-rating upper bound, inclusive; only matches rated reviews
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_max: Option<f64>,
    /// Category presence (value unconstrained)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Submission-date lower bound, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Submission-date upper bound, inclusive end-of-day (23:59:59.999)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Approval-status equality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    /// Case-insensitive substring search over text, author, listing name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilterSpec {
    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Apply a filter spec over a flat review collection.
///
/// Returns a new vector; the input is untouched. Applying two specs
/// sequentially is equivalent to applying their conjunction in one pass.
pub fn apply_filters(reviews: &[Review], spec: &FilterSpec) -> Vec<Review> {
    let from_bound = spec.from.as_deref().and_then(parse_from_bound);
    let to_bound = spec.to.as_deref().and_then(parse_to_bound);
    let search_term = spec.search.as_deref().map(str::to_lowercase);

    reviews
        .iter()
        .filter(|review| {
            if let Some(listing_id) = &spec.listing_id {
                if review.listing.slug != *listing_id {
                    return false;
                }
            }
            if let Some(channel) = &spec.channel {
                if review.channel != *channel {
                    return false;
                }
            }
            if let Some(min) = spec.rating_min {
                match review.rating_overall5 {
                    Some(rating) if rating >= min => {}
                    _ => return false,
                }
            }
            if let Some(max) = spec.rating_max {
                match review.rating_overall5 {
                    Some(rating) if rating <= max => {}
                    _ => return false,
                }
            }
            if let Some(category) = &spec.category {
                if !review.categories.contains_key(category) {
                    return false;
                }
            }
            if let Some(from) = from_bound {
                if review.submitted_at < from {
                    return false;
                }
            }
            if let Some(to) = to_bound {
                if review.submitted_at > to {
                    return false;
                }
            }
            if let Some(approved) = spec.approved {
                if review.approved != approved {
                    return false;
                }
            }
            if let Some(term) = &search_term {
                let matched = review.text.to_lowercase().contains(term)
                    || review.author_name.to_lowercase().contains(term)
                    || review.listing.name.to_lowercase().contains(term);
                if !matched {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Sort reviews by field and direction.
///
/// Returns a new vector; the input is untouched. An unrecognized sort
/// field is a stable no-op (original order preserved); any direction
/// other than `"asc"` sorts descending. The underlying sort is stable,
/// so ties keep their input order.
pub fn sort_reviews(reviews: &[Review], sort_by: &str, direction: &str) -> Vec<Review> {
    let mut sorted = reviews.to_vec();
    let ascending = direction.eq_ignore_ascii_case("asc");
    let orient = |ordering: Ordering| if ascending { ordering } else { ordering.reverse() };

    match sort_by {
        "rating" => sorted.sort_by(|a, b| {
            // Missing rating sorts as 0
            let left = a.rating_overall5.unwrap_or(0.0);
            let right = b.rating_overall5.unwrap_or(0.0);
            orient(left.partial_cmp(&right).unwrap_or(Ordering::Equal))
        }),
        "date" => sorted.sort_by(|a, b| orient(a.submitted_at.cmp(&b.submitted_at))),
        "author" => sorted.sort_by(|a, b| {
            orient(a.author_name.to_lowercase().cmp(&b.author_name.to_lowercase()))
        }),
        "listing" => sorted.sort_by(|a, b| {
            orient(a.listing.name.to_lowercase().cmp(&b.listing.name.to_lowercase()))
        }),
        "channel" => sorted.sort_by(|a, b| orient(a.channel.cmp(&b.channel))),
        _ => {}
    }

    sorted
}

/// Parse an inclusive lower date bound: start of day for a bare date,
/// the exact instant for a full timestamp.
fn parse_from_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an inclusive upper date bound: always the end of that calendar
/// day (23:59:59.999), even when a full timestamp was supplied.
fn parse_to_bound(raw: &str) -> Option<DateTime<Utc>> {
    let date = if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        instant.with_timezone(&Utc).date_naive()
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?
    };
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;

    use super::*;
    use crate::model::{ListingRef, ReviewType};

    fn review(id: &str, rating5: Option<f64>, author: &str, listing: &str) -> Review {
        Review {
            id: id.to_string(),
            channel: "hostaway".to_string(),
            review_type: ReviewType::GuestToHost,
            status: "published".to_string(),
            rating_overall10: rating5.map(|r| r * 2.0),
            rating_overall5: rating5,
            categories: BTreeMap::new(),
            submitted_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            author_name: author.to_string(),
            text: String::new(),
            approved: false,
            listing: ListingRef {
                name: listing.to_string(),
                slug: listing.to_lowercase().replace(' ', "-"),
            },
        }
    }

    #[test]
    fn test_rating_range_is_inclusive_and_skips_unrated() {
        let reviews = vec![
            review("hostaway:1", Some(2.0), "A", "Loft"),
            review("hostaway:2", Some(3.0), "B", "Loft"),
            review("hostaway:3", Some(4.0), "C", "Loft"),
            review("hostaway:4", Some(5.0), "D", "Loft"),
            review("hostaway:5", None, "E", "Loft"),
        ];
        let spec = FilterSpec {
            rating_min: Some(3.0),
            rating_max: Some(4.0),
            ..FilterSpec::default()
        };

        let filtered = apply_filters(&reviews, &spec);
        let ratings: Vec<f64> = filtered.iter().filter_map(|r| r.rating_overall5).collect();
        assert_eq!(ratings, vec![3.0, 4.0]);
    }

    #[test]
    fn test_sequential_filters_equal_single_conjunction() {
        let mut with_category = review("hostaway:1", Some(4.0), "Alice", "Loft");
        with_category.categories.insert("cleanliness".to_string(), 9.0);
        let reviews = vec![
            with_category,
            review("hostaway:2", Some(4.0), "Bob", "Loft"),
            review("hostaway:3", Some(2.0), "Alice", "Loft"),
        ];

        let rating_only = FilterSpec {
            rating_min: Some(3.0),
            ..FilterSpec::default()
        };
        let category_only = FilterSpec {
            category: Some("cleanliness".to_string()),
            ..FilterSpec::default()
        };
        let combined = FilterSpec {
            rating_min: Some(3.0),
            category: Some("cleanliness".to_string()),
            ..FilterSpec::default()
        };

        let sequential = apply_filters(&apply_filters(&reviews, &rating_only), &category_only);
        let one_pass = apply_filters(&reviews, &combined);
        assert_eq!(sequential, one_pass);
        assert_eq!(one_pass.len(), 1);
        assert_eq!(one_pass[0].id, "hostaway:1");
    }

    #[test]
    fn test_to_bound_is_end_of_day_inclusive() {
        let mut late_on_the_10th = review("hostaway:1", Some(4.0), "A", "Loft");
        late_on_the_10th.submitted_at = Utc.with_ymd_and_hms(2024, 3, 10, 23, 45, 0).unwrap();
        let mut on_the_11th = review("hostaway:2", Some(4.0), "B", "Loft");
        on_the_11th.submitted_at = Utc.with_ymd_and_hms(2024, 3, 11, 0, 5, 0).unwrap();

        let spec = FilterSpec {
            to: Some("2024-03-10".to_string()),
            ..FilterSpec::default()
        };
        let filtered = apply_filters(&[late_on_the_10th, on_the_11th], &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "hostaway:1");
    }

    #[test]
    fn test_unparseable_date_bound_is_ignored() {
        let reviews = vec![review("hostaway:1", Some(4.0), "A", "Loft")];
        let spec = FilterSpec {
            from: Some("not-a-date".to_string()),
            ..FilterSpec::default()
        };
        assert_eq!(apply_filters(&reviews, &spec).len(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut by_text = review("hostaway:1", Some(4.0), "Alice", "Loft");
        by_text.text = "Wonderful STAY, spotless".to_string();
        let by_author = review("hostaway:2", Some(4.0), "Mr Stay-a-lot", "Loft");
        let by_listing = review("hostaway:3", Some(4.0), "Bob", "Staycation Villa");
        let no_match = review("hostaway:4", Some(4.0), "Carol", "Loft");

        let spec = FilterSpec {
            search: Some("stay".to_string()),
            ..FilterSpec::default()
        };
        let filtered = apply_filters(&[by_text, by_author, by_listing, no_match], &spec);
        let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["hostaway:1", "hostaway:2", "hostaway:3"]);
    }

    #[test]
    fn test_unknown_sort_field_preserves_original_order() {
        let reviews = vec![
            review("hostaway:1", Some(3.0), "C", "Loft"),
            review("hostaway:2", Some(5.0), "A", "Loft"),
            review("hostaway:3", Some(1.0), "B", "Loft"),
        ];
        let sorted = sort_reviews(&reviews, "bogus-field", "asc");
        let ids: Vec<&str> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["hostaway:1", "hostaway:2", "hostaway:3"]);
    }

    #[test]
    fn test_rating_desc_sorts_missing_rating_as_zero() {
        let reviews = vec![
            review("hostaway:1", Some(3.0), "A", "Loft"),
            review("hostaway:2", None, "B", "Loft"),
            review("hostaway:3", Some(5.0), "C", "Loft"),
        ];
        let sorted = sort_reviews(&reviews, "rating", "desc");
        let ids: Vec<&str> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["hostaway:3", "hostaway:1", "hostaway:2"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut first = review("hostaway:1", Some(4.0), "A", "Loft");
        first.submitted_at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut second = review("hostaway:2", Some(4.0), "B", "Loft");
        second.submitted_at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let sorted = sort_reviews(&[first, second], "date", "desc");
        let ids: Vec<&str> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["hostaway:1", "hostaway:2"]);
    }

    #[test]
    fn test_author_sort_is_case_insensitive() {
        let reviews = vec![
            review("hostaway:1", Some(4.0), "bob", "Loft"),
            review("hostaway:2", Some(4.0), "Alice", "Loft"),
        ];
        let sorted = sort_reviews(&reviews, "author", "asc");
        assert_eq!(sorted[0].author_name, "Alice");
        assert_eq!(sorted[1].author_name, "bob");
    }
}
