//! Metrics engine
//!
//! Computes aggregate statistics over any set of canonical reviews.
//! Total function: empty input yields the zero-value metrics object,
//! never an error. Single pass over the reviews plus a bounded
//! per-category fan-out.

use std::collections::BTreeMap;

use crate::analytics::{round_to_half, round_to_tenth};
use crate::model::{Metrics, Review};

/// Compute metrics over a set of reviews.
///
/// Averages are computed only over reviews that carry a rating; unrated
/// reviews count toward `count` but are excluded from every average
/// (null is not zero). `last_review_at` uses full timestamp ordering.
pub fn compute_metrics(reviews: &[Review]) -> Metrics {
    if reviews.is_empty() {
        return Metrics::empty();
    }

    let mut rated_count = 0u64;
    let mut sum5 = 0.0;
    let mut sum10 = 0.0;
    let mut last_review_at = None;
    let mut category_totals: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    let mut rating_distribution: BTreeMap<u8, u64> = (1..=5).map(|star| (star, 0)).collect();

    for review in reviews {
        if let (Some(r5), Some(r10)) = (review.rating_overall5, review.rating_overall10) {
            rated_count += 1;
            sum5 += r5;
            sum10 += r10;

            let star = r5.round() as i64;
            if (1..=5).contains(&star) {
                *rating_distribution.entry(star as u8).or_insert(0) += 1;
            }
        }

        if last_review_at.map_or(true, |latest| review.submitted_at > latest) {
            last_review_at = Some(review.submitted_at);
        }

        for (category, rating) in &review.categories {
            let entry = category_totals.entry(category.clone()).or_insert((0.0, 0));
            entry.0 += rating;
            entry.1 += 1;
        }
    }

    let (avg_rating5, avg_rating10) = if rated_count > 0 {
        let n = rated_count as f64;
        (Some(round_to_half(sum5 / n)), Some(round_to_tenth(sum10 / n)))
    } else {
        (None, None)
    };

    let category_averages = category_totals
        .into_iter()
        .map(|(category, (total, count))| (category, round_to_tenth(total / count as f64)))
        .collect();

    Metrics {
        count: reviews.len(),
        avg_rating5,
        avg_rating10,
        last_review_at,
        category_averages,
        rating_distribution,
    }
}
