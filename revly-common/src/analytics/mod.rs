//! Analytics engines over canonical reviews
//!
//! Pure, stateless recomputations: metrics, time buckets, and
//! filtering/sorting. Nothing here caches or mutates its input.

pub mod buckets;
pub mod filters;
pub mod metrics;

pub use buckets::{bucketize_by, bucketize_by_date, BucketPeriod, TrendBucket};
pub use filters::{apply_filters, sort_reviews, FilterSpec};
pub use metrics::compute_metrics;

/// Round to the nearest 0.5 (star-scale display rounding)
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Round to the nearest 0.1 (10-scale display rounding)
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_half() {
        assert_eq!(round_to_half(4.2), 4.0);
        assert_eq!(round_to_half(4.25), 4.5);
        assert_eq!(round_to_half(4.3), 4.5);
        assert_eq!(round_to_half(4.75), 5.0);
        assert_eq!(round_to_half(0.0), 0.0);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(8.333), 8.3);
        assert_eq!(round_to_tenth(8.35), 8.4);
        assert_eq!(round_to_tenth(9.99), 10.0);
    }
}
