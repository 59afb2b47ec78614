//! Time-bucketing engine for trend visualization
//!
//! Groups reviews into fixed-width calendar buckets (day/week/month) and
//! reports per-bucket count and average star rating. Buckets are
//! calendar-aligned: days start at midnight UTC, weeks on Sunday, months
//! on the 1st. When the span produces more buckets than requested, only
//! the most recent ones are kept (trailing window, never decimation).

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::round_to_half;
use crate::model::Review;

/// Bucket width for trend aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketPeriod {
    Day,
    Week,
    Month,
}

impl BucketPeriod {
    /// Parse from a query-string value; unrecognized input falls back to
    /// daily buckets rather than failing the request.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::Day,
        }
    }

    /// Chart label format for a bucket of this width
    fn label_format(self) -> &'static str {
        match self {
            Self::Day | Self::Week => "%b %d",
            Self::Month => "%b %Y",
        }
    }
}

/// One trend bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    /// Bucket start instant (inclusive)
    pub date: DateTime<Utc>,
    /// Display label, e.g. `"Mar 05"` or `"Mar 2024"`
    pub label: String,
    /// Number of reviews falling in `[date, next bucket start)`
    pub count: usize,
    /// Mean star rating of rated reviews in the bucket, nearest 0.5
    pub avg_rating: Option<f64>,
}

/// Bucketize reviews by `submitted_at`
pub fn bucketize_by_date(
    reviews: &[Review],
    period: BucketPeriod,
    max_buckets: usize,
) -> Vec<TrendBucket> {
    bucketize_by(reviews, |review| review.submitted_at, period, max_buckets)
}

/// Bucketize reviews by an arbitrary date field.
///
/// Empty input yields an empty bucket list. When every review falls at
/// the same instant the result is exactly one bucket.
pub fn bucketize_by<F>(
    reviews: &[Review],
    date_field: F,
    period: BucketPeriod,
    max_buckets: usize,
) -> Vec<TrendBucket>
where
    F: Fn(&Review) -> DateTime<Utc>,
{
    if reviews.is_empty() || max_buckets == 0 {
        return Vec::new();
    }

    let dates: Vec<DateTime<Utc>> = reviews.iter().map(&date_field).collect();
    let oldest = dates.iter().min().copied().unwrap_or_default();
    let newest = dates.iter().max().copied().unwrap_or_default();

    // Generate calendar-aligned bucket starts covering the inclusive span
    let first = bucket_start(oldest, period);
    let last = bucket_start(newest, period);
    let mut starts = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        starts.push(cursor);
        let next = next_bucket_start(cursor, period);
        if next <= cursor {
            break; // calendar arithmetic failed to advance
        }
        cursor = next;
    }

    // Trailing window: keep only the most recent max_buckets
    if starts.len() > max_buckets {
        starts.drain(..starts.len() - max_buckets);
    }

    starts
        .into_iter()
        .map(|start| {
            let end = next_bucket_start(start, period);
            let mut count = 0;
            let mut rated = 0u64;
            let mut rating_sum = 0.0;
            for review in reviews {
                let date = date_field(review);
                if date < start || date >= end {
                    continue;
                }
                count += 1;
                if let Some(r5) = review.rating_overall5 {
                    rated += 1;
                    rating_sum += r5;
                }
            }

            let avg_rating = if rated > 0 {
                Some(round_to_half(rating_sum / rated as f64))
            } else {
                None
            };

            TrendBucket {
                date: start,
                label: start.format(period.label_format()).to_string(),
                count,
                avg_rating,
            }
        })
        .collect()
}

/// Calendar-aligned start of the bucket containing `instant`
fn bucket_start(instant: DateTime<Utc>, period: BucketPeriod) -> DateTime<Utc> {
    let date = instant.date_naive();
    let aligned = match period {
        BucketPeriod::Day => date,
        BucketPeriod::Week => {
            // Weeks start on Sunday
            date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
        }
        BucketPeriod::Month => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
        }
    };
    midnight_utc(aligned)
}

/// Start of the bucket following the one starting at `start`
fn next_bucket_start(start: DateTime<Utc>, period: BucketPeriod) -> DateTime<Utc> {
    let date = start.date_naive();
    let next = match period {
        BucketPeriod::Day => date + Duration::days(1),
        BucketPeriod::Week => date + Duration::days(7),
        BucketPeriod::Month => date.checked_add_months(Months::new(1)).unwrap_or(date),
    };
    midnight_utc(next)
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}
