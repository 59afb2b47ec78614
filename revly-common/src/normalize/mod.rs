//! Source normalizers
//!
//! One normalizer per upstream channel, each mapping the source's raw
//! payload into the canonical review model. Shared helpers here handle
//! the per-source quirks: rating-scale conversion, category-key
//! canonicalization, slug derivation, and lenient timestamp parsing.
//!
//! Failure policy: a structurally invalid payload normalizes to an
//! empty-listings feed with a diagnostic, and a garbage per-record
//! timestamp falls back to "now" with a warning. One bad source or
//! record must never abort the rest of the batch.

pub mod google;
pub mod hostaway;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub use google::normalize_google;
pub use hostaway::normalize_hostaway;

/// Convert a listing name to a URL-safe slug: lowercase, non-alphanumeric
/// stripped, whitespace runs collapsed to a single hyphen, no leading or
/// trailing hyphen. Pure function of the name; the same name always yields
/// the same slug.
pub fn listing_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
        // other punctuation is dropped without forcing a separator
    }
    slug
}

/// Convert a 0-10 rating to a 0-5 star rating, rounded to the nearest 0.5.
/// None in, None out.
pub fn to_stars5(rating10: Option<f64>) -> Option<f64> {
    rating10.map(|r| (r / 10.0 * 5.0 * 2.0).round() / 2.0)
}

/// Canonicalize a source-native category key (snake_case or
/// space-separated) to camelCase. Keys already in camelCase pass through
/// unchanged, as do unknown categories: the key set is open.
pub fn canonical_category_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut upper_next = false;
    for c in raw.chars() {
        if c == '_' || c == ' ' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse a source-native timestamp into UTC.
///
/// Accepts RFC 3339, the Hostaway `"YYYY-MM-DD HH:MM:SS"` form (assumed
/// UTC), the T-separated equivalent, and a bare date. Unparseable input
/// falls back to the current instant with a warning rather than failing
/// the batch.
pub fn parse_source_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return instant.with_timezone(&Utc);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc();
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return naive.and_utc();
    }

    tracing::warn!(timestamp = raw, "unparseable source timestamp, substituting current time");
    Utc::now()
}
