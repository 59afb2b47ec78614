//! # Revly Common Library
//!
//! Shared code for the Revly review-aggregation service:
//! - Canonical review data model (source-agnostic schema)
//! - Source normalizers (Hostaway, Google Places)
//! - Analytics engines (metrics, time buckets, filter/sort)
//! - Aggregation orchestrator
//! - Configuration loading
//!
//! Everything here is a synchronous, deterministic transformation of
//! in-memory data. Network fetches and file persistence live in the
//! service crates that depend on this one.

pub mod aggregate;
pub mod analytics;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod time;

pub use error::{Error, Result};
