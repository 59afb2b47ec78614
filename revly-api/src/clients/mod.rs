//! Upstream review-source API clients

pub mod google;
pub mod hostaway;
