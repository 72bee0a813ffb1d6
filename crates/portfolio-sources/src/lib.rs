//! Upstream adapters.
//!
//! Each adapter exposes one `fetch_*` function built on
//! [`portfolio_core::fetch_with_fallback`]: it never fails, and the returned
//! [`portfolio_core::Sourced`] says whether the data is live.

pub mod client;
pub mod github;
pub mod learning;
pub mod leetcode;
pub mod medium;
pub mod spotify;

pub use client::build_client;
