//! Page retrieval
//!
//! This module turns user input into an absolute URL and retrieves the HTML
//! of that page over HTTP with a fixed client identity.

pub mod client;
pub mod normalize;

pub use client::{FetchedPage, PageFetcher};
pub use normalize::{is_absolute_url, normalize_url, resolve_against};
