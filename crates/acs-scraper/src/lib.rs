//! Scraping, normalization and fallback pipeline for ACS content.
//!
//! [`AcsService`] is the entry point. Each extractor it exposes fetches one
//! upstream page, parses it into the records in [`acs_core`], and degrades
//! from live data to the disk cache and then to the bundled local dataset.

pub mod client;
pub mod detail;
pub mod disk_cache;
mod dom;
pub mod error;
mod fallback;
pub mod home;
mod image;
pub mod matches;
mod retry;
pub mod sanitize;
pub mod service;
pub mod slot;
pub mod standings;
pub mod text;
pub mod warn_once;

pub use client::{AcsClient, ClientOptions, FetchOptions};
pub use disk_cache::DiskCache;
pub use error::AcsError;
pub use image::MIN_FEATURED_WIDTH;
pub use sanitize::Sanitizer;
pub use service::{AcsService, Provenance, ServiceParts, WarmEntry, WarmReport};
pub use slot::Tier;
pub use warn_once::WarnOnce;
