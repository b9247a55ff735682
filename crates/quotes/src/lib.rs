//! Quote service implementations: the HTTP client used in production and a
//! static in-memory service for offline runs and tests.

pub mod client;
pub mod fixture;

pub use client::{HttpQuoteService, QuoteClientError};
pub use fixture::StaticQuoteService;
