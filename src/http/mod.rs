//! HTTP transport module
//!
//! The pagination and decoding core only ever talks to a [`Transport`]. This
//! module defines that seam and ships the default implementation, an
//! [`HttpClient`] built on reqwest.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connect errors are retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **API token**: Sent as `Authorization: APIKey <token>` on every request

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{RawResponse, Transport};
