//! Transport seam between the client core and the network

use crate::error::Result;
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use bytes::Bytes;

/// A successful response: status code plus the raw body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code (always 2xx when produced by [`Transport::send`])
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the body carries no bytes (e.g. `204 No Content`)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Parse the body as JSON. An empty body parses as `null`.
    pub fn json(&self) -> Result<JsonValue> {
        if self.is_empty() {
            return Ok(JsonValue::Null);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Something that can perform a request and hand back the response body.
///
/// Implementations own timeouts, retries and authentication. Non-2xx statuses
/// must be reported as errors, never as a `RawResponse`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request
    async fn send(&self, method: Method, url: &str, body: Option<&JsonValue>)
        -> Result<RawResponse>;

    /// GET a URL
    async fn get(&self, url: &str) -> Result<RawResponse> {
        self.send(Method::GET, url, None).await
    }

    /// POST a JSON body
    async fn post(&self, url: &str, body: &JsonValue) -> Result<RawResponse> {
        self.send(Method::POST, url, Some(body)).await
    }

    /// PATCH with a JSON body
    async fn patch(&self, url: &str, body: &JsonValue) -> Result<RawResponse> {
        self.send(Method::PATCH, url, Some(body)).await
    }

    /// DELETE a URL
    async fn delete(&self, url: &str) -> Result<RawResponse> {
        self.send(Method::DELETE, url, None).await
    }
}
