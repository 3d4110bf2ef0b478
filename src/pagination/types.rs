//! Pagination types and traits
//!
//! Defines the page abstraction the [`Pager`](super::Pager) drives and the
//! default link-based page used by every resource family.

use crate::error::{Error, Result};
use crate::extract::{extract_many, DEFAULT_COLLECTION_KEY};
use crate::http::RawResponse;
use crate::types::JsonValue;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Relation of the link the pager follows
pub const NEXT_REL: &str = "next";

/// Field under which collection responses list their links
const LINKS_KEY: &str = "links";

/// A hyperlink attached to a collection page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Link {
    /// Target URL
    #[serde(default)]
    pub href: String,
    /// Relation, e.g. `next`
    #[serde(default)]
    pub rel: String,
}

impl Link {
    /// Create a link
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
        }
    }
}

/// One fetched page of a collection.
///
/// Implementations decide where links and resources live in the body; the
/// pager only needs the next URL and the extracted items.
pub trait Page: Sized + Send {
    /// Resource type carried by the page
    type Item: DeserializeOwned;

    /// URL of the following page, or `None` on the last page
    fn next_page_url(&self) -> Result<Option<String>>;

    /// Decode the resources on this page, in server order
    fn extract(&self) -> Result<Vec<Self::Item>>;

    /// Whether the page carries no resources
    fn is_empty(&self) -> Result<bool> {
        Ok(self.extract()?.is_empty())
    }
}

/// Read the `links` list of a collection body.
///
/// An absent or `null` field is an empty list. Anything other than a list of
/// link objects is a decode error.
pub fn extract_links(body: &JsonValue) -> Result<Vec<Link>> {
    match body.get(LINKS_KEY) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(links) => Vec::<Link>::deserialize(links)
            .map_err(|e| Error::decode("links", e.to_string())),
    }
}

/// Find the target of the first `rel: "next"` link.
///
/// A next link with an empty `href` ends the traversal like a missing one.
pub fn extract_next_url(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|link| link.rel == NEXT_REL)
        .map(|link| link.href.trim())
        .filter(|href| !href.is_empty())
        .map(ToString::to_string)
}

/// The default page: resources under a collection key, links under `links`
pub struct LinkedPage<T> {
    raw: Bytes,
    body: JsonValue,
    collection_key: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> LinkedPage<T> {
    /// Wrap a fetched response, reading resources from `results`
    pub fn from_response(response: RawResponse) -> Result<Self> {
        Self::with_collection_key(response, DEFAULT_COLLECTION_KEY)
    }

    /// Wrap a fetched response, reading resources from a custom key
    pub fn with_collection_key(response: RawResponse, key: impl Into<String>) -> Result<Self> {
        let body = response.json()?;
        Ok(Self {
            raw: response.body,
            body,
            collection_key: key.into(),
            _item: PhantomData,
        })
    }

    /// Decoded body of the page
    pub fn body(&self) -> &JsonValue {
        &self.body
    }

    /// Raw bytes as received
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Collection key resources are read from
    pub fn collection_key(&self) -> &str {
        &self.collection_key
    }

    /// All links on the page, including non-`next` relations
    pub fn links(&self) -> Result<Vec<Link>> {
        extract_links(&self.body)
    }
}

impl<T: DeserializeOwned> Page for LinkedPage<T> {
    type Item = T;

    fn next_page_url(&self) -> Result<Option<String>> {
        Ok(extract_next_url(&self.links()?))
    }

    fn extract(&self) -> Result<Vec<T>> {
        extract_many(&self.body, &self.collection_key)
    }
}

impl<T> std::fmt::Debug for LinkedPage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedPage")
            .field("collection_key", &self.collection_key)
            .field("bytes", &self.raw.len())
            .finish_non_exhaustive()
    }
}
