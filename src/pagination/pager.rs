//! Link-following pager

use super::types::Page;
use crate::error::{Error, Result};
use crate::http::{RawResponse, Transport};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::debug;
use url::Url;

type PageFactory<P> = Box<dyn Fn(RawResponse) -> Result<P> + Send + Sync>;

/// Where a traversal stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing fetched yet
    Start,
    /// A fetch is in flight
    Fetching,
    /// The last fetched page pointed at another one
    HasResults,
    /// The last fetched page had no next link
    Done,
    /// A fetch or decode failed; the traversal cannot continue
    Failed,
}

/// Drives one traversal over a linked collection.
///
/// Pages are fetched strictly one after another: the URL of page `n + 1` is
/// only known once page `n` has been decoded. Traversal methods take
/// `&mut self`, so a pager is never shared between callers; start a new one
/// per traversal.
pub struct Pager<P> {
    transport: Arc<dyn Transport>,
    factory: PageFactory<P>,
    base_url: String,
    next_url: Option<String>,
    state: PagerState,
    pages_fetched: usize,
}

impl<P: Page> Pager<P> {
    /// Start a traversal at `base_url`, wrapping each body with `factory`
    pub fn start<F>(transport: Arc<dyn Transport>, base_url: impl Into<String>, factory: F) -> Self
    where
        F: Fn(RawResponse) -> Result<P> + Send + Sync + 'static,
    {
        let base_url = base_url.into();
        Self {
            transport,
            factory: Box::new(factory),
            next_url: Some(base_url.clone()),
            base_url,
            state: PagerState::Start,
            pages_fetched: 0,
        }
    }

    /// URL the traversal started from
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current state of the traversal
    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page.
    ///
    /// The first call fetches the base URL; later calls follow the next link
    /// of the page returned before. Returns `Ok(None)` once a page without a
    /// next link has been returned. Any error is terminal.
    pub async fn next_page(&mut self) -> Result<Option<P>> {
        match self.state {
            PagerState::Done => return Ok(None),
            PagerState::Failed => {
                return Err(Error::Other(format!(
                    "pagination over {} already failed",
                    self.base_url
                )))
            }
            PagerState::Start | PagerState::HasResults | PagerState::Fetching => {}
        }

        let Some(url) = self.next_url.clone() else {
            self.state = PagerState::Done;
            return Ok(None);
        };

        self.state = PagerState::Fetching;
        match self.fetch(&url).await {
            Ok((page, next)) => {
                self.pages_fetched += 1;
                debug!(
                    "Fetched page {} from {} (next: {})",
                    self.pages_fetched,
                    url,
                    next.as_deref().unwrap_or("none")
                );
                self.state = if next.is_some() {
                    PagerState::HasResults
                } else {
                    PagerState::Done
                };
                self.next_url = next;
                Ok(Some(page))
            }
            Err(e) => {
                debug!("Pagination failed on page {} ({}): {}", self.pages_fetched + 1, url, e);
                self.state = PagerState::Failed;
                Err(e)
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<(P, Option<String>)> {
        let response = self.transport.get(url).await?;
        let page = (self.factory)(response)?;
        let next = page
            .next_page_url()?
            .map(|href| resolve_link(url, href))
            .transpose()?;
        Ok((page, next))
    }

    /// Fetch every remaining page and concatenate their resources in order.
    ///
    /// Fails as a whole if any page fails; no partial list is returned.
    pub async fn all_pages(mut self) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.extract()?);
        }
        debug!(
            "Collected {} resources over {} pages from {}",
            items.len(),
            self.pages_fetched,
            self.base_url
        );
        Ok(items)
    }

    /// Turn the traversal into a stream of pages.
    ///
    /// The stream ends after the last page or after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<P>> {
        stream::unfold(Some(self), |pager| async move {
            let mut pager = pager?;
            match pager.next_page().await {
                Ok(Some(page)) => Some((Ok(page), Some(pager))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

impl<P> std::fmt::Debug for Pager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("base_url", &self.base_url)
            .field("next_url", &self.next_url)
            .field("state", &self.state)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}

/// Resolve a link target against the URL of the page that carried it.
///
/// Absolute targets replace the page URL; root-relative and query-only
/// targets are joined to it. When the page URL is itself not absolute there is
/// nothing to resolve against and the target is kept as is.
fn resolve_link(page_url: &str, href: String) -> Result<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Ok(href);
    };
    base.join(&href)
        .map(String::from)
        .map_err(|e| Error::decode("links", format!("invalid next link '{href}': {e}")))
}
