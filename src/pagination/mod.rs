//! Pagination module
//!
//! Link-following traversal over collection endpoints.
//!
//! # Overview
//!
//! Collection responses carry their resources under `results` and a list of
//! hyperlinks under `links`. The server decides page size and cursor; the
//! client only ever dereferences the `rel: "next"` link it was handed. A
//! [`Pager`] drives one traversal: it fetches the base URL, wraps each body in
//! a resource-specific [`Page`], asks that page for the next URL and stops when
//! there is none.

mod pager;
mod types;

pub use pager::{Pager, PagerState};
pub use types::{extract_links, extract_next_url, LinkedPage, Link, Page, NEXT_REL};

#[cfg(test)]
mod tests;
