//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::http::{RawResponse, Transport};
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Scripted transport
// ============================================================================

/// Serves canned bodies per URL and records every requested URL
#[derive(Default)]
struct ScriptedTransport {
    responses: HashMap<String, std::result::Result<JsonValue, u16>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn page(mut self, url: &str, body: JsonValue) -> Self {
        self.responses.insert(url.to_string(), Ok(body));
        self
    }

    fn failure(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Err(status));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        _body: Option<&JsonValue>,
    ) -> Result<RawResponse> {
        assert_eq!(method, Method::GET);
        self.requested.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(RawResponse::new(200, serde_json::to_vec(body).unwrap())),
            Some(Err(status)) => Err(Error::http_status(*status, "scripted failure")),
            None => Err(Error::http_status(404, format!("no script for {url}"))),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: String,
}

fn pager(transport: &Arc<ScriptedTransport>, url: &str) -> Pager<LinkedPage<Item>> {
    let transport: Arc<dyn Transport> = transport.clone();
    Pager::start(transport, url, LinkedPage::from_response)
}

fn linked_body(ids: &[&str], next: Option<&str>) -> JsonValue {
    let results: Vec<JsonValue> = ids.iter().map(|id| json!({"id": id})).collect();
    let links: Vec<JsonValue> = next
        .map(|href| vec![json!({"href": href, "rel": "next"})])
        .unwrap_or_default();
    json!({"results": results, "links": links})
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

// ============================================================================
// Link extraction
// ============================================================================

#[test]
fn test_extract_next_url_finds_next_among_other_relations() {
    let links = vec![
        Link::new("self", "/x?page=1"),
        Link::new("prev", "/x?page=0"),
        Link::new("next", "/x?page=2"),
        Link::new("next", "/x?page=3"),
    ];
    assert_eq!(extract_next_url(&links), Some("/x?page=2".to_string()));
}

#[test]
fn test_extract_next_url_none() {
    assert_eq!(extract_next_url(&[]), None);
    assert_eq!(extract_next_url(&[Link::new("self", "/x")]), None);
    assert_eq!(extract_next_url(&[Link::new("next", "")]), None);
    assert_eq!(extract_next_url(&[Link::new("NEXT", "/x")]), None);
}

#[test]
fn test_extract_links_absent_or_null() {
    assert!(extract_links(&json!({"results": []})).unwrap().is_empty());
    assert!(extract_links(&json!({"links": null})).unwrap().is_empty());
}

#[test]
fn test_extract_links_tolerates_partial_entries() {
    let links = extract_links(&json!({"links": [{"rel": "next"}, {"href": "/y"}]})).unwrap();
    assert_eq!(links, vec![Link::new("next", ""), Link::new("", "/y")]);
    assert_eq!(extract_next_url(&links), None);
}

#[test]
fn test_extract_links_malformed_is_decode_error() {
    let err = extract_links(&json!({"links": "next=/x"})).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));

    let err = extract_links(&json!({"links": [{"href": 5, "rel": "next"}]})).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

// ============================================================================
// LinkedPage
// ============================================================================

#[test]
fn test_linked_page_empty_results() {
    let page: LinkedPage<Item> =
        LinkedPage::from_response(RawResponse::new(200, r#"{"results": [], "links": []}"#))
            .unwrap();

    assert!(page.extract().unwrap().is_empty());
    assert!(page.is_empty().unwrap());
    assert_eq!(page.next_page_url().unwrap(), None);
}

#[test]
fn test_linked_page_keeps_raw_bytes() {
    let raw = r#"{"results": [{"id": "a"}]}"#;
    let page: LinkedPage<Item> = LinkedPage::from_response(RawResponse::new(200, raw)).unwrap();

    assert_eq!(page.raw().as_ref(), raw.as_bytes());
    assert_eq!(page.body()["results"][0]["id"], "a");
    assert!(!page.is_empty().unwrap());
}

#[test]
fn test_linked_page_custom_collection_key() {
    let response = RawResponse::new(200, r#"{"items": [{"id": "z"}]}"#);
    let page: LinkedPage<Item> = LinkedPage::with_collection_key(response, "items").unwrap();

    assert_eq!(page.collection_key(), "items");
    assert_eq!(ids(&page.extract().unwrap()), vec!["z"]);
}

#[test]
fn test_linked_page_malformed_body() {
    let result = LinkedPage::<Item>::from_response(RawResponse::new(200, "<html>"));
    assert!(matches!(result, Err(Error::JsonParse(_))));
}

// ============================================================================
// Pager
// ============================================================================

#[tokio::test]
async fn test_two_page_scenario() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page(
                "/x",
                json!({"results": [{"id": "a"}], "links": [{"href": "/x?page=2", "rel": "next"}]}),
            )
            .page("/x?page=2", json!({"results": [{"id": "b"}], "links": []})),
    );

    let items = pager(&transport, "/x").all_pages().await.unwrap();

    assert_eq!(items, vec![Item { id: "a".into() }, Item { id: "b".into() }]);
    assert_eq!(transport.requested(), vec!["/x", "/x?page=2"]);
}

#[tokio::test]
async fn test_relative_links_resolve_against_page_url() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page(
                "https://api.example.com/cloud/v1/regions",
                linked_body(&["a"], Some("/cloud/v1/regions?page=2")),
            )
            .page(
                "https://api.example.com/cloud/v1/regions?page=2",
                linked_body(&["b"], Some("?page=3")),
            )
            .page(
                "https://api.example.com/cloud/v1/regions?page=3",
                linked_body(&["c"], Some("https://other.example.com/v1/regions?page=4")),
            )
            .page("https://other.example.com/v1/regions?page=4", linked_body(&[], None)),
    );

    let items = pager(&transport, "https://api.example.com/cloud/v1/regions")
        .all_pages()
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(
        transport.requested(),
        vec![
            "https://api.example.com/cloud/v1/regions",
            "https://api.example.com/cloud/v1/regions?page=2",
            "https://api.example.com/cloud/v1/regions?page=3",
            "https://other.example.com/v1/regions?page=4",
        ]
    );
}

#[tokio::test]
async fn test_n_pages_visited_in_order() {
    let mut transport = ScriptedTransport::new();
    for n in 1..=5 {
        let url = format!("/c?p={n}");
        let next = (n < 5).then(|| format!("/c?p={}", n + 1));
        let body = linked_body(&[&format!("{n}-1"), &format!("{n}-2")], next.as_deref());
        transport = transport.page(&url, body);
    }
    let transport = Arc::new(transport);

    let items = pager(&transport, "/c?p=1").all_pages().await.unwrap();

    assert_eq!(items.len(), 10);
    assert_eq!(items[0].id, "1-1");
    assert_eq!(items[1].id, "1-2");
    assert_eq!(items[9].id, "5-2");
    assert_eq!(
        transport.requested(),
        vec!["/c?p=1", "/c?p=2", "/c?p=3", "/c?p=4", "/c?p=5"]
    );
}

#[tokio::test]
async fn test_next_page_state_machine() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("/r", linked_body(&["a"], Some("/r?2")))
            .page("/r?2", linked_body(&[], None)),
    );
    let mut pager = pager(&transport, "/r");
    assert_eq!(pager.state(), PagerState::Start);
    assert_eq!(pager.base_url(), "/r");

    let first = pager.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&first.extract().unwrap()), vec!["a"]);
    assert_eq!(pager.state(), PagerState::HasResults);

    let second = pager.next_page().await.unwrap().unwrap();
    assert!(second.is_empty().unwrap());
    assert_eq!(pager.state(), PagerState::Done);

    assert!(pager.next_page().await.unwrap().is_none());
    assert!(pager.next_page().await.unwrap().is_none());
    assert_eq!(pager.pages_fetched(), 2);
    assert_eq!(transport.requested().len(), 2);
}

#[tokio::test]
async fn test_single_page_without_links() {
    let transport = Arc::new(ScriptedTransport::new().page("/one", json!({"results": [{"id": "only"}]})));

    let items = pager(&transport, "/one").all_pages().await.unwrap();
    assert_eq!(ids(&items), vec!["only"]);
}

#[tokio::test]
async fn test_fetch_failure_fails_whole_traversal() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("/f", linked_body(&["a"], Some("/f?2")))
            .page("/f?2", linked_body(&["b"], Some("/f?3")))
            .failure("/f?3", 503)
            .page("/f?4", linked_body(&["d"], None)),
    );

    let result = pager(&transport, "/f").all_pages().await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 503, .. })));
    assert_eq!(transport.requested(), vec!["/f", "/f?2", "/f?3"]);
}

#[tokio::test]
async fn test_failed_pager_stays_failed() {
    let transport = Arc::new(ScriptedTransport::new().failure("/bad", 500));
    let mut pager = pager(&transport, "/bad");

    assert!(pager.next_page().await.is_err());
    assert_eq!(pager.state(), PagerState::Failed);
    assert!(pager.next_page().await.is_err());
    assert_eq!(transport.requested().len(), 1);
}

#[tokio::test]
async fn test_decode_failure_is_terminal() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("/d", linked_body(&["a"], Some("/d?2")))
            .page("/d?2", json!({"results": [{"name": "no id"}], "links": []})),
    );

    let err = pager(&transport, "/d").all_pages().await.unwrap_err();
    assert!(err.to_string().contains("missing field `id`"), "{err}");
}

#[tokio::test]
async fn test_malformed_links_are_terminal() {
    let transport = Arc::new(
        ScriptedTransport::new().page("/m", json!({"results": [{"id": "a"}], "links": {"next": "/m?2"}})),
    );
    let mut pager = pager(&transport, "/m");

    let err = pager.next_page().await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert_eq!(pager.state(), PagerState::Failed);
}

#[tokio::test]
async fn test_into_stream_yields_pages_then_ends() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("/s", linked_body(&["a", "b"], Some("/s?2")))
            .page("/s?2", linked_body(&["c"], None)),
    );

    let pages: Vec<_> = pager(&transport, "/s").into_stream().collect().await;

    assert_eq!(pages.len(), 2);
    let second = pages[1].as_ref().unwrap();
    assert_eq!(ids(&second.extract().unwrap()), vec!["c"]);
}

#[tokio::test]
async fn test_into_stream_stops_after_error() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("/e", linked_body(&["a"], Some("/e?2")))
            .failure("/e?2", 502),
    );

    let pages: Vec<_> = pager(&transport, "/e").into_stream().collect().await;

    assert_eq!(pages.len(), 2);
    assert!(pages[0].is_ok());
    assert!(pages[1].is_err());
}
