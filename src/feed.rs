//! External catalog client.
//!
//! The feed is a read-only JSON API (`GET /products`, `GET /products/{id}`)
//! serving decimal-dollar prices; [`FeedItem`] deserialization converts them
//! to cents. Transport errors are returned to the caller, which decides how
//! to degrade.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::aggregates::FeedItem;

#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed answered with a non-success status.
    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait ProductFeed: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<FeedItem>, FeedError>;

    /// `Ok(None)` when the feed has no product with this id.
    async fn fetch_one(&self, id: u64) -> Result<Option<FeedItem>, FeedError>;
}

/// Feed client over HTTP. Every request is bounded by the configured timeout.
#[derive(Clone)]
pub struct HttpProductFeed {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpProductFeed {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn get_text(&self, path: &str) -> Result<(reqwest::StatusCode, String), FeedError> {
        let response = self.client.get(self.endpoint(path)).send().await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }
}

#[async_trait]
impl ProductFeed for HttpProductFeed {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<FeedItem>, FeedError> {
        let (status, body) = self.get_text("products").await?;
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        parse_catalog(&body)
    }

    #[instrument(skip(self))]
    async fn fetch_one(&self, id: u64) -> Result<Option<FeedItem>, FeedError> {
        let (status, body) = self.get_text(&format!("products/{id}")).await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        parse_single(&body)
    }
}

/// Parses the list endpoint. Items that do not fit the expected shape are
/// skipped so one bad record cannot empty the whole feed.
fn parse_catalog(body: &str) -> Result<Vec<FeedItem>, FeedError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let total = raw.len();
    let items: Vec<FeedItem> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<FeedItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "Skipping malformed feed item");
                None
            }
        })
        .collect();
    debug!(total, kept = items.len(), "Parsed external feed");
    Ok(items)
}

/// The feed answers unknown ids with `200` and an empty body.
fn parse_single(body: &str) -> Result<Option<FeedItem>, FeedError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id":1,"title":"Fjallraven Backpack","price":109.95,"description":"Your perfect pack","category":"men's clothing","image":"https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg","rating":{"rate":3.9,"count":120}},
        {"id":"broken"},
        {"id":2,"title":"Mens Casual T-Shirt","price":22.3,"description":"Slim fit","category":"men's clothing","image":"https://fakestoreapi.com/img/71-3HjGNDUL.jpg","rating":{"rate":4.1,"count":259}}
    ]"#;

    #[test]
    fn test_parse_catalog_skips_malformed() {
        let items = parse_catalog(CATALOG).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price.cents(), 10995);
        assert_eq!(items[1].price.cents(), 2230);
    }

    #[test]
    fn test_parse_catalog_rejects_non_array() {
        assert!(matches!(parse_catalog("{\"message\":\"down\"}"), Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_parse_single_empty_body_is_not_found() {
        assert!(parse_single("").unwrap().is_none());
        assert!(parse_single("  null ").unwrap().is_none());
        let one = parse_single(r#"{"id":5,"title":"Ring","price":695,"image":"https://x.io/r.jpg"}"#).unwrap().unwrap();
        assert_eq!(one.id, 5);
        assert_eq!(one.price.cents(), 69500);
        assert!(one.rating.is_none());
    }

    /// Serves `/products/:id` locally: 1 exists, 2 is an empty `200`, 404 and 503 answer with that status.
    async fn local_feed() -> HttpProductFeed {
        use axum::extract::Path;
        use axum::http::StatusCode;
        use axum::response::IntoResponse;
        use axum::routing::get;

        async fn product(Path(id): Path<u64>) -> axum::response::Response {
            match id {
                1 => axum::Json(serde_json::json!({ "id": 1, "title": "Backpack", "price": 109.95 })).into_response(),
                2 => StatusCode::OK.into_response(),
                503 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
                _ => StatusCode::NOT_FOUND.into_response(),
            }
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().route("/products/:id", get(product));
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        HttpProductFeed::new(Url::parse(&format!("http://{addr}")).unwrap(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_one_status_mapping() {
        let feed = local_feed().await;
        let found = feed.fetch_one(1).await.unwrap().unwrap();
        assert_eq!(found.price.cents(), 10995);
        assert!(feed.fetch_one(2).await.unwrap().is_none());
        assert!(feed.fetch_one(404).await.unwrap().is_none());
        assert!(matches!(
            feed.fetch_one(503).await,
            Err(FeedError::Status(status)) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let feed = HttpProductFeed::new(Url::parse("https://fakestoreapi.com/").unwrap(), Duration::from_secs(1)).unwrap();
        assert_eq!(feed.endpoint("products/3"), "https://fakestoreapi.com/products/3");
        let feed = HttpProductFeed::new(Url::parse("http://localhost:9000/api").unwrap(), Duration::from_secs(1)).unwrap();
        assert_eq!(feed.endpoint("products"), "http://localhost:9000/api/products");
    }
}
