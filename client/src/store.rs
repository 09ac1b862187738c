use std::future::Future;

use meadow_shared::{CreateFlower, Flower, XRange};
use serde::Deserialize;
use thiserror::Error;

pub const FLOWERS_ENDPOINT: &str = "/api/flowers";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("flower not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("fetch error: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Decode(String),
}

/// The flower store the meadow reads from and plants into.
pub trait FlowerStore {
    fn list(&self, filter: Option<XRange>) -> impl Future<Output = Result<Vec<Flower>, StoreError>>;

    fn create(&self, input: CreateFlower) -> impl Future<Output = Result<Flower, StoreError>>;

    fn get_by_slug(&self, slug: &str) -> impl Future<Output = Result<Flower, StoreError>>;
}

/// `FlowerStore` over the server's JSON API.
#[derive(Debug, Clone, Default)]
pub struct HttpStore {
    base: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpStore {
    /// `base` is prepended to API paths; empty means same origin.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn flowers_url(&self, filter: Option<XRange>) -> String {
        let query = filter.map(|range| range.to_query()).unwrap_or_default();
        if query.is_empty() {
            format!("{}{FLOWERS_ENDPOINT}", self.base)
        } else {
            format!("{}{FLOWERS_ENDPOINT}?{query}", self.base)
        }
    }

    fn flower_url(&self, slug: &str) -> String {
        format!("{}{FLOWERS_ENDPOINT}/{slug}", self.base)
    }
}

async fn error_message(resp: gloo_net::http::Response) -> String {
    match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {}", resp.status()),
    }
}

impl FlowerStore for HttpStore {
    async fn list(&self, filter: Option<XRange>) -> Result<Vec<Flower>, StoreError> {
        let resp = gloo_net::http::Request::get(&self.flowers_url(filter))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !resp.ok() {
            return Err(StoreError::Status(resp.status()));
        }

        resp.json::<Vec<Flower>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn create(&self, input: CreateFlower) -> Result<Flower, StoreError> {
        let resp = gloo_net::http::Request::post(&self.flowers_url(None))
            .json(&input)
            .map_err(|e| StoreError::Decode(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        match resp.status() {
            409 => return Err(StoreError::Conflict(error_message(resp).await)),
            422 => return Err(StoreError::Validation(error_message(resp).await)),
            _ if !resp.ok() => return Err(StoreError::Status(resp.status())),
            _ => {}
        }

        resp.json::<Flower>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Flower, StoreError> {
        let resp = gloo_net::http::Request::get(&self.flower_url(slug))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        match resp.status() {
            404 => return Err(StoreError::NotFound),
            _ if !resp.ok() => return Err(StoreError::Status(resp.status())),
            _ => {}
        }

        resp.json::<Flower>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}
