use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use std::time::Duration;

use crate::catalog::Endpoints;
use crate::error::FetchError;
use crate::types::{DetailPayload, DetailRecord, ListPage};

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .user_agent(concat!("pokeview/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client")
    })
}

/// Remote catalog seen by the fetch worker
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one listing page from an absolute URL
    async fn list_page(&self, url: &str) -> Result<ListPage, FetchError>;

    /// Fetch the full record for `id` (numeric id or name)
    async fn detail(&self, id: &str) -> Result<DetailRecord, FetchError>;
}

/// PokéAPI over HTTPS
pub struct HttpCatalog {
    endpoints: Endpoints,
    timeout: Duration,
}

impl HttpCatalog {
    pub fn new(endpoints: Endpoints, timeout_ms: u64) -> Self {
        Self {
            endpoints,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        log::debug!("[api] GET {url}");
        let res = http_client().get(url).timeout(self.timeout).send().await?;

        let status = res.status();
        if !status.is_success() {
            log::warn!("[api] {url} -> {status}");
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn list_page(&self, url: &str) -> Result<ListPage, FetchError> {
        let page: ListPage = self.get_json(url).await?;
        log::info!(
            "[api] list page: {} results (count={}, next={})",
            page.results.len(),
            page.count,
            page.next.is_some()
        );
        Ok(page)
    }

    async fn detail(&self, id: &str) -> Result<DetailRecord, FetchError> {
        let url = self.endpoints.detail_url(id);
        let payload: DetailPayload = self.get_json(&url).await?;
        log::info!("[api] detail #{} {}", payload.id, payload.name);
        Ok(payload.into())
    }
}
