use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::{ACCEPT, ACCEPT_LANGUAGE, ScrapeConfig};
use crate::error::ScrapeError;

/// A fetched HTML page. `url` is where the body actually came from, after redirects.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Source of listing and lookup pages.
#[async_trait::async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, ScrapeError>;
}

/// Fetches pages over HTTP with a fixed browser-like header set.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::HOST,
            HeaderValue::from_str(config.host()).map_err(|_| ScrapeError::InvalidHeader("host"))?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScrapeError::request("build_client", e))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, ScrapeError> {
        debug!(%url, "fetching page");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::request("send", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let final_url = resp.url().clone();
        let body = resp
            .text()
            .await
            .map_err(|e| ScrapeError::request("read_body", e))?;

        Ok(Page {
            url: final_url,
            body,
        })
    }
}
