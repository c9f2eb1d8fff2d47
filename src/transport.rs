use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::{GlosaError, Result};

/// Raw answer of the dictionary site
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text. Pages are served either as UTF-8 or in a single-byte
    /// Latin encoding; bytes that are not valid UTF-8 are mapped one-to-one to
    /// the Latin-1 code points.
    pub fn text(&self) -> String {
        match std::str::from_utf8(&self.body) {
            Ok(text) => text.to_string(),
            Err(_) => self.body.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Fetches documents from the dictionary site
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// reqwest-backed transport with an explicit timeout
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(GlosaError::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GlosaError::Fetch(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| GlosaError::Fetch(format!("Failed to read response body: {}", e)))?
            .to_vec();

        debug!("Received {} bytes with status {}", body.len(), status);
        Ok(FetchResponse { status, body })
    }
}
