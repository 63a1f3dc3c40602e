use async_trait::async_trait;
use reqwest::{StatusCode, Url};

#[derive(Debug, thiserror::Error)]
#[error("request to {url} failed: {source}")]
pub struct TransportError {
    pub url: Url,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Sends one GET per command. The response body is never read.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url) -> Result<StatusCode, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<StatusCode, TransportError> {
        match self.client.get(url.clone()).send().await {
            Ok(response) => Ok(response.status()),
            Err(e) => Err(TransportError {
                url,
                source: Box::new(e),
            }),
        }
    }
}
