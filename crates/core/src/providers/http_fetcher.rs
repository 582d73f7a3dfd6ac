use async_trait::async_trait;
use reqwest::{Client, Method};
use std::collections::BTreeMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::asset::{AssetRequest, AssetResponse};
use super::traits::AssetFetcher;

/// Fetches assets over HTTP(S) with reqwest.
///
/// Root-relative URLs ("/styles.css") are resolved against `origin`.
/// No retries; the client's own timeout is the only deadline.
pub struct HttpFetcher {
    client: Client,
    origin: String,
}

impl HttpFetcher {
    pub fn new(origin: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a request.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{url}", self.origin)
        } else {
            url.to_string()
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AssetFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CoreError> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            CoreError::Network(format!("Invalid method '{}': {e}", request.method))
        })?;
        let url = self.resolve(&request.url);

        let resp = self.client.request(method, &url).send().await?;

        let status = resp.status().as_u16();
        let headers: BTreeMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let body = resp.bytes().await?.to_vec();

        Ok(AssetResponse {
            status,
            headers,
            body,
        })
    }
}
