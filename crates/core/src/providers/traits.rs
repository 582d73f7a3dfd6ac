use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::{AssetRequest, AssetResponse};

/// Trait abstraction over the network the asset cache sits in front of.
///
/// The production implementation is [`super::http_fetcher::HttpFetcher`];
/// tests plug in an in-memory network. An `Err` means the request never got
/// a response (offline, DNS, TLS, timeout). A 404 or 500 is still `Ok`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AssetFetcher: Send + Sync {
    /// Human-readable name of this fetcher (for logs/errors).
    fn name(&self) -> &str;

    /// Perform the request against the network.
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CoreError>;
}

/// Work run when the host fires the background sync event.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SyncTask: Send + Sync {
    async fn run(&self) -> Result<(), CoreError>;
}

/// Default background sync: nothing to synchronize yet.
pub struct NoopSync;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SyncTask for NoopSync {
    async fn run(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
