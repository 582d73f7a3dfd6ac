use chrono::Utc;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::errors::CoreError;
use crate::models::asset::{
    AssetRequest, AssetResponse, RequestClass, RequestDestination, ServedResponse,
};
use crate::models::settings::CacheSettings;
use crate::models::worker::{
    ControlMessage, Notification, NotificationAction, NotificationData, VersionReply,
    WorkerState, ACTION_CLOSE, ACTION_EXPLORE, BACKGROUND_SYNC_TAG,
};
use crate::providers::traits::{AssetFetcher, NoopSync, SyncTask};
use crate::storage::cache_storage::CacheStorage;

/// Body served in place of a stylesheet/script/font that is unreachable offline.
pub const OFFLINE_ASSET_PLACEHOLDER: &str = "/* Asset not available offline */";

const NOTIFICATION_TITLE: &str = "All-in-One Calculator";
const NOTIFICATION_DEFAULT_BODY: &str = "New update available!";
const NOTIFICATION_ICON: &str = "/icons/icon-192x192.webp";
const NOTIFICATION_BADGE: &str = "/icons/icon-72x72.webp";

/// Offline asset cache for one version of the application shell.
///
/// Lifecycle: `install` pre-caches the shell into the static partition,
/// `activate` deletes every partition of other versions, and from then on
/// `handle_fetch` serves requests:
///
/// - **documents**: cache first, network next, the offline document last.
/// - **styles, scripts, images, fonts**: cache first, network next, then a
///   placeholder (empty 404 for images, an empty stylesheet otherwise).
/// - **everything else**: network first, cache as fallback.
///
/// Successful (200) network responses are upserted into the dynamic
/// partition. The dynamic partition is never pruned within an epoch.
///
/// Entries are keyed by root-relative path: an absolute URL on the configured
/// origin matches the entry stored for its path.
///
/// Storage is shared: a previous epoch keeps serving from its partitions
/// until this one activates.
pub struct OfflineAssetCache {
    settings: CacheSettings,
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn AssetFetcher>,
    sync_task: Arc<dyn SyncTask>,
    state: WorkerState,
    skip_waiting: bool,
}

impl OfflineAssetCache {
    pub fn new(
        settings: CacheSettings,
        storage: Arc<CacheStorage>,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Self {
        let skip_waiting = settings.skip_waiting_on_install;
        Self {
            settings,
            storage,
            fetcher,
            sync_task: Arc::new(NoopSync),
            state: WorkerState::Parsed,
            skip_waiting,
        }
    }

    /// Replace the background sync task (default: no-op).
    pub fn with_sync_task(mut self, task: Arc<dyn SyncTask>) -> Self {
        self.sync_task = task;
        self
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    /// Version tag reported to the page: the static partition name.
    pub fn version(&self) -> String {
        self.settings.static_partition()
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Fetch every declared shell asset and store them in the static partition.
    ///
    /// All-or-nothing: if any asset fails to fetch or answers with a non-2xx
    /// status, nothing is written and this epoch becomes redundant.
    pub async fn install(&mut self) -> Result<(), CoreError> {
        if self.state != WorkerState::Parsed {
            return Err(CoreError::InvalidState(format!(
                "cannot install from state '{}'",
                self.state
            )));
        }
        self.state = WorkerState::Installing;
        log::info!("Asset cache {}: installing", self.version());

        let assets = self.settings.static_assets.clone();
        let mut fetched = Vec::with_capacity(assets.len());
        for url in &assets {
            let request = AssetRequest::for_url(url.clone());
            match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => fetched.push((request, response)),
                Ok(response) => {
                    return Err(self.fail_install(url, format!("HTTP status {}", response.status)));
                }
                Err(e) => return Err(self.fail_install(url, e.to_string())),
            }
        }

        let partition = self.storage.open(&self.settings.static_partition());
        for (request, response) in fetched {
            partition.put(&self.keyed(&request), response);
        }
        log::info!(
            "Asset cache {}: {} static file(s) cached",
            self.version(),
            partition.len()
        );

        self.state = WorkerState::Installed;
        if self.skip_waiting {
            self.activate()?;
        }
        Ok(())
    }

    /// Take over: delete every partition that does not belong to this epoch.
    /// Returns the deleted partition names.
    pub fn activate(&mut self) -> Result<Vec<String>, CoreError> {
        if self.state != WorkerState::Installed {
            return Err(CoreError::InvalidState(format!(
                "cannot activate from state '{}'",
                self.state
            )));
        }
        self.state = WorkerState::Activating;
        log::info!("Asset cache {}: activating", self.version());

        let keep = [
            self.settings.static_partition(),
            self.settings.dynamic_partition(),
        ];
        let mut deleted = Vec::new();
        for name in self.storage.names() {
            if !keep.contains(&name) && self.storage.delete(&name) {
                log::info!("Asset cache {}: deleted old partition {name}", self.version());
                deleted.push(name);
            }
        }

        self.state = WorkerState::Activated;
        Ok(deleted)
    }

    fn fail_install(&mut self, asset: &str, reason: String) -> CoreError {
        log::error!(
            "Asset cache {}: install failed on {asset}: {reason}",
            self.version()
        );
        self.state = WorkerState::Redundant;
        CoreError::CacheInstallFailure {
            asset: asset.to_string(),
            reason,
        }
    }

    // ── Control messages ────────────────────────────────────────────

    /// Handle a message posted by the page. `GetVersion` answers on `reply`.
    pub fn handle_message(
        &mut self,
        message: ControlMessage,
        reply: Option<oneshot::Sender<VersionReply>>,
    ) -> Result<(), CoreError> {
        log::debug!("Asset cache {}: message {message:?}", self.version());
        match message {
            ControlMessage::SkipWaiting => {
                self.skip_waiting = true;
                if self.state == WorkerState::Installed {
                    self.activate()?;
                }
            }
            ControlMessage::GetVersion => {
                if let Some(port) = reply {
                    let version = VersionReply {
                        version: self.version(),
                    };
                    if port.send(version).is_err() {
                        log::debug!("Version requested but the reply channel was closed");
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse a JSON message (`{"type": "SKIP_WAITING"}`) and handle it.
    pub fn handle_message_json(
        &mut self,
        json: &str,
        reply: Option<oneshot::Sender<VersionReply>>,
    ) -> Result<(), CoreError> {
        let message: ControlMessage = serde_json::from_str(json)?;
        self.handle_message(message, reply)
    }

    // ── Fetch routing ───────────────────────────────────────────────

    /// Answer an outbound request.
    ///
    /// Only fails once every fallback is exhausted. Non-GET requests and
    /// requests made before activation go straight to the network.
    pub async fn handle_fetch(&self, request: &AssetRequest) -> Result<ServedResponse, CoreError> {
        if !request.is_get() || self.state != WorkerState::Activated {
            return self.pass_through(request).await;
        }

        match request.destination.class() {
            RequestClass::Navigation => self.serve_document(request).await,
            RequestClass::StaticAsset => self.serve_static_asset(request).await,
            RequestClass::Other => self.serve_network_first(request).await,
        }
    }

    async fn pass_through(&self, request: &AssetRequest) -> Result<ServedResponse, CoreError> {
        self.fetcher
            .fetch(request)
            .await
            .map(ServedResponse::from_network)
            .map_err(|e| Self::fetch_failure(request, e))
    }

    async fn serve_document(&self, request: &AssetRequest) -> Result<ServedResponse, CoreError> {
        if let Some(cached) = self.lookup(request) {
            log::debug!("Serving document from cache: {}", request.url);
            return Ok(ServedResponse::from_cache(cached));
        }

        log::debug!("Fetching document from network: {}", request.url);
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_dynamic(request, &response);
                Ok(ServedResponse::from_network(response))
            }
            Err(e) => {
                let offline = AssetRequest::navigate(self.settings.offline_document.clone());
                match self.lookup(&offline) {
                    Some(shell) => {
                        log::warn!("Offline, serving {} for {}", offline.url, request.url);
                        Ok(ServedResponse::fallback(shell))
                    }
                    None => Err(Self::fetch_failure(request, e)),
                }
            }
        }
    }

    async fn serve_static_asset(
        &self,
        request: &AssetRequest,
    ) -> Result<ServedResponse, CoreError> {
        if let Some(cached) = self.lookup(request) {
            log::debug!("Serving static asset from cache: {}", request.url);
            return Ok(ServedResponse::from_cache(cached));
        }

        log::debug!("Fetching static asset from network: {}", request.url);
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_dynamic(request, &response);
                Ok(ServedResponse::from_network(response))
            }
            Err(e) => {
                log::warn!("Static asset unavailable offline: {} ({e})", request.url);
                let placeholder = if request.destination == RequestDestination::Image {
                    AssetResponse::new(404, Vec::new())
                } else {
                    AssetResponse::ok(OFFLINE_ASSET_PLACEHOLDER)
                        .with_header("content-type", "text/css")
                };
                Ok(ServedResponse::fallback(placeholder))
            }
        }
    }

    async fn serve_network_first(
        &self,
        request: &AssetRequest,
    ) -> Result<ServedResponse, CoreError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_dynamic(request, &response);
                Ok(ServedResponse::from_network(response))
            }
            Err(e) => match self.lookup(request) {
                Some(cached) => {
                    log::debug!("Network failed, serving from cache: {}", request.url);
                    Ok(ServedResponse::from_cache(cached))
                }
                None => Err(Self::fetch_failure(request, e)),
            },
        }
    }

    /// Request as stored: same-origin URLs become root-relative paths.
    fn keyed(&self, request: &AssetRequest) -> AssetRequest {
        request.relative_to(&self.settings.origin)
    }

    /// Search this epoch's partitions: static first, then dynamic.
    fn lookup(&self, request: &AssetRequest) -> Option<AssetResponse> {
        let static_name = self.settings.static_partition();
        let dynamic_name = self.settings.dynamic_partition();
        self.storage.match_request(
            &self.keyed(request),
            &[static_name.as_str(), dynamic_name.as_str()],
        )
    }

    fn store_dynamic(&self, request: &AssetRequest, response: &AssetResponse) {
        if response.is_cacheable() {
            self.storage
                .open(&self.settings.dynamic_partition())
                .put(&self.keyed(request), response.clone());
        }
    }

    fn fetch_failure(request: &AssetRequest, e: CoreError) -> CoreError {
        CoreError::CacheFetchFailure {
            url: request.url.clone(),
            reason: e.to_string(),
        }
    }

    // ── Background sync & notifications ─────────────────────────────

    /// Run the sync task for the background sync tag. Task errors are logged,
    /// never returned. Returns whether the tag was recognized.
    pub async fn handle_sync(&self, tag: &str) -> bool {
        log::info!("Asset cache {}: background sync '{tag}'", self.version());
        if tag != BACKGROUND_SYNC_TAG {
            return false;
        }
        if let Err(e) = self.sync_task.run().await {
            log::error!("Background sync failed: {e}");
        }
        true
    }

    /// Notification to show for a push message.
    pub fn push_notification(&self, payload: Option<&str>) -> Notification {
        let action = |action: &str, title: &str| NotificationAction {
            action: action.to_string(),
            title: title.to_string(),
            icon: NOTIFICATION_BADGE.to_string(),
        };

        Notification {
            title: NOTIFICATION_TITLE.to_string(),
            body: payload.unwrap_or(NOTIFICATION_DEFAULT_BODY).to_string(),
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_BADGE.to_string(),
            vibrate: vec![100, 50, 100],
            data: NotificationData {
                date_of_arrival: Utc::now(),
                primary_key: 1,
            },
            actions: vec![
                action(ACTION_EXPLORE, "Open Calculator"),
                action(ACTION_CLOSE, "Close"),
            ],
        }
    }

    /// URL to open after a notification click, if any.
    pub fn notification_click(&self, action: Option<&str>) -> Option<String> {
        match action {
            Some(ACTION_EXPLORE) => Some("/".to_string()),
            _ => None,
        }
    }
}
