// ═══════════════════════════════════════════════════════════════════
// Offline Asset Cache Tests — lifecycle, routing, fallbacks,
// control messages, sync and notifications
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use calc_suite_core::errors::CoreError;
use calc_suite_core::models::asset::{
    AssetRequest, AssetResponse, RequestDestination, ResponseSource,
};
use calc_suite_core::models::settings::CacheSettings;
use calc_suite_core::models::worker::{
    ControlMessage, WorkerState, ACTION_CLOSE, ACTION_EXPLORE, BACKGROUND_SYNC_TAG,
};
use calc_suite_core::providers::traits::{AssetFetcher, SyncTask};
use calc_suite_core::services::asset_cache_service::{
    OfflineAssetCache, OFFLINE_ASSET_PLACEHOLDER,
};
use calc_suite_core::storage::cache_storage::CacheStorage;

// ═══════════════════════════════════════════════════════════════════
// Mock Network
// ═══════════════════════════════════════════════════════════════════

/// In-memory network: known URLs answer with their route, unknown URLs
/// with 404, everything fails while offline.
struct MockNetwork {
    online: AtomicBool,
    routes: Mutex<HashMap<String, AssetResponse>>,
    requests: AtomicUsize,
}

impl MockNetwork {
    fn new() -> Arc<Self> {
        let network = Self {
            online: AtomicBool::new(true),
            routes: Mutex::new(HashMap::new()),
            requests: AtomicUsize::new(0),
        };
        for url in SHELL {
            network.serve(url, 200, &format!("body of {url}"));
        }
        Arc::new(network)
    }

    fn serve(&self, url: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), AssetResponse::new(status, body));
    }

    fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetFetcher for MockNetwork {
    fn name(&self) -> &str {
        "MockNetwork"
    }

    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.online.load(Ordering::SeqCst) {
            return Err(CoreError::Network("offline".into()));
        }
        let routes = self.routes.lock().unwrap();
        Ok(routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| AssetResponse::new(404, "not found")))
    }
}

struct CountingSync {
    runs: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl SyncTask for CountingSync {
    async fn run(&self) -> Result<(), CoreError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(CoreError::Network("sync endpoint unreachable".into()))
        } else {
            Ok(())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

const SHELL: [&str; 5] = [
    "/",
    "/index.html",
    "/styles.css",
    "/script.js",
    "/icons/icon-72x72.webp",
];

fn settings(version: &str) -> CacheSettings {
    CacheSettings {
        version: version.to_string(),
        static_assets: SHELL.iter().map(|s| s.to_string()).collect(),
        ..CacheSettings::default()
    }
}

fn cache(
    version: &str,
    storage: &Arc<CacheStorage>,
    network: &Arc<MockNetwork>,
) -> OfflineAssetCache {
    let fetcher: Arc<dyn AssetFetcher> = network.clone();
    OfflineAssetCache::new(settings(version), storage.clone(), fetcher)
}

async fn active_cache() -> (OfflineAssetCache, Arc<CacheStorage>, Arc<MockNetwork>) {
    let storage = Arc::new(CacheStorage::new());
    let network = MockNetwork::new();
    let mut cache = cache("v1.0.0", &storage, &network);
    cache.install().await.unwrap();
    (cache, storage, network)
}

// ═══════════════════════════════════════════════════════════════════
// Lifecycle
// ═══════════════════════════════════════════════════════════════════

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn install_caches_shell_and_activates() {
        let (cache, storage, _) = active_cache().await;
        assert_eq!(cache.state(), WorkerState::Activated);

        let partition = storage.partition("static-v1.0.0").unwrap();
        assert_eq!(partition.len(), SHELL.len());
        assert!(partition.contains(&AssetRequest::for_url("/styles.css")));
        assert_eq!(cache.version(), "static-v1.0.0");
    }

    #[tokio::test]
    async fn install_without_skip_waiting_stays_installed() {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        let fetcher: Arc<dyn AssetFetcher> = network.clone();
        let mut settings = settings("v1.0.0");
        settings.skip_waiting_on_install = false;
        let mut cache = OfflineAssetCache::new(settings, storage, fetcher);

        cache.install().await.unwrap();
        assert_eq!(cache.state(), WorkerState::Installed);

        cache.handle_message(ControlMessage::SkipWaiting, None).unwrap();
        assert_eq!(cache.state(), WorkerState::Activated);
    }

    #[tokio::test]
    async fn install_fails_on_missing_asset() {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        network.serve("/script.js", 404, "gone");
        let mut cache = cache("v1.0.0", &storage, &network);

        let err = cache.install().await.unwrap_err();
        match err {
            CoreError::CacheInstallFailure { asset, reason } => {
                assert_eq!(asset, "/script.js");
                assert!(reason.contains("404"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(cache.state(), WorkerState::Redundant);
        assert!(!storage.has("static-v1.0.0"));
    }

    #[tokio::test]
    async fn install_fails_offline() {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        network.set_online(false);
        let mut cache = cache("v1.0.0", &storage, &network);

        assert!(matches!(
            cache.install().await,
            Err(CoreError::CacheInstallFailure { .. })
        ));
        assert_eq!(storage.total_entries(), 0);
    }

    #[tokio::test]
    async fn install_twice_is_invalid() {
        let (mut cache, _, _) = active_cache().await;
        assert!(matches!(
            cache.install().await,
            Err(CoreError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn activate_before_install_is_invalid() {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        let mut cache = cache("v1.0.0", &storage, &network);
        assert!(matches!(cache.activate(), Err(CoreError::InvalidState(_))));
        assert_eq!(cache.state(), WorkerState::Parsed);
    }

    #[tokio::test]
    async fn new_epoch_deletes_old_partitions() {
        let (old, storage, network) = active_cache().await;
        network.serve("/api/rates", 200, "{}");
        old.handle_fetch(&AssetRequest::get("/api/rates", RequestDestination::Empty))
            .await
            .unwrap();
        assert_eq!(storage.names(), ["dynamic-v1.0.0", "static-v1.0.0"]);

        let mut new = cache("v1.1.0", &storage, &network);
        new.install().await.unwrap();

        assert_eq!(new.state(), WorkerState::Activated);
        assert_eq!(storage.names(), ["static-v1.1.0"]);
    }

    #[tokio::test]
    async fn failed_upgrade_keeps_previous_epoch_serving() {
        let (old, storage, network) = active_cache().await;

        network.serve("/styles.css", 500, "boom");
        let mut new = cache("v2.0.0", &storage, &network);
        assert!(new.install().await.is_err());
        assert_eq!(new.state(), WorkerState::Redundant);

        network.set_online(false);
        let served = old
            .handle_fetch(&AssetRequest::get("/styles.css", RequestDestination::Style))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.response.text(), "body of /styles.css");
        assert_eq!(storage.names(), ["static-v1.0.0"]);
    }

    #[tokio::test]
    async fn activate_reports_deleted_names() {
        let storage = Arc::new(CacheStorage::new());
        storage.open("static-v0.9.0");
        storage.open("dynamic-v0.9.0");
        let network = MockNetwork::new();
        let fetcher: Arc<dyn AssetFetcher> = network.clone();
        let mut settings = settings("v1.0.0");
        settings.skip_waiting_on_install = false;
        let mut cache = OfflineAssetCache::new(settings, storage.clone(), fetcher);

        cache.install().await.unwrap();
        let deleted = cache.activate().unwrap();
        assert_eq!(deleted, ["dynamic-v0.9.0", "static-v0.9.0"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Fetch routing
// ═══════════════════════════════════════════════════════════════════

mod routing {
    use super::*;

    #[tokio::test]
    async fn static_asset_served_from_cache_offline() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);

        for (url, destination) in [
            ("/styles.css", RequestDestination::Style),
            ("/script.js", RequestDestination::Script),
            ("/icons/icon-72x72.webp", RequestDestination::Image),
        ] {
            let served = cache
                .handle_fetch(&AssetRequest::get(url, destination))
                .await
                .unwrap();
            assert_eq!(served.source, ResponseSource::Cache);
            assert_eq!(served.response.status, 200);
        }
    }

    #[tokio::test]
    async fn absolute_url_on_origin_hits_precached_path_offline() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);

        let served = cache
            .handle_fetch(&AssetRequest::get(
                "http://localhost/styles.css",
                RequestDestination::Style,
            ))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.response.text(), "body of /styles.css");

        let page = cache
            .handle_fetch(&AssetRequest::navigate("http://localhost/"))
            .await
            .unwrap();
        assert_eq!(page.source, ResponseSource::Cache);
        assert_eq!(page.response.text(), "body of /");
    }

    #[tokio::test]
    async fn absolute_and_relative_share_dynamic_entry() {
        let (cache, storage, network) = active_cache().await;
        network.serve("http://localhost/api/rates", 200, "{}");

        cache
            .handle_fetch(&AssetRequest::get(
                "http://localhost/api/rates",
                RequestDestination::Empty,
            ))
            .await
            .unwrap();
        assert_eq!(
            storage.partition("dynamic-v1.0.0").unwrap().keys(),
            ["GET /api/rates"]
        );

        network.set_online(false);
        let served = cache
            .handle_fetch(&AssetRequest::get("/api/rates", RequestDestination::Empty))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.response.text(), "{}");
    }

    #[tokio::test]
    async fn absolute_url_on_other_origin_misses() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);

        let served = cache
            .handle_fetch(&AssetRequest::get(
                "http://cdn.example/styles.css",
                RequestDestination::Style,
            ))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Fallback);
        assert_eq!(served.response.text(), OFFLINE_ASSET_PLACEHOLDER);
    }

    #[tokio::test]
    async fn static_asset_cache_hit_skips_network() {
        let (cache, _, network) = active_cache().await;
        let before = network.request_count();
        cache
            .handle_fetch(&AssetRequest::get("/styles.css", RequestDestination::Style))
            .await
            .unwrap();
        assert_eq!(network.request_count(), before);
    }

    #[tokio::test]
    async fn dynamic_resource_served_from_cache_offline() {
        let (cache, storage, network) = active_cache().await;
        network.serve("/api/rates", 200, "{\"rate\": 8.5}");
        let request = AssetRequest::get("/api/rates", RequestDestination::Empty);

        let first = cache.handle_fetch(&request).await.unwrap();
        assert_eq!(first.source, ResponseSource::Network);
        assert!(storage
            .partition("dynamic-v1.0.0")
            .unwrap()
            .contains(&request));

        network.set_online(false);
        let second = cache.handle_fetch(&request).await.unwrap();
        assert_eq!(second.source, ResponseSource::Cache);
        assert_eq!(second.response.text(), "{\"rate\": 8.5}");
    }

    #[tokio::test]
    async fn network_first_prefers_fresh_response() {
        let (cache, _, network) = active_cache().await;
        let request = AssetRequest::get("/api/rates", RequestDestination::Empty);

        network.serve("/api/rates", 200, "old");
        cache.handle_fetch(&request).await.unwrap();
        network.serve("/api/rates", 200, "new");
        let served = cache.handle_fetch(&request).await.unwrap();

        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.response.text(), "new");
    }

    #[tokio::test]
    async fn network_first_miss_offline_fails() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);
        let err = cache
            .handle_fetch(&AssetRequest::get("/api/unknown", RequestDestination::Empty))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CacheFetchFailure { ref url, .. } if url == "/api/unknown"));
    }

    #[tokio::test]
    async fn error_responses_are_not_cached() {
        let (cache, storage, network) = active_cache().await;
        network.serve("/api/flaky", 500, "error");
        let request = AssetRequest::get("/api/flaky", RequestDestination::Empty);

        let served = cache.handle_fetch(&request).await.unwrap();
        assert_eq!(served.response.status, 500);
        assert!(storage
            .partition("dynamic-v1.0.0")
            .map_or(true, |p| !p.contains(&request)));
    }

    #[tokio::test]
    async fn navigation_falls_back_to_offline_document() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);

        let served = cache
            .handle_fetch(&AssetRequest::navigate("/calculators/sip"))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Fallback);
        assert_eq!(served.response.text(), "body of /index.html");
    }

    #[tokio::test]
    async fn navigation_cache_hit() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);
        let served = cache.handle_fetch(&AssetRequest::navigate("/")).await.unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.response.text(), "body of /");
    }

    #[tokio::test]
    async fn navigation_without_offline_document_fails() {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        let fetcher: Arc<dyn AssetFetcher> = network.clone();
        let mut settings = settings("v1.0.0");
        settings.static_assets = vec!["/styles.css".into()];
        let mut cache = OfflineAssetCache::new(settings, storage, fetcher);
        cache.install().await.unwrap();

        network.set_online(false);
        let err = cache
            .handle_fetch(&AssetRequest::navigate("/about"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CacheFetchFailure { .. }));
    }

    #[tokio::test]
    async fn missing_image_offline_is_empty_404() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);
        let served = cache
            .handle_fetch(&AssetRequest::get("/img/chart.png", RequestDestination::Image))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Fallback);
        assert_eq!(served.response.status, 404);
        assert!(served.response.body.is_empty());
    }

    #[tokio::test]
    async fn missing_font_offline_is_placeholder() {
        let (cache, _, network) = active_cache().await;
        network.set_online(false);
        let served = cache
            .handle_fetch(&AssetRequest::get("/fonts/inter.woff2", RequestDestination::Font))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Fallback);
        assert_eq!(served.response.status, 200);
        assert_eq!(served.response.text(), OFFLINE_ASSET_PLACEHOLDER);
        assert_eq!(served.response.content_type(), Some("text/css"));
    }

    #[tokio::test]
    async fn static_asset_miss_is_stored_in_dynamic_partition() {
        let (cache, storage, network) = active_cache().await;
        network.serve("/extra.css", 200, "body {}");
        let request = AssetRequest::get("/extra.css", RequestDestination::Style);

        let served = cache.handle_fetch(&request).await.unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert!(storage.partition("dynamic-v1.0.0").unwrap().contains(&request));
        assert!(!storage.partition("static-v1.0.0").unwrap().contains(&request));
    }

    #[tokio::test]
    async fn non_get_passes_through_uncached() {
        let (cache, storage, network) = active_cache().await;
        network.serve("/api/save", 200, "saved");
        let request = AssetRequest::new("post", "/api/save", RequestDestination::Empty);

        let served = cache.handle_fetch(&request).await.unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert!(!storage.has("dynamic-v1.0.0"));

        network.set_online(false);
        assert!(matches!(
            cache.handle_fetch(&request).await,
            Err(CoreError::CacheFetchFailure { .. })
        ));
    }

    #[tokio::test]
    async fn requests_before_activation_pass_through() {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        let cache = cache("v1.0.0", &storage, &network);

        let served = cache
            .handle_fetch(&AssetRequest::get("/styles.css", RequestDestination::Style))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(storage.total_entries(), 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Control messages
// ═══════════════════════════════════════════════════════════════════

mod messages {
    use super::*;

    #[tokio::test]
    async fn get_version_replies_on_channel() {
        let (mut cache, _, _) = active_cache().await;
        let (tx, rx) = oneshot::channel();
        cache
            .handle_message(ControlMessage::GetVersion, Some(tx))
            .unwrap();
        assert_eq!(rx.await.unwrap().version, "static-v1.0.0");
    }

    #[tokio::test]
    async fn get_version_from_json() {
        let (mut cache, _, _) = active_cache().await;
        let (tx, rx) = oneshot::channel();
        cache
            .handle_message_json(r#"{"type": "GET_VERSION"}"#, Some(tx))
            .unwrap();
        assert_eq!(rx.await.unwrap().version, "static-v1.0.0");
    }

    #[tokio::test]
    async fn get_version_without_channel_is_ignored() {
        let (mut cache, _, _) = active_cache().await;
        assert!(cache.handle_message(ControlMessage::GetVersion, None).is_ok());
    }

    #[tokio::test]
    async fn get_version_with_dropped_receiver() {
        let (mut cache, _, _) = active_cache().await;
        let (tx, rx) = oneshot::channel();
        drop(rx);
        assert!(cache
            .handle_message(ControlMessage::GetVersion, Some(tx))
            .is_ok());
    }

    #[tokio::test]
    async fn unknown_message_is_rejected() {
        let (mut cache, _, _) = active_cache().await;
        assert!(matches!(
            cache.handle_message_json(r#"{"type": "SELF_DESTRUCT"}"#, None),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn skip_waiting_before_install_applies_later() {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        let fetcher: Arc<dyn AssetFetcher> = network.clone();
        let mut settings = settings("v1.0.0");
        settings.skip_waiting_on_install = false;
        let mut cache = OfflineAssetCache::new(settings, storage, fetcher);

        cache
            .handle_message_json(r#"{"type": "SKIP_WAITING"}"#, None)
            .unwrap();
        assert_eq!(cache.state(), WorkerState::Parsed);
        cache.install().await.unwrap();
        assert_eq!(cache.state(), WorkerState::Activated);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Background sync & notifications
// ═══════════════════════════════════════════════════════════════════

mod sync_and_push {
    use super::*;

    fn with_sync(fail: bool) -> (OfflineAssetCache, Arc<CountingSync>) {
        let storage = Arc::new(CacheStorage::new());
        let network = MockNetwork::new();
        let task = Arc::new(CountingSync {
            runs: AtomicUsize::new(0),
            fail,
        });
        let cache = cache("v1.0.0", &storage, &network).with_sync_task(task.clone());
        (cache, task)
    }

    #[tokio::test]
    async fn sync_runs_task_for_known_tag() {
        let (cache, task) = with_sync(false);
        assert!(cache.handle_sync(BACKGROUND_SYNC_TAG).await);
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sync_ignores_unknown_tag() {
        let (cache, task) = with_sync(false);
        assert!(!cache.handle_sync("periodic-refresh").await);
        assert_eq!(task.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sync_failure_is_swallowed() {
        let (cache, task) = with_sync(true);
        assert!(cache.handle_sync(BACKGROUND_SYNC_TAG).await);
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn push_notification_defaults() {
        let (cache, _, _) = active_cache().await;
        let n = cache.push_notification(None);
        assert_eq!(n.title, "All-in-One Calculator");
        assert_eq!(n.body, "New update available!");
        assert_eq!(n.icon, "/icons/icon-192x192.webp");
        assert_eq!(n.badge, "/icons/icon-72x72.webp");
        assert_eq!(n.vibrate, [100, 50, 100]);
        assert_eq!(n.data.primary_key, 1);
        let actions: Vec<&str> = n.actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, [ACTION_EXPLORE, ACTION_CLOSE]);
    }

    #[tokio::test]
    async fn push_notification_uses_payload() {
        let (cache, _, _) = active_cache().await;
        let n = cache.push_notification(Some("Rates updated"));
        assert_eq!(n.body, "Rates updated");

        let json = serde_json::to_value(&n).unwrap();
        assert!(json["data"]["dateOfArrival"].is_string());
        assert_eq!(json["data"]["primaryKey"], 1);
    }

    #[tokio::test]
    async fn notification_click() {
        let (cache, _, _) = active_cache().await;
        assert_eq!(cache.notification_click(Some(ACTION_EXPLORE)), Some("/".to_string()));
        assert_eq!(cache.notification_click(Some(ACTION_CLOSE)), None);
        assert_eq!(cache.notification_click(None), None);
    }
}
