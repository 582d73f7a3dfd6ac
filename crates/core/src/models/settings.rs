use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Shell assets pre-cached at install time.
pub const DEFAULT_STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/script.js",
    "/manifest.json",
    "/icons/icon-72x72.webp",
    "/icons/icon-96x96.webp",
    "/icons/icon-128x128.webp",
    "/icons/icon-144x144.webp",
    "/icons/icon-152x152.webp",
    "/icons/icon-192x192.webp",
    "/icons/icon-384x384.webp",
    "/icons/icon-512x512.webp",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/webfonts/fa-solid-900.woff2",
];

/// Top-level configuration for the calculator suite.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Offline asset cache configuration
    pub cache: CacheSettings,

    /// Presentation defaults
    pub display: DisplaySettings,
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.cache.validate()
    }
}

/// Configuration of the offline asset cache for one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Version tag; bumping it starts a new cache epoch (e.g. "v1.0.0")
    pub version: String,

    /// Origin the shell is served from. Absolute URLs on it are cached under
    /// their root-relative path, and the HTTP fetcher resolves paths against it.
    pub origin: String,

    /// Document served when a navigation fails offline
    pub offline_document: String,

    /// Shell assets fetched and stored at install time
    pub static_assets: Vec<String>,

    /// Activate right after a successful install instead of waiting
    /// for the previous epoch's clients to go away
    pub skip_waiting_on_install: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            version: "v1.0.0".to_string(),
            origin: "http://localhost".to_string(),
            offline_document: "/index.html".to_string(),
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
            skip_waiting_on_install: true,
        }
    }
}

impl CacheSettings {
    /// Partition holding pre-declared shell assets for this epoch.
    pub fn static_partition(&self) -> String {
        format!("static-{}", self.version)
    }

    /// Partition filled lazily from successful network responses.
    pub fn dynamic_partition(&self) -> String {
        format!("dynamic-{}", self.version)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.version.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Cache version tag must not be empty".into(),
            ));
        }
        if !self.origin.starts_with("http://") && !self.origin.starts_with("https://") {
            return Err(CoreError::ValidationError(format!(
                "Cache origin '{}' must be an http(s) URL",
                self.origin
            )));
        }
        Ok(())
    }
}

/// Presentation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Symbol prefixed to formatted currency amounts
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}
