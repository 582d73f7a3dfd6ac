use thiserror::Error;

/// Unified error type for the entire calc-suite-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── User Input / Math ───────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Math error: {reason}")]
    DomainError { reason: String },

    #[error("Investment not found: {0}")]
    InvestmentNotFound(String),

    // ── Offline Asset Cache ─────────────────────────────────────────
    #[error("Failed to fetch {url}: {reason}")]
    CacheFetchFailure { url: String, reason: String },

    #[error("Cache install failed on {asset}: {reason}")]
    CacheInstallFailure { asset: String, reason: String },

    #[error("Invalid worker state: {0}")]
    InvalidState(String),

    #[error("Network error: {0}")]
    Network(String),

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// Shorthand for a `DomainError` with the given reason.
    pub fn domain(reason: impl Into<String>) -> Self {
        CoreError::DomainError {
            reason: reason.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; drop the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
