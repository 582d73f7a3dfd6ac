use crate::errors::CoreError;

use super::cache_storage::{CacheStorage, StorageSnapshot};
use super::format;

/// Save/load cache storage to/from bytes or files, so cached shell assets
/// survive a host restart.
pub struct SnapshotManager;

impl SnapshotManager {
    /// Flow: CacheStorage → StorageSnapshot → bincode → OFAC container
    pub fn save_to_bytes(storage: &CacheStorage) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(&storage.to_snapshot())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize cache: {e}")))?;
        Ok(format::write_snapshot(format::CURRENT_VERSION, &payload))
    }

    /// Flow: OFAC container → bincode → StorageSnapshot → CacheStorage
    pub fn load_from_bytes(data: &[u8]) -> Result<CacheStorage, CoreError> {
        let (_header, payload) = format::read_snapshot(data)?;
        let snapshot: StorageSnapshot = bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize cache: {e}")))?;
        Ok(CacheStorage::from_snapshot(snapshot))
    }

    /// Save storage to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(storage: &CacheStorage, path: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(storage)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load storage from a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<CacheStorage, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
