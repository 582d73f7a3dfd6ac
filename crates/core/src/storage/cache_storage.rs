use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::asset::{AssetRequest, AssetResponse, CacheEntry};

/// One named cache partition ("static-v1.0.0", "dynamic-v1.0.0", ...).
///
/// Safe to read and write from concurrent requests without a lock; two
/// writes to the same key resolve last-writer-wins.
#[derive(Debug)]
pub struct CachePartition {
    name: String,
    entries: DashMap<String, CacheEntry>,
}

impl CachePartition {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored response for a request, if any.
    pub fn get(&self, request: &AssetRequest) -> Option<AssetResponse> {
        self.entries
            .get(&request.cache_key())
            .map(|entry| entry.response.clone())
    }

    /// Full entry (response plus store time) under a raw key.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|e| e.clone())
    }

    /// Insert or replace the response for a request.
    pub fn put(&self, request: &AssetRequest, response: AssetResponse) {
        self.entries
            .insert(request.cache_key(), CacheEntry::new(response));
    }

    pub fn delete(&self, request: &AssetRequest) -> bool {
        self.entries.remove(&request.cache_key()).is_some()
    }

    pub fn contains(&self, request: &AssetRequest) -> bool {
        self.entries.contains_key(&request.cache_key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

/// All cache partitions of the application, shared between cache epochs.
///
/// An old epoch keeps serving from its partitions while a new one installs
/// into fresh ones; activation of the new epoch deletes the old names.
#[derive(Debug, Default)]
pub struct CacheStorage {
    partitions: DashMap<String, Arc<CachePartition>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a partition, creating it empty if it does not exist.
    pub fn open(&self, name: &str) -> Arc<CachePartition> {
        self.partitions
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(CachePartition::new(name)))
            .value()
            .clone()
    }

    /// Get a partition without creating it.
    pub fn partition(&self, name: &str) -> Option<Arc<CachePartition>> {
        self.partitions.get(name).map(|p| p.value().clone())
    }

    pub fn has(&self, name: &str) -> bool {
        self.partitions.contains_key(name)
    }

    /// Delete a partition and everything in it.
    pub fn delete(&self, name: &str) -> bool {
        self.partitions.remove(name).is_some()
    }

    /// Names of all partitions, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.partitions.iter().map(|p| p.key().clone()).collect();
        names.sort();
        names
    }

    /// First stored response for `request`, searching `partitions` in order.
    /// Missing partitions are skipped.
    pub fn match_request(&self, request: &AssetRequest, partitions: &[&str]) -> Option<AssetResponse> {
        partitions
            .iter()
            .filter_map(|name| self.partition(name))
            .find_map(|partition| partition.get(request))
    }

    /// Total number of entries across all partitions.
    pub fn total_entries(&self) -> usize {
        self.partitions.iter().map(|p| p.value().len()).sum()
    }

    /// Plain-data copy of every partition, for serialization.
    pub fn to_snapshot(&self) -> StorageSnapshot {
        let partitions = self
            .partitions
            .iter()
            .map(|p| {
                let entries = p
                    .value()
                    .entries
                    .iter()
                    .map(|e| (e.key().clone(), e.value().clone()))
                    .collect();
                (p.key().clone(), entries)
            })
            .collect();
        StorageSnapshot { partitions }
    }

    /// Rebuild storage from a snapshot.
    pub fn from_snapshot(snapshot: StorageSnapshot) -> Self {
        let storage = Self::new();
        for (name, entries) in snapshot.partitions {
            let partition = storage.open(&name);
            for (key, entry) in entries {
                partition.entries.insert(key, entry);
            }
        }
        storage
    }
}

/// Serializable form of [`CacheStorage`]: partition name → key → entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSnapshot {
    pub partitions: BTreeMap<String, BTreeMap<String, CacheEntry>>,
}
