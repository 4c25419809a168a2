//! In-memory blob store for testing.

use crate::error::{StoreError, StoreResult};
use crate::store::{BlobStore, LoadedBlob, Version};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// An in-memory blob store.
///
/// Revision tokens are a per-store counter, so every successful save
/// produces a distinct token. The store can be shared between several
/// engine instances (wrap it in an `Arc`) to simulate concurrent writers,
/// and can be taken offline to inject transport failures.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use slimlog_store::{BlobStore, MemoryBlobStore, Version};
///
/// let store = MemoryBlobStore::new();
/// let v1 = store.save("diary", Bytes::from_static(b"{}"), &Version::Initial).unwrap();
/// let loaded = store.load("diary").unwrap();
/// assert_eq!(loaded.version, v1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, (Bytes, u64)>>,
    next_revision: AtomicU64,
    offline: AtomicBool,
    load_calls: AtomicU64,
    save_calls: AtomicU64,
}

impl MemoryBlobStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the store offline (`true`) or back online (`false`).
    ///
    /// While offline every load and save fails with
    /// [`StoreError::Offline`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of load calls made so far, including failed ones.
    #[must_use]
    pub fn load_calls(&self) -> u64 {
        self.load_calls.load(Ordering::SeqCst)
    }

    /// Number of save calls made so far, including rejected ones.
    #[must_use]
    pub fn save_calls(&self) -> u64 {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Returns the currently stored bytes for `key`, for assertions.
    #[must_use]
    pub fn contents(&self, key: &str) -> Option<Bytes> {
        self.blobs.read().get(key).map(|(data, _)| data.clone())
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Offline("store is offline".into()))
        } else {
            Ok(())
        }
    }

    fn token(revision: u64) -> String {
        format!("{revision:08x}")
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> StoreResult<LoadedBlob> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        Ok(match self.blobs.read().get(key) {
            Some((data, revision)) => LoadedBlob {
                data: Some(data.clone()),
                version: Version::tag(Self::token(*revision)),
            },
            None => LoadedBlob {
                data: None,
                version: Version::Initial,
            },
        })
    }

    fn save(&self, key: &str, data: Bytes, expected: &Version) -> StoreResult<Version> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let mut blobs = self.blobs.write();
        let current = blobs.get(key).map(|(_, revision)| *revision);

        let matches = match (current, expected) {
            (None, Version::Initial) => true,
            (Some(revision), Version::Tag(token)) => *token == Self::token(revision),
            _ => false,
        };

        if !matches {
            return Err(StoreError::Conflict {
                key: key.to_string(),
                expected: expected.to_string(),
                actual: current.map_or_else(|| "none".to_string(), Self::token),
            });
        }

        let revision = self.next_revision.fetch_add(1, Ordering::SeqCst) + 1;
        blobs.insert(key.to_string(), (data, revision));
        Ok(Version::tag(Self::token(revision)))
    }
}
