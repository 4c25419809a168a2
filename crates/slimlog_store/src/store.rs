//! Blob store trait definition.

use crate::error::StoreResult;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Opaque revision marker for a stored blob.
///
/// Tokens are compared for equality only; their contents carry no meaning
/// to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    /// No remote revision is known. A save presenting this succeeds only
    /// while the key is still absent, so the first writer wins and a blob
    /// written in the meantime is never clobbered.
    Initial,
    /// A concrete revision previously returned by the store.
    Tag(String),
}

impl Version {
    /// Wraps a concrete revision token.
    pub fn tag(token: impl Into<String>) -> Self {
        Version::Tag(token.into())
    }

    /// Returns true when no remote revision is known.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        matches!(self, Version::Initial)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Initial => f.write_str("none"),
            Version::Tag(token) => f.write_str(token),
        }
    }
}

/// Result of loading a blob.
#[derive(Debug, Clone)]
pub struct LoadedBlob {
    /// The blob contents; `None` when the key has never been written.
    pub data: Option<Bytes>,
    /// The revision to present on the next conditional save.
    pub version: Version,
}

/// A key-value blob store with conditional writes.
///
/// # Invariants
///
/// - `save` with a stale `expected` token fails with a conflict error and
///   leaves the stored blob unchanged
/// - after `save` returns token `v`, `load` returns the saved bytes with
///   version `v` until the next successful save
/// - `load` of an absent key is not an error: it returns no data and
///   [`Version::Initial`]
///
/// # Implementors
///
/// - [`crate::MemoryBlobStore`] - For testing
/// - [`crate::FileBlobStore`] - For local persistent storage
/// - [`crate::EncryptedBlobStore`] - Encrypting wrapper over any store
pub trait BlobStore: Send + Sync {
    /// Loads the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the payload cannot
    /// be read.
    fn load(&self, key: &str) -> StoreResult<LoadedBlob>;

    /// Conditionally overwrites the blob stored under `key`.
    ///
    /// Returns the new revision token on success.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when `expected` does not match the store's
    /// current revision, and a transport error when the store is
    /// unreachable.
    fn save(&self, key: &str, data: Bytes, expected: &Version) -> StoreResult<Version>;
}

impl<S: BlobStore + ?Sized> BlobStore for Arc<S> {
    fn load(&self, key: &str) -> StoreResult<LoadedBlob> {
        (**self).load(key)
    }

    fn save(&self, key: &str, data: Bytes, expected: &Version) -> StoreResult<Version> {
        (**self).save(key, data, expected)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn load(&self, key: &str) -> StoreResult<LoadedBlob> {
        (**self).load(key)
    }

    fn save(&self, key: &str, data: Bytes, expected: &Version) -> StoreResult<Version> {
        (**self).save(key, data, expected)
    }
}
