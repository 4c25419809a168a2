//! File-backed blob store for local persistent storage.

use crate::error::{StoreError, StoreResult};
use crate::store::{BlobStore, LoadedBlob, Version};
use bytes::Bytes;
use fs2::FileExt;
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A blob store keeping one file per key under a root directory.
///
/// The revision token is the SHA-256 of the stored bytes, so any two
/// distinct payloads have distinct tokens and the compare-and-swap in
/// [`save`](BlobStore::save) needs no sidecar metadata. An exclusive
/// advisory lock is held across the read-compare-write sequence, which
/// makes the conditional save atomic across processes sharing the
/// directory.
///
/// A zero-length file counts as "never written": a save that loses the
/// conditional check may leave the empty file it created behind, and loads
/// must not mistake it for content.
///
/// # Example
///
/// ```no_run
/// use bytes::Bytes;
/// use slimlog_store::{BlobStore, FileBlobStore, Version};
///
/// let store = FileBlobStore::open("/tmp/slimlog").unwrap();
/// store.save("diary", Bytes::from_static(b"{}"), &Version::Initial).unwrap();
/// ```
#[derive(Debug)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.blob"))
    }

    fn digest(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let out = hasher.finalize();
        out.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> StoreResult<LoadedBlob> {
        let path = self.blob_path(key);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(LoadedBlob {
                    data: None,
                    version: Version::Initial,
                })
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        if data.is_empty() {
            return Ok(LoadedBlob {
                data: None,
                version: Version::Initial,
            });
        }

        let version = Version::tag(Self::digest(&data));
        Ok(LoadedBlob {
            data: Some(Bytes::from(data)),
            version,
        })
    }

    fn save(&self, key: &str, data: Bytes, expected: &Version) -> StoreResult<Version> {
        let path = self.blob_path(key);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        file.lock_exclusive()?;

        let mut current = Vec::new();
        file.read_to_end(&mut current)?;

        let matches = if current.is_empty() {
            expected.is_initial()
        } else {
            matches!(expected, Version::Tag(token) if *token == Self::digest(&current))
        };

        if !matches {
            let actual = if current.is_empty() {
                "none".to_string()
            } else {
                Self::digest(&current)
            };
            return Err(StoreError::Conflict {
                key: key.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&data)?;
        file.sync_all()?;

        tracing::debug!(key, bytes = data.len(), "wrote blob file");
        Ok(Version::tag(Self::digest(&data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_key_loads_as_initial() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();

        let loaded = store.load("diary").unwrap();
        assert!(loaded.data.is_none());
        assert!(loaded.version.is_initial());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();

        let v1 = store
            .save("diary", Bytes::from_static(b"{\"days\":[]}"), &Version::Initial)
            .unwrap();

        let loaded = store.load("diary").unwrap();
        assert_eq!(loaded.data.unwrap(), Bytes::from_static(b"{\"days\":[]}"));
        assert_eq!(loaded.version, v1);
    }

    #[test]
    fn conditional_save_rejects_stale_token_across_handles() {
        let dir = tempdir().unwrap();
        let store_a = FileBlobStore::open(dir.path()).unwrap();
        let store_b = FileBlobStore::open(dir.path()).unwrap();

        let v1 = store_a
            .save("diary", Bytes::from_static(b"one"), &Version::Initial)
            .unwrap();

        // B writes on top of v1; A's token is now stale.
        let _v2 = store_b.save("diary", Bytes::from_static(b"two"), &v1).unwrap();

        let result = store_a.save("diary", Bytes::from_static(b"stale"), &v1);
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
        assert_eq!(
            store_a.load("diary").unwrap().data.unwrap(),
            Bytes::from_static(b"two")
        );
    }

    #[test]
    fn failed_create_leaves_loadable_absent_state() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();

        // A save with a stale expectation against an absent key fails but
        // may create an empty file; the key must still load as absent.
        let result = store.save("diary", Bytes::from_static(b"x"), &Version::tag("bogus"));
        assert!(matches!(result, Err(StoreError::Conflict { .. })));

        let loaded = store.load("diary").unwrap();
        assert!(loaded.data.is_none());
        assert!(loaded.version.is_initial());

        // And the key can still be created afterwards.
        store
            .save("diary", Bytes::from_static(b"x"), &Version::Initial)
            .unwrap();
    }

    #[test]
    fn identical_payloads_share_a_token() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();

        let v1 = store
            .save("diary", Bytes::from_static(b"same"), &Version::Initial)
            .unwrap();
        let v2 = store.save("diary", Bytes::from_static(b"same"), &v1).unwrap();
        assert_eq!(v1, v2);
    }
}
