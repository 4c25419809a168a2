//! Encrypting blob store wrapper.
//!
//! Wraps any [`BlobStore`] with AES-256-GCM encryption at rest, keyed by a
//! user-held secret.
//!
//! ## Security Model
//!
//! - Payload format: `nonce (12 bytes) || ciphertext || tag (16 bytes)`
//! - Unique random nonce per save
//! - Keys are never stored; they are zeroized on drop
//! - Passphrase derivation uses HKDF-SHA256
//!
//! Version tokens pass through untouched: the inner store versions the
//! ciphertext, and the conditional-write check neither needs nor gets the
//! plaintext.

use crate::error::{StoreError, StoreResult};
use crate::store::{BlobStore, LoadedBlob, Version};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use bytes::Bytes;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encryption key for AES-256-GCM.
///
/// The key is automatically zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Generates a new random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(StoreError::Encryption(format!(
                "invalid key size: expected {KEY_SIZE}, got {}",
                bytes.len()
            )));
        }
        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Derives a key from a passphrase using HKDF-SHA256.
    ///
    /// The salt should be stable per document so the same passphrase
    /// derives the same key on every device.
    pub fn derive_from_passphrase(passphrase: &[u8], salt: &[u8]) -> StoreResult<Self> {
        use hkdf::Hkdf;
        use sha2::Sha256;

        let hk = Hkdf::<Sha256>::new(Some(salt), passphrase);
        let mut bytes = [0u8; KEY_SIZE];
        hk.expand(b"slimlog-blob-key-v1", &mut bytes)
            .map_err(|_| StoreError::Encryption("HKDF expand failed".into()))?;

        Ok(Self { bytes })
    }

    /// Returns the key as a byte slice.
    ///
    /// # Security
    ///
    /// Do not log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A blob store wrapper that encrypts payloads with AES-256-GCM.
///
/// A decryption failure on load (wrong key, tampered payload) is reported
/// as an error rather than a panic, so a misconfigured key degrades to a
/// failed load.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use slimlog_store::{BlobStore, EncryptedBlobStore, EncryptionKey, MemoryBlobStore, Version};
///
/// let key = EncryptionKey::generate();
/// let store = EncryptedBlobStore::new(MemoryBlobStore::new(), &key);
/// store.save("diary", Bytes::from_static(b"{}"), &Version::Initial).unwrap();
/// let loaded = store.load("diary").unwrap();
/// assert_eq!(loaded.data.unwrap(), Bytes::from_static(b"{}"));
/// ```
pub struct EncryptedBlobStore<S> {
    inner: S,
    cipher: Aes256Gcm,
}

impl<S: BlobStore> EncryptedBlobStore<S> {
    /// Wraps `inner`, encrypting every payload with `key`.
    #[must_use]
    pub fn new(inner: S, key: &EncryptionKey) -> Self {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_bytes()));
        Self { inner, cipher }
    }

    /// Returns the wrapped store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn encrypt(&self, plaintext: &[u8]) -> StoreResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| StoreError::Encryption("encryption failed".into()))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend(ciphertext);
        Ok(result)
    }

    fn decrypt(&self, payload: &[u8]) -> StoreResult<Vec<u8>> {
        if payload.len() < NONCE_SIZE + TAG_SIZE {
            return Err(StoreError::Encryption("ciphertext too short".into()));
        }

        let nonce = Nonce::from_slice(&payload[..NONCE_SIZE]);
        self.cipher
            .decrypt(nonce, &payload[NONCE_SIZE..])
            .map_err(|_| StoreError::Encryption("decryption failed".into()))
    }
}

impl<S: BlobStore> BlobStore for EncryptedBlobStore<S> {
    fn load(&self, key: &str) -> StoreResult<LoadedBlob> {
        let loaded = self.inner.load(key)?;
        let data = match loaded.data {
            Some(payload) => Some(Bytes::from(self.decrypt(&payload)?)),
            None => None,
        };
        Ok(LoadedBlob {
            data,
            version: loaded.version,
        })
    }

    fn save(&self, key: &str, data: Bytes, expected: &Version) -> StoreResult<Version> {
        let payload = self.encrypt(&data)?;
        self.inner.save(key, Bytes::from(payload), expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBlobStore;

    #[test]
    fn round_trip_through_inner_store() {
        let key = EncryptionKey::generate();
        let store = EncryptedBlobStore::new(MemoryBlobStore::new(), &key);

        let v1 = store
            .save("diary", Bytes::from_static(b"secret"), &Version::Initial)
            .unwrap();
        let loaded = store.load("diary").unwrap();

        assert_eq!(loaded.data.unwrap(), Bytes::from_static(b"secret"));
        assert_eq!(loaded.version, v1);

        // The inner store never sees the plaintext.
        let raw = store.inner().contents("diary").unwrap();
        assert_ne!(raw, Bytes::from_static(b"secret"));
        assert!(raw.len() >= NONCE_SIZE + TAG_SIZE);
    }

    #[test]
    fn wrong_key_fails_to_load() {
        let inner = MemoryBlobStore::new();
        let writer = EncryptedBlobStore::new(inner, &EncryptionKey::generate());
        writer
            .save("diary", Bytes::from_static(b"secret"), &Version::Initial)
            .unwrap();

        // Re-wrap the same inner bytes with a different key.
        let reader = EncryptedBlobStore::new(
            MemoryBlobStore::new(),
            &EncryptionKey::generate(),
        );
        reader
            .inner()
            .save(
                "diary",
                writer.inner().contents("diary").unwrap(),
                &Version::Initial,
            )
            .unwrap();

        let result = reader.load("diary");
        assert!(matches!(result, Err(StoreError::Encryption(_))));
    }

    #[test]
    fn tampered_payload_fails_to_load() {
        let key = EncryptionKey::generate();
        let inner = MemoryBlobStore::new();
        let store = EncryptedBlobStore::new(inner, &key);
        let v1 = store
            .save("diary", Bytes::from_static(b"secret"), &Version::Initial)
            .unwrap();

        let mut raw = store.inner().contents("diary").unwrap().to_vec();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        store
            .inner()
            .save("diary", Bytes::from(raw), &v1)
            .unwrap();

        let result = store.load("diary");
        assert!(matches!(result, Err(StoreError::Encryption(_))));
    }

    #[test]
    fn passphrase_derivation_is_deterministic() {
        let a = EncryptionKey::derive_from_passphrase(b"correct horse", b"diary").unwrap();
        let b = EncryptionKey::derive_from_passphrase(b"correct horse", b"diary").unwrap();
        let c = EncryptionKey::derive_from_passphrase(b"wrong horse", b"diary").unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
    }

    #[test]
    fn key_from_bytes_validates_length() {
        assert!(EncryptionKey::from_bytes(&[0u8; KEY_SIZE]).is_ok());
        assert!(matches!(
            EncryptionKey::from_bytes(&[0u8; 16]),
            Err(StoreError::Encryption(_))
        ));
    }

    #[test]
    fn absent_key_passes_through() {
        let key = EncryptionKey::generate();
        let store = EncryptedBlobStore::new(MemoryBlobStore::new(), &key);

        let loaded = store.load("diary").unwrap();
        assert!(loaded.data.is_none());
        assert!(loaded.version.is_initial());
    }
}
