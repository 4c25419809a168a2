//! Error types for blob store operations.

use std::io;
use thiserror::Error;

/// Result type for blob store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during blob store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional save presented a stale version token.
    ///
    /// Expected and recoverable: the caller reloads and retries.
    #[error("version conflict on {key}: expected {expected}, store has {actual}")]
    Conflict {
        /// The blob key.
        key: String,
        /// The token the save presented.
        expected: String,
        /// The store's actual current token.
        actual: String,
    },

    /// The store is unreachable.
    #[error("store offline: {0}")]
    Offline(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encryption or decryption failed (wrong key, tampered payload).
    #[error("encryption error: {0}")]
    Encryption(String),
}

impl StoreError {
    /// Returns true for a stale-version rejection.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_predicate() {
        let conflict = StoreError::Conflict {
            key: "diary".into(),
            expected: "00000001".into(),
            actual: "00000002".into(),
        };
        assert!(conflict.is_conflict());
        assert!(!StoreError::Offline("network down".into()).is_conflict());
    }

    #[test]
    fn conflict_display_names_both_tokens() {
        let conflict = StoreError::Conflict {
            key: "diary".into(),
            expected: "a1".into(),
            actual: "b2".into(),
        };
        let text = conflict.to_string();
        assert!(text.contains("a1"));
        assert!(text.contains("b2"));
    }
}
