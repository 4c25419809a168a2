//! Error types for the sync engine.

use slimlog_store::StoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that escape the sync engine.
///
/// Conflicts never appear here: a rejected save is recovered internally by
/// reload-and-replay. What surfaces is a failed load - either the guarded
/// initial load, or the reload during conflict recovery also failing.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Loading the remote document failed (transport, auth, or decryption).
    /// The in-memory document is left untouched.
    #[error("load failed: {0}")]
    Load(#[source] StoreError),

    /// The document would not encode to, or decode from, its payload.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl SyncError {
    /// Returns true when the error came from the store rather than the
    /// payload codec.
    #[must_use]
    pub fn is_load(&self) -> bool {
        matches!(self, SyncError::Load(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_display_includes_cause() {
        let err = SyncError::Load(StoreError::Offline("network down".into()));
        assert!(err.to_string().contains("network down"));
        assert!(err.is_load());
    }
}
