//! Configuration for the sync engine.

use std::time::Duration;

/// Quiet period applied when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Configuration for a [`crate::SyncEngine`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Blob key the document is stored under.
    pub key: String,
    /// Quiet period after the last dispatch before a save attempt begins.
    ///
    /// Every dispatch re-arms the deadline, so a burst of rapid actions
    /// coalesces into a single remote write.
    pub debounce: Duration,
}

impl SyncConfig {
    /// Creates a configuration for the document stored under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Sets the debounce quiet period.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("diary")
    }
}
