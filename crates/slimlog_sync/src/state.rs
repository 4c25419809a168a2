//! Sync engine state machine.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::reducer::Reducer;
use bytes::Bytes;
use parking_lot::RwLock;
use slimlog_store::{BlobStore, Version};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// The current state of the sync engine.
///
/// Derived, never persisted. Transitions: `Uninitialized → Loading → Idle ⇄
/// SaveScheduled → Saving → {Idle | Reconciling → SaveScheduled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Engine constructed, initial load not yet performed.
    Uninitialized,
    /// The guarded initial load is in progress.
    Loading,
    /// Nothing is scheduled; local and remote are believed to agree.
    Idle,
    /// The debounce deadline is armed; a save runs when it fires.
    SaveScheduled,
    /// A save attempt is in progress.
    Saving,
    /// A rejected save is being recovered by reload-and-replay.
    Reconciling,
}

impl SyncStatus {
    /// Returns true while a load or save is actually running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SyncStatus::Loading | SyncStatus::Saving | SyncStatus::Reconciling
        )
    }

    /// Returns true when a save is armed but not yet started.
    #[must_use]
    pub fn has_scheduled_save(&self) -> bool {
        matches!(self, SyncStatus::SaveScheduled)
    }
}

/// Statistics about sync operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Remote loads completed (initial load and conflict reloads).
    pub loads_completed: u64,
    /// Saves accepted by the store.
    pub saves_completed: u64,
    /// Saves rejected with a version conflict.
    pub conflicts: u64,
    /// Saves that failed for non-conflict reasons (treated like conflicts).
    pub save_failures: u64,
    /// Queued actions re-applied during conflict recovery.
    pub actions_replayed: u64,
    /// Time of the last accepted save.
    pub last_save_time: Option<Instant>,
    /// Last surfaced error message.
    pub last_error: Option<String>,
}

/// The sync engine.
///
/// Owns the authoritative in-memory document, its remote version token,
/// and the pending action queue. All I/O happens inside [`initialize`],
/// [`tick`] and [`flush`]; [`dispatch`] is synchronous and never blocks,
/// so callers always observe their own edit immediately.
///
/// The engine is single-threaded and cooperative: the host drives the
/// debounce timer by calling [`tick`] (for example once per UI frame or
/// from a coarse poll loop). Interior mutability lets a shared handle be
/// dispatched into from event callbacks.
///
/// [`initialize`]: SyncEngine::initialize
/// [`dispatch`]: SyncEngine::dispatch
/// [`tick`]: SyncEngine::tick
/// [`flush`]: SyncEngine::flush
pub struct SyncEngine<S: BlobStore, R: Reducer> {
    config: SyncConfig,
    store: S,
    reducer: R,
    document: RwLock<R::State>,
    version: RwLock<Version>,
    queue: RwLock<Vec<R::Action>>,
    deadline: RwLock<Option<Instant>>,
    status: RwLock<SyncStatus>,
    stats: RwLock<SyncStats>,
    initialized: AtomicBool,
}

impl<S: BlobStore, R: Reducer> SyncEngine<S, R> {
    /// Creates an engine over `store`, starting from `initial` state.
    pub fn new(config: SyncConfig, store: S, reducer: R, initial: R::State) -> Self {
        Self {
            config,
            store,
            reducer,
            document: RwLock::new(initial),
            version: RwLock::new(Version::Initial),
            queue: RwLock::new(Vec::new()),
            deadline: RwLock::new(None),
            status: RwLock::new(SyncStatus::Uninitialized),
            stats: RwLock::new(SyncStats::default()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Returns a clone of the current document.
    #[must_use]
    pub fn document(&self) -> R::State {
        self.document.read().clone()
    }

    /// Returns the version token believed current.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version.read().clone()
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        *self.status.read()
    }

    /// Returns a snapshot of the stats.
    #[must_use]
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Number of dispatched actions not yet confirmed durable.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.queue.read().len()
    }

    /// When the armed debounce deadline fires, if one is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        *self.deadline.read()
    }

    /// Performs the one guarded initial load.
    ///
    /// The first successful call replaces the document with the loaded
    /// value and records its version token; calls after that are no-ops,
    /// so a re-rendering host cannot issue duplicate loads. An absent blob
    /// is not an error: the document stays at its initial value and the
    /// first save will create the blob.
    ///
    /// # Errors
    ///
    /// Returns the load failure. The document is left untouched and the
    /// load is NOT retried automatically; invoking `initialize` again
    /// retries explicitly.
    pub fn initialize(&self) -> SyncResult<()> {
        if self.initialized.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.set_status(SyncStatus::Loading);
        match self.load_remote() {
            Ok(_) => {
                self.initialized.store(true, Ordering::SeqCst);
                self.set_status(SyncStatus::Idle);
                Ok(())
            }
            Err(e) => {
                self.stats.write().last_error = Some(e.to_string());
                self.set_status(SyncStatus::Uninitialized);
                Err(e)
            }
        }
    }

    /// Applies `action` to the document immediately and schedules a save.
    ///
    /// Synchronous: the caller sees the updated document as soon as this
    /// returns, regardless of network state. The action joins the pending
    /// queue until a save confirms it durable, and the debounce deadline
    /// is re-armed so rapid bursts coalesce into one remote write.
    pub fn dispatch(&self, action: R::Action) {
        {
            let mut doc = self.document.write();
            let next = self.reducer.apply(doc.clone(), &action);
            *doc = next;
        }
        self.queue.write().push(action);
        self.schedule_save();
    }

    /// Runs the scheduled save if its deadline has passed.
    ///
    /// Returns whether a save round ran.
    ///
    /// # Errors
    ///
    /// Returns an error only when a rejected save could not be recovered
    /// because the reload also failed; see [`flush`](SyncEngine::flush).
    pub fn tick(&self) -> SyncResult<bool> {
        let due = match *self.deadline.read() {
            Some(deadline) => deadline <= Instant::now(),
            None => false,
        };
        if !due {
            return Ok(false);
        }
        self.reconcile().map(|()| true)
    }

    /// Forces the scheduled save to run now, ignoring the deadline.
    ///
    /// A no-op when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns an error when a rejected save could not be recovered
    /// because the reload also failed. No further attempt is scheduled
    /// until the next [`dispatch`](SyncEngine::dispatch).
    pub fn flush(&self) -> SyncResult<()> {
        if self.queue.read().is_empty() {
            *self.deadline.write() = None;
            if self.status().has_scheduled_save() {
                self.set_status(SyncStatus::Idle);
            }
            return Ok(());
        }
        self.reconcile()
    }

    fn set_status(&self, status: SyncStatus) {
        *self.status.write() = status;
    }

    /// Arms the single-shot debounce deadline, replacing any armed one.
    fn schedule_save(&self) {
        *self.deadline.write() = Some(Instant::now() + self.config.debounce);
        self.set_status(SyncStatus::SaveScheduled);
    }

    /// Loads the remote blob, replacing the document and version token.
    ///
    /// Returns whether the document was replaced (false when the blob is
    /// absent, in which case only the version token is adopted).
    fn load_remote(&self) -> SyncResult<bool> {
        let loaded = self
            .store
            .load(&self.config.key)
            .map_err(SyncError::Load)?;

        let replaced = if let Some(bytes) = loaded.data {
            let state: R::State = serde_json::from_slice(&bytes)?;
            let action = self.reducer.load_action(state);
            let mut doc = self.document.write();
            let next = self.reducer.apply(doc.clone(), &action);
            *doc = next;
            true
        } else {
            false
        };

        tracing::debug!(version = %loaded.version, replaced, "loaded remote document");
        *self.version.write() = loaded.version;
        self.stats.write().loads_completed += 1;
        Ok(replaced)
    }

    /// One save/reconcile round.
    ///
    /// Success confirms the whole queue durable. A rejected save (version
    /// conflict, or any other store failure, treated identically) reloads
    /// the remote document, replays the queue in original order on top of
    /// it, and re-arms the deadline; the queue still represents
    /// unconfirmed actions and is kept. Only a failed reload escapes.
    fn reconcile(&self) -> SyncResult<()> {
        *self.deadline.write() = None;
        self.set_status(SyncStatus::Saving);

        let expected = self.version.read().clone();
        let bytes = {
            let doc = self.document.read();
            match serde_json::to_vec(&*doc) {
                Ok(bytes) => bytes,
                Err(e) => {
                    let err = SyncError::Codec(e);
                    self.stats.write().last_error = Some(err.to_string());
                    self.set_status(SyncStatus::Idle);
                    return Err(err);
                }
            }
        };

        match self.store.save(&self.config.key, Bytes::from(bytes), &expected) {
            Ok(version) => {
                tracing::debug!(version = %version, "saved document");
                *self.version.write() = version;
                self.queue.write().clear();
                self.set_status(SyncStatus::Idle);

                let mut stats = self.stats.write();
                stats.saves_completed += 1;
                stats.last_save_time = Some(Instant::now());
                stats.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, version = %expected, "save rejected, reconciling");
                {
                    let mut stats = self.stats.write();
                    if e.is_conflict() {
                        stats.conflicts += 1;
                    } else {
                        stats.save_failures += 1;
                    }
                }

                self.set_status(SyncStatus::Reconciling);
                match self.load_remote() {
                    Ok(replaced) => {
                        let queued = self.queue.read().clone();
                        // When the blob vanished the local document (queued
                        // effects included) is still in place; replaying
                        // would apply them twice.
                        if replaced && !queued.is_empty() {
                            let mut doc = self.document.write();
                            let mut next = doc.clone();
                            for action in &queued {
                                tracing::debug!("replaying queued action");
                                next = self.reducer.apply(next, action);
                            }
                            *doc = next;
                            self.stats.write().actions_replayed += queued.len() as u64;
                        }
                        self.schedule_save();
                        Ok(())
                    }
                    Err(reload_err) => {
                        self.stats.write().last_error = Some(reload_err.to_string());
                        self.set_status(SyncStatus::Idle);
                        Err(reload_err)
                    }
                }
            }
        }
    }
}
