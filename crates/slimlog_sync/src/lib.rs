//! # Slimlog Sync
//!
//! The optimistic-concurrency, debounced sync engine.
//!
//! This crate provides:
//! - [`SyncEngine`] - owns the document, the pending action queue, and the
//!   debounce/reconcile protocol
//! - [`Reducer`] - the seam between the engine and an application state type
//! - [`DietReducer`] - the binding for the diet-log document
//! - [`SyncConfig`] / [`SyncStatus`] / [`SyncStats`]
//!
//! ## Architecture
//!
//! The engine keeps a locally applied, optimistically consistent copy of a
//! single document and persists it as one remote blob under conditional
//! writes:
//!
//! 1. `dispatch` applies an action locally at once and re-arms a single
//!    debounce deadline
//! 2. when the quiet period elapses, the whole document is saved with the
//!    version token believed current
//! 3. a rejected save triggers reload-and-replay: the remote document is
//!    loaded, the queued actions are re-applied in original order on top of
//!    it, and the save is rescheduled
//!
//! ## Key Invariants
//!
//! - `dispatch` never blocks on I/O; readers see the new state immediately
//! - queued actions are replayed in exact dispatch order
//! - at most one save attempt is in flight or scheduled at a time
//! - conflicts are recovered internally; only load failures surface

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod diet;
mod error;
mod reducer;
mod state;

pub use config::{SyncConfig, DEFAULT_DEBOUNCE};
pub use diet::DietReducer;
pub use error::{SyncError, SyncResult};
pub use reducer::Reducer;
pub use state::{SyncEngine, SyncStats, SyncStatus};
