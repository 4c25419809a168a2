//! Diet-log binding for the sync engine.

use crate::reducer::Reducer;
use slimlog_model::{apply, Action, DietLog};

/// [`Reducer`] implementation over the diet-log document.
///
/// # Example
///
/// ```rust
/// use slimlog_model::DietLog;
/// use slimlog_store::MemoryBlobStore;
/// use slimlog_sync::{DietReducer, SyncConfig, SyncEngine};
///
/// let engine = SyncEngine::new(
///     SyncConfig::new("diary"),
///     MemoryBlobStore::new(),
///     DietReducer,
///     DietLog::default(),
/// );
/// engine.initialize().unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DietReducer;

impl Reducer for DietReducer {
    type State = DietLog;
    type Action = Action;

    fn apply(&self, state: DietLog, action: &Action) -> DietLog {
        apply(state, action)
    }

    fn load_action(&self, loaded: DietLog) -> Action {
        Action::Load { log: loaded }
    }
}
