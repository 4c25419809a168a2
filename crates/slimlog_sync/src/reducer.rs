//! Reducer seam between the sync engine and an application state type.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Applies actions to an application state.
///
/// The engine is generic over this seam so the protocol can be exercised
/// against small test states as well as the real diet log.
///
/// # Contract
///
/// - `apply` is pure, total and deterministic: the result depends only on
///   the inputs, every action variant is handled, and no environment (wall
///   clock, randomness) is read
/// - actions must be replay-safe: after a conflict the engine re-applies
///   the queued actions on top of a freshly loaded base state, so an
///   action whose target is already gone must be a no-op, not an error
/// - `load_action` builds the action that replaces the state wholesale;
///   the engine feeds every loaded document through it
pub trait Reducer: Send + Sync {
    /// The document type owned by the engine.
    type State: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    /// One state transition.
    type Action: Clone + Send + Sync + 'static;

    /// Applies `action` to `state`, returning the new state.
    fn apply(&self, state: Self::State, action: &Self::Action) -> Self::State;

    /// Builds the action that replaces the whole state with `loaded`.
    fn load_action(&self, loaded: Self::State) -> Self::Action;
}
