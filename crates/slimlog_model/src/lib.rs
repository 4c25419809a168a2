//! # Slimlog Model
//!
//! The diet-log document, its actions, and the pure reducer.
//!
//! This crate defines:
//! - [`DietLog`] - the full application state tree, persisted as one unit
//! - [`Action`] - a closed tagged union of state transitions
//! - [`apply`] - the pure, total, deterministic reducer
//!
//! ## Key Invariants
//!
//! - `apply` is deterministic: every input an action needs (ids, dates,
//!   values) is carried in the action itself, never read from the
//!   environment.
//! - Actions are replay-safe: an action whose target is already gone (for
//!   example a delete racing a concurrent delete) is a no-op, never an
//!   error. The sync layer re-applies queued actions on top of a freshly
//!   loaded base state and relies on this.
//! - [`Action::Load`] replaces the state wholesale.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod dates;
mod document;
mod reducer;

pub use action::Action;
pub use dates::{add_days, date_diff, today};
pub use document::{
    Ate, Category, Comestible, ComestibleId, Day, DietLog, Meal, Measurement, MeasurementType,
    Note, ParseEnumError, Picture, CATEGORIES, MEALS,
};
pub use reducer::apply;
