//! The closed set of state transitions.

use crate::document::{Category, ComestibleId, DietLog, Meal, MeasurementType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One state transition of the diet log.
///
/// Actions are a closed tagged union dispatched by an exhaustive `match` in
/// [`crate::apply`]; an unrecognised kind cannot be constructed, so it can
/// never be silently ignored. Every input an action needs is carried in the
/// action itself (ids and dates included), which keeps replaying a recorded
/// sequence deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Replace the whole document with a freshly loaded one.
    Load {
        /// The loaded document.
        log: DietLog,
    },
    /// Jump the editing day to a specific date.
    SetEditingDate {
        /// The day to edit.
        date: NaiveDate,
    },
    /// Move the editing day one day earlier.
    DayBefore,
    /// Move the editing day one day later.
    DayAfter,
    /// Record one helping of a food at a meal on the editing day.
    AddAte {
        /// Which meal.
        meal: Meal,
        /// Which configured food.
        comestible: ComestibleId,
    },
    /// Remove one helping of a food from a meal on the editing day.
    ///
    /// A no-op when the entry does not exist; removing the last helping
    /// removes the entry, and removing a day's last entry removes the day.
    DeleteAte {
        /// Which meal.
        meal: Meal,
        /// Which configured food.
        comestible: ComestibleId,
    },
    /// Configure a new food and record one helping of it at a meal on the
    /// editing day.
    ///
    /// A no-op when a food with the same label (case-insensitive) already
    /// exists. The id is minted by the caller.
    AddComestible {
        /// Caller-minted id for the new food.
        id: ComestibleId,
        /// Display name.
        label: String,
        /// Calories per helping.
        calories: f64,
        /// Grouping category.
        category: Category,
        /// Meal to record the first helping against.
        meal: Meal,
    },
    /// Change a food's category.
    SetCategory {
        /// Which food.
        comestible: ComestibleId,
        /// The new category.
        category: Category,
    },
    /// Update a food's label and nutritional scores.
    ConfigureComestible {
        /// Which food.
        comestible: ComestibleId,
        /// New display name.
        label: String,
        /// Calories per helping.
        calories: f64,
        /// Red-meat score per helping.
        red_meat: f64,
        /// Sugar score per helping.
        sugar: f64,
        /// Alcohol score per helping.
        alcohol: f64,
        /// Saturated-fat score per helping.
        satch: f64,
    },
    /// Record (or overwrite) a body measurement for the editing day.
    AddMeasurement {
        /// What was measured.
        kind: MeasurementType,
        /// The measured value.
        value: f64,
    },
    /// Remove the editing day's measurement of the given kind, if any.
    RemoveMeasurement {
        /// What was measured.
        kind: MeasurementType,
    },
    /// Set (or create) the editing day's note text.
    EditNote {
        /// The new note body.
        text: String,
    },
    /// Attach a picture to the editing day's note, creating the note if
    /// needed.
    AddNotePicture {
        /// Identifier of the externally stored image.
        id: String,
        /// MIME content type of the image.
        content_type: String,
    },
    /// Detach a picture from the editing day's note, if present.
    RemoveNotePicture {
        /// Identifier of the externally stored image.
        id: String,
    },
}
