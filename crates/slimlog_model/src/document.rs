//! Document types for the diet log.
//!
//! The whole log is one serializable tree ([`DietLog`]) persisted as a
//! single JSON blob. Serialization must round-trip exactly: whole-document
//! overwrite is the only persistence mechanism.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when parsing a [`Meal`], [`Category`] or
/// [`MeasurementType`] from a string.
#[derive(Debug, Error)]
#[error("unrecognised {kind}: {input}")]
pub struct ParseEnumError {
    /// What was being parsed ("meal", "category", ...).
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

/// Unique identifier for a comestible.
///
/// Ids are minted by callers (not by the reducer) so that replaying the
/// same action sequence always produces the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComestibleId(Uuid);

impl ComestibleId {
    /// Mints a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ComestibleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComestibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Food category used for grouping and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Savoury dishes.
    Savoury,
    /// Rice, pasta, potatoes.
    Carbs,
    /// Sauces and condiments.
    Condiment,
    /// Milk, cheese, yoghurt.
    Dairy,
    /// Bread and baked staples.
    Bread,
    /// Sweets, cakes, biscuits.
    Treat,
    /// Soft drinks.
    Drink,
    /// Alcoholic drinks.
    Booze,
    /// Fruit.
    Fruit,
    /// Vegetables.
    Veg,
    /// Breakfast cereals.
    Cereal,
    /// Anything else.
    Other,
}

/// All categories in display order.
pub const CATEGORIES: [Category; 12] = [
    Category::Savoury,
    Category::Carbs,
    Category::Condiment,
    Category::Dairy,
    Category::Bread,
    Category::Treat,
    Category::Drink,
    Category::Booze,
    Category::Fruit,
    Category::Veg,
    Category::Cereal,
    Category::Other,
];

impl Category {
    /// Lowercase name as used in the serialized document.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Savoury => "savoury",
            Category::Carbs => "carbs",
            Category::Condiment => "condiment",
            Category::Dairy => "dairy",
            Category::Bread => "bread",
            Category::Treat => "treat",
            Category::Drink => "drink",
            Category::Booze => "booze",
            Category::Fruit => "fruit",
            Category::Veg => "veg",
            Category::Cereal => "cereal",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                input: s.to_string(),
            })
    }
}

/// One of the four meals of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    /// First meal of the day.
    Breakfast,
    /// Midday meal.
    Lunch,
    /// Evening meal.
    Tea,
    /// Dessert.
    Pud,
}

/// All meals in day order.
pub const MEALS: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Tea, Meal::Pud];

impl Meal {
    /// Lowercase name as used in the serialized document.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Tea => "tea",
            Meal::Pud => "pud",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MEALS
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "meal",
                input: s.to_string(),
            })
    }
}

/// A food item the user has configured, with its nutritional scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comestible {
    /// Stable identifier referenced from [`Ate`] entries.
    pub id: ComestibleId,
    /// Display name.
    pub label: String,
    /// Calories per helping.
    pub calories: f64,
    /// Grouping category.
    pub category: Category,
    /// Red-meat score per helping.
    pub red_meat: f64,
    /// Sugar score per helping.
    pub sugar: f64,
    /// Alcohol score per helping.
    pub alcohol: f64,
    /// Saturated-fat score per helping.
    pub satch: f64,
}

/// A food eaten at a meal, with how many helpings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ate {
    /// Which configured food.
    pub comestible: ComestibleId,
    /// Which meal it was eaten at.
    pub meal: Meal,
    /// Number of helpings; always at least 1 while the entry exists.
    pub quantity: u32,
}

/// One day's eat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// The day this log is for.
    pub date: NaiveDate,
    /// Everything eaten that day.
    pub ate: Vec<Ate>,
}

/// Kind of body measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementType {
    /// Waist circumference in centimetres.
    #[serde(rename = "Waist/cm")]
    Waist,
    /// Body weight in kilograms.
    #[serde(rename = "Weight/kg")]
    Weight,
}

impl MeasurementType {
    /// Name with unit, as shown to users and stored in the document.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Waist => "Waist/cm",
            MeasurementType::Weight => "Weight/kg",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waist" | "Waist/cm" => Ok(MeasurementType::Waist),
            "weight" | "Weight/kg" => Ok(MeasurementType::Weight),
            other => Err(ParseEnumError {
                kind: "measurement type",
                input: other.to_string(),
            }),
        }
    }
}

/// A body measurement taken on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Measured value in the unit implied by `kind`.
    pub value: f64,
    /// Day the measurement was taken.
    pub date: NaiveDate,
    /// What was measured.
    #[serde(rename = "type")]
    pub kind: MeasurementType,
}

/// A picture attached to a note, stored out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    /// Identifier of the externally stored image.
    pub id: String,
    /// MIME content type of the image.
    #[serde(rename = "type")]
    pub content_type: String,
}

/// A free-text note for a day, with optional picture attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// The note body.
    pub text: String,
    /// Day the note belongs to.
    pub date: NaiveDate,
    /// Attached pictures.
    pub pictures: Vec<Picture>,
}

/// The full application state tree, persisted as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietLog {
    /// Body measurements across all days.
    pub measurements: Vec<Measurement>,
    /// Configured foods.
    pub comestibles: Vec<Comestible>,
    /// Per-day eat logs.
    pub days: Vec<Day>,
    /// Per-day notes.
    pub notes: Vec<Note>,
    /// The day currently being edited; day-relative actions target it.
    pub editing_day: NaiveDate,
}

impl DietLog {
    /// Creates an empty log positioned on `editing_day`.
    #[must_use]
    pub fn starting_on(editing_day: NaiveDate) -> Self {
        Self {
            measurements: Vec::new(),
            comestibles: Vec::new(),
            days: Vec::new(),
            notes: Vec::new(),
            editing_day,
        }
    }

    /// Returns the log for `date`, if anything was eaten that day.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Looks a comestible up by id.
    #[must_use]
    pub fn comestible(&self, id: ComestibleId) -> Option<&Comestible> {
        self.comestibles.iter().find(|c| c.id == id)
    }

    /// Looks a comestible up by label, case-insensitively.
    #[must_use]
    pub fn comestible_by_label(&self, label: &str) -> Option<&Comestible> {
        self.comestibles
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(label))
    }

    /// Total calories eaten on `date`.
    ///
    /// Entries referring to an unknown comestible count as zero.
    #[must_use]
    pub fn day_calories(&self, date: NaiveDate) -> f64 {
        let Some(day) = self.day(date) else {
            return 0.0;
        };
        day.ate
            .iter()
            .map(|a| {
                self.comestible(a.comestible)
                    .map_or(0.0, |c| c.calories * f64::from(a.quantity))
            })
            .sum()
    }
}

impl Default for DietLog {
    fn default() -> Self {
        Self::starting_on(NaiveDate::default())
    }
}
