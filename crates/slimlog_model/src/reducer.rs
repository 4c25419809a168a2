//! The pure reducer.

use crate::action::Action;
use crate::dates::add_days;
use crate::document::{Ate, Comestible, Day, DietLog, Measurement, Note, Picture};

/// Applies one action to the log, returning the new log.
///
/// Pure and total: the result depends only on the inputs, and every action
/// variant is handled. Actions whose target is missing (a delete racing a
/// concurrent delete, a configure of a food removed elsewhere) are no-ops,
/// so a queued sequence can be replayed on top of a different base state.
#[must_use]
pub fn apply(mut log: DietLog, action: &Action) -> DietLog {
    match action {
        Action::Load { log: loaded } => {
            return loaded.clone();
        }
        Action::SetEditingDate { date } => {
            log.editing_day = *date;
        }
        Action::DayBefore => {
            log.editing_day = add_days(log.editing_day, -1);
        }
        Action::DayAfter => {
            log.editing_day = add_days(log.editing_day, 1);
        }
        Action::AddAte { meal, comestible } => {
            let editing_day = log.editing_day;
            let day = day_entry(&mut log, editing_day);
            let at = match day
                .ate
                .iter()
                .position(|a| a.meal == *meal && a.comestible == *comestible)
            {
                Some(at) => at,
                None => {
                    day.ate.push(Ate {
                        comestible: *comestible,
                        meal: *meal,
                        quantity: 0,
                    });
                    day.ate.len() - 1
                }
            };
            day.ate[at].quantity += 1;
        }
        Action::DeleteAte { meal, comestible } => {
            let Some(day_at) = log.days.iter().position(|d| d.date == log.editing_day) else {
                return log;
            };
            let day = &mut log.days[day_at];
            let Some(ate_at) = day
                .ate
                .iter()
                .position(|a| a.meal == *meal && a.comestible == *comestible)
            else {
                return log;
            };

            let ate = &mut day.ate[ate_at];
            ate.quantity -= 1;
            if ate.quantity == 0 {
                day.ate.remove(ate_at);
                if day.ate.is_empty() {
                    log.days.remove(day_at);
                }
            }
        }
        Action::AddComestible {
            id,
            label,
            calories,
            category,
            meal,
        } => {
            if log.comestible_by_label(label).is_none() {
                log.comestibles.push(Comestible {
                    id: *id,
                    label: label.clone(),
                    calories: *calories,
                    category: *category,
                    red_meat: 0.0,
                    sugar: 0.0,
                    alcohol: 0.0,
                    satch: 0.0,
                });

                let editing_day = log.editing_day;
                let day = day_entry(&mut log, editing_day);
                day.ate.push(Ate {
                    comestible: *id,
                    meal: *meal,
                    quantity: 1,
                });
            }
        }
        Action::SetCategory {
            comestible,
            category,
        } => {
            if let Some(c) = log.comestibles.iter_mut().find(|c| c.id == *comestible) {
                c.category = *category;
            }
        }
        Action::ConfigureComestible {
            comestible,
            label,
            calories,
            red_meat,
            sugar,
            alcohol,
            satch,
        } => {
            if let Some(c) = log.comestibles.iter_mut().find(|c| c.id == *comestible) {
                c.label = label.clone();
                c.calories = *calories;
                c.red_meat = *red_meat;
                c.sugar = *sugar;
                c.alcohol = *alcohol;
                c.satch = *satch;
            }
        }
        Action::AddMeasurement { kind, value } => {
            let existing = log
                .measurements
                .iter_mut()
                .find(|m| m.date == log.editing_day && m.kind == *kind);
            match existing {
                Some(m) => m.value = *value,
                None => log.measurements.push(Measurement {
                    value: *value,
                    date: log.editing_day,
                    kind: *kind,
                }),
            }
        }
        Action::RemoveMeasurement { kind } => {
            if let Some(at) = log
                .measurements
                .iter()
                .position(|m| m.date == log.editing_day && m.kind == *kind)
            {
                log.measurements.remove(at);
            }
        }
        Action::EditNote { text } => {
            match log.notes.iter_mut().find(|n| n.date == log.editing_day) {
                Some(note) => note.text = text.clone(),
                None => log.notes.push(Note {
                    text: text.clone(),
                    date: log.editing_day,
                    pictures: Vec::new(),
                }),
            }
        }
        Action::AddNotePicture { id, content_type } => {
            let picture = Picture {
                id: id.clone(),
                content_type: content_type.clone(),
            };
            match log.notes.iter_mut().find(|n| n.date == log.editing_day) {
                Some(note) => note.pictures.push(picture),
                None => log.notes.push(Note {
                    text: String::new(),
                    date: log.editing_day,
                    pictures: vec![picture],
                }),
            }
        }
        Action::RemoveNotePicture { id } => {
            if let Some(note) = log.notes.iter_mut().find(|n| n.date == log.editing_day) {
                if let Some(at) = note.pictures.iter().position(|p| p.id == *id) {
                    note.pictures.remove(at);
                }
            }
        }
    }

    log
}

/// Returns the editing day's entry, creating it when absent.
fn day_entry(log: &mut DietLog, date: chrono::NaiveDate) -> &mut Day {
    if let Some(at) = log.days.iter().position(|d| d.date == date) {
        &mut log.days[at]
    } else {
        log.days.push(Day {
            date,
            ate: Vec::new(),
        });
        log.days.last_mut().expect("just pushed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Category, ComestibleId, Meal, MeasurementType};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn log_on(day: &str) -> DietLog {
        DietLog::starting_on(date(day))
    }

    fn add_food(log: DietLog, id: ComestibleId, label: &str, calories: f64, meal: Meal) -> DietLog {
        apply(
            log,
            &Action::AddComestible {
                id,
                label: label.into(),
                calories,
                category: Category::Other,
                meal,
            },
        )
    }

    #[test]
    fn load_replaces_wholesale() {
        let mut other = log_on("2023-02-02");
        other.notes.push(Note {
            text: "hello".into(),
            date: date("2023-02-02"),
            pictures: Vec::new(),
        });

        let log = apply(log_on("2023-01-01"), &Action::Load { log: other.clone() });
        assert_eq!(log, other);
    }

    #[test]
    fn editing_day_navigation() {
        let log = log_on("2023-05-10");
        let log = apply(log, &Action::DayBefore);
        assert_eq!(log.editing_day, date("2023-05-09"));
        let log = apply(log, &Action::DayAfter);
        let log = apply(log, &Action::DayAfter);
        assert_eq!(log.editing_day, date("2023-05-11"));
        let log = apply(
            log,
            &Action::SetEditingDate {
                date: date("2023-06-01"),
            },
        );
        assert_eq!(log.editing_day, date("2023-06-01"));
    }

    #[test]
    fn add_ate_creates_day_then_increments() {
        let id = ComestibleId::new();
        let log = add_food(log_on("2023-05-01"), id, "Weetabix", 66.0, Meal::Breakfast);

        let log = apply(
            log,
            &Action::AddAte {
                meal: Meal::Breakfast,
                comestible: id,
            },
        );

        let day = log.day(date("2023-05-01")).unwrap();
        assert_eq!(day.ate.len(), 1);
        assert_eq!(day.ate[0].quantity, 2);

        // A different meal gets its own entry.
        let log = apply(
            log,
            &Action::AddAte {
                meal: Meal::Lunch,
                comestible: id,
            },
        );
        assert_eq!(log.day(date("2023-05-01")).unwrap().ate.len(), 2);
    }

    #[test]
    fn delete_ate_decrements_then_removes_entry_and_day() {
        let id = ComestibleId::new();
        let log = add_food(log_on("2023-05-01"), id, "toast", 80.0, Meal::Breakfast);
        let log = apply(
            log,
            &Action::AddAte {
                meal: Meal::Breakfast,
                comestible: id,
            },
        );

        let delete = Action::DeleteAte {
            meal: Meal::Breakfast,
            comestible: id,
        };

        let log = apply(log, &delete);
        assert_eq!(log.day(date("2023-05-01")).unwrap().ate[0].quantity, 1);

        let log = apply(log, &delete);
        assert!(log.day(date("2023-05-01")).is_none());
    }

    #[test]
    fn delete_ate_of_missing_entry_is_a_noop() {
        // Replay safety: deleting something a concurrent writer already
        // removed must not error or change anything.
        let id = ComestibleId::new();
        let log = log_on("2023-05-01");
        let before = log.clone();

        let log = apply(
            log,
            &Action::DeleteAte {
                meal: Meal::Tea,
                comestible: id,
            },
        );
        assert_eq!(log, before);
    }

    #[test]
    fn add_comestible_dedupes_by_label_case_insensitive() {
        let first = ComestibleId::new();
        let second = ComestibleId::new();
        let log = add_food(log_on("2023-05-01"), first, "Weetabix", 66.0, Meal::Breakfast);
        let log = add_food(log, second, "weetabix", 70.0, Meal::Breakfast);

        assert_eq!(log.comestibles.len(), 1);
        assert_eq!(log.comestibles[0].id, first);
        assert_eq!(log.day(date("2023-05-01")).unwrap().ate.len(), 1);
    }

    #[test]
    fn configure_comestible_updates_scores_and_label() {
        let id = ComestibleId::new();
        let log = add_food(log_on("2023-05-01"), id, "mince", 250.0, Meal::Tea);

        let log = apply(
            log,
            &Action::ConfigureComestible {
                comestible: id,
                label: "beef mince".into(),
                calories: 280.0,
                red_meat: 1.0,
                sugar: 0.0,
                alcohol: 0.0,
                satch: 0.5,
            },
        );

        let c = log.comestible(id).unwrap();
        assert_eq!(c.label, "beef mince");
        assert_eq!(c.calories, 280.0);
        assert_eq!(c.red_meat, 1.0);
        assert_eq!(c.satch, 0.5);

        let log = apply(
            log,
            &Action::SetCategory {
                comestible: id,
                category: Category::Savoury,
            },
        );
        assert_eq!(log.comestible(id).unwrap().category, Category::Savoury);
    }

    #[test]
    fn configure_of_unknown_comestible_is_a_noop() {
        let log = log_on("2023-05-01");
        let before = log.clone();
        let log = apply(
            log,
            &Action::SetCategory {
                comestible: ComestibleId::new(),
                category: Category::Treat,
            },
        );
        assert_eq!(log, before);
    }

    #[test]
    fn measurements_overwrite_per_day_and_kind() {
        let log = log_on("2023-05-01");
        let log = apply(
            log,
            &Action::AddMeasurement {
                kind: MeasurementType::Weight,
                value: 90.0,
            },
        );
        let log = apply(
            log,
            &Action::AddMeasurement {
                kind: MeasurementType::Weight,
                value: 89.5,
            },
        );
        assert_eq!(log.measurements.len(), 1);
        assert_eq!(log.measurements[0].value, 89.5);

        // Another day gets its own measurement.
        let log = apply(log, &Action::DayAfter);
        let log = apply(
            log,
            &Action::AddMeasurement {
                kind: MeasurementType::Weight,
                value: 89.0,
            },
        );
        assert_eq!(log.measurements.len(), 2);
    }

    #[test]
    fn remove_measurement_only_touches_editing_day() {
        let log = log_on("2023-05-01");
        let log = apply(
            log,
            &Action::AddMeasurement {
                kind: MeasurementType::Waist,
                value: 100.0,
            },
        );

        let log = apply(log, &Action::DayAfter);
        let log = apply(
            log,
            &Action::RemoveMeasurement {
                kind: MeasurementType::Waist,
            },
        );
        assert_eq!(log.measurements.len(), 1);

        let log = apply(log, &Action::DayBefore);
        let log = apply(
            log,
            &Action::RemoveMeasurement {
                kind: MeasurementType::Waist,
            },
        );
        assert!(log.measurements.is_empty());
    }

    #[test]
    fn notes_edit_and_pictures() {
        let log = log_on("2023-05-01");
        let log = apply(
            log,
            &Action::EditNote {
                text: "felt great".into(),
            },
        );
        assert_eq!(log.notes.len(), 1);
        assert_eq!(log.notes[0].text, "felt great");

        let log = apply(
            log,
            &Action::EditNote {
                text: "felt fine".into(),
            },
        );
        assert_eq!(log.notes.len(), 1);
        assert_eq!(log.notes[0].text, "felt fine");

        let log = apply(
            log,
            &Action::AddNotePicture {
                id: "pic-1".into(),
                content_type: "image/jpeg".into(),
            },
        );
        assert_eq!(log.notes[0].pictures.len(), 1);

        let log = apply(
            log,
            &Action::RemoveNotePicture { id: "pic-1".into() },
        );
        assert!(log.notes[0].pictures.is_empty());

        // Removing an already-removed picture is a no-op.
        let log = apply(
            log,
            &Action::RemoveNotePicture { id: "pic-1".into() },
        );
        assert!(log.notes[0].pictures.is_empty());
    }

    #[test]
    fn picture_on_day_without_note_creates_empty_note() {
        let log = log_on("2023-05-01");
        let log = apply(
            log,
            &Action::AddNotePicture {
                id: "pic-9".into(),
                content_type: "image/png".into(),
            },
        );
        assert_eq!(log.notes.len(), 1);
        assert_eq!(log.notes[0].text, "");
        assert_eq!(log.notes[0].pictures.len(), 1);
    }

    #[test]
    fn replay_on_changed_base_preserves_local_intent() {
        // The sync layer replays queued actions on top of a freshly loaded
        // base; locally queued edits must land on the new base unchanged.
        let id = ComestibleId::new();
        let base = add_food(log_on("2023-05-01"), id, "soup", 120.0, Meal::Lunch);

        // A remote writer added its own food in the meantime.
        let remote_id = ComestibleId::new();
        let remote = add_food(base.clone(), remote_id, "roll", 150.0, Meal::Lunch);

        // Local queue recorded against the old base.
        let queued = vec![
            Action::AddAte {
                meal: Meal::Lunch,
                comestible: id,
            },
            Action::AddMeasurement {
                kind: MeasurementType::Weight,
                value: 91.0,
            },
        ];

        let mut log = remote;
        for action in &queued {
            log = apply(log, action);
        }

        let day = log.day(date("2023-05-01")).unwrap();
        let soup = day.ate.iter().find(|a| a.comestible == id).unwrap();
        assert_eq!(soup.quantity, 2);
        assert!(day.ate.iter().any(|a| a.comestible == remote_id));
        assert_eq!(log.measurements.len(), 1);
    }
}
