//! Command implementations.

use crate::Commands;
use chrono::NaiveDate;
use slimlog_model::{Action, ComestibleId, DietLog, MEALS};
use slimlog_store::BlobStore;
use slimlog_sync::{DietReducer, SyncEngine};
use std::error::Error;

/// The engine type the CLI composes.
pub type DiaryEngine = SyncEngine<Box<dyn BlobStore>, DietReducer>;

/// Dispatches one CLI command into the engine.
pub fn run(engine: &DiaryEngine, date: NaiveDate, command: Commands) -> Result<(), Box<dyn Error>> {
    // Day-relative actions target the editing day, so position it first.
    if engine.document().editing_day != date {
        engine.dispatch(Action::SetEditingDate { date });
    }

    match command {
        Commands::Ate { meal, food } => {
            let comestible = resolve_food(&engine.document(), &food)?;
            engine.dispatch(Action::AddAte { meal, comestible });
            println!("{food} at {meal}");
        }

        Commands::Delete { meal, food } => {
            let comestible = resolve_food(&engine.document(), &food)?;
            engine.dispatch(Action::DeleteAte { meal, comestible });
            println!("removed one {food} from {meal}");
        }

        Commands::AddFood {
            name,
            calories,
            category,
            meal,
        } => {
            if engine.document().comestible_by_label(&name).is_some() {
                return Err(format!("food '{name}' already exists").into());
            }
            engine.dispatch(Action::AddComestible {
                id: ComestibleId::new(),
                label: name.clone(),
                calories,
                category,
                meal,
            });
            println!("added {name} ({calories} kcal, {category}) at {meal}");
        }

        Commands::Measure { kind, value } => {
            engine.dispatch(Action::AddMeasurement { kind, value });
            println!("{kind}: {value}");
        }

        Commands::Note { text } => {
            engine.dispatch(Action::EditNote { text });
            println!("note saved");
        }

        Commands::Show => show_day(&engine.document(), date),

        Commands::Foods => {
            let log = engine.document();
            if log.comestibles.is_empty() {
                println!("no foods configured");
            }
            for c in &log.comestibles {
                println!("{}  {} kcal  [{}]", c.label, c.calories, c.category);
            }
        }
    }

    Ok(())
}

fn resolve_food(log: &DietLog, name: &str) -> Result<ComestibleId, Box<dyn Error>> {
    log.comestible_by_label(name)
        .map(|c| c.id)
        .ok_or_else(|| format!("unknown food '{name}'; configure it with add-food").into())
}

fn show_day(log: &DietLog, date: NaiveDate) {
    println!("{date}  ({} kcal)", log.day_calories(date));

    if let Some(day) = log.day(date) {
        for meal in MEALS {
            for ate in day.ate.iter().filter(|a| a.meal == meal) {
                let (label, calories) = match log.comestible(ate.comestible) {
                    Some(c) => (c.label.as_str(), c.calories * f64::from(ate.quantity)),
                    None => ("(unknown)", 0.0),
                };
                println!("  {meal}: {label} x{} ({calories} kcal)", ate.quantity);
            }
        }
    }

    for m in log.measurements.iter().filter(|m| m.date == date) {
        println!("  {}: {}", m.kind, m.value);
    }

    if let Some(note) = log.notes.iter().find(|n| n.date == date) {
        if !note.text.is_empty() {
            println!("  note: {}", note.text);
        }
        for picture in &note.pictures {
            println!("  picture: {} ({})", picture.id, picture.content_type);
        }
    }
}
