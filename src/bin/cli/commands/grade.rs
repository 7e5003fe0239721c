use anyhow::{Context, Result};

use repaso_lib::schedule::RecordUpdate;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub enum Adjust {
    Widen,
    Narrow,
    Keep,
}

pub fn run(
    app: &App,
    word: &str,
    adjust: Adjust,
    notes: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let mut item = app
        .engine
        .record(&app.user_id, word)
        .with_context(|| format!("Failed to look up '{}'", word))?;

    match adjust {
        Adjust::Widen => item.record.widen(),
        Adjust::Narrow => item.record.narrow(),
        Adjust::Keep => {}
    }
    if let Some(notes) = notes {
        item.record.user_notes = notes;
    }
    item.record.complete(app.today);

    let stored = app
        .engine
        .submit_grade(&app.user_id, word, RecordUpdate::from_record(&item.record))
        .with_context(|| format!("Failed to save '{}'", word))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        OutputFormat::Plain => {
            println!(
                "Saved '{}': next interval {}, {} trials",
                stored.word,
                terminal::describe_interval(stored.average_days_between_tests),
                stored.number_of_trials
            );
        }
    }

    Ok(())
}
