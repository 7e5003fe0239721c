use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, word: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let item = app
        .engine
        .record(&app.user_id, word)
        .with_context(|| format!("Failed to look up '{}'", word))?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&item)?);
        return Ok(());
    }

    let record = &item.record;
    println!(
        "{} (rank {})",
        terminal::paint(&item.entry.word, Color::BOLD, use_color),
        item.entry.rank
    );

    for sense in &item.entry.entries {
        let mut line = format!("  {}: {}", sense.pos, sense.gloss);
        if let Some(gender) = &sense.gender {
            line.push_str(&format!(" ({})", gender));
        }
        println!("{}", line);
        if let Some(example) = &sense.example {
            let translation = sense
                .translation
                .as_deref()
                .map(|t| format!(" / {}", t))
                .unwrap_or_default();
            println!("{}", terminal::paint(&format!("    {}{}", example, translation), Color::DIM, use_color));
        }
    }

    println!();
    println!("Interval:   {}", terminal::describe_interval(record.average_days_between_tests));
    println!("Trials:     {}", record.number_of_trials);
    println!("Last test:  {}", terminal::last_tested(record, app.today));
    println!("Completed:  {}", if record.test_completed { "yes" } else { "no" });
    if !record.user_notes.is_empty() {
        println!("Notes:      {}", html_escape::decode_html_entities(&record.user_notes));
    }

    Ok(())
}
