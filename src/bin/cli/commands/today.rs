use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let items = app
        .engine
        .due_items(&app.user_id, app.today)
        .context("Failed to load today's tests")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("Nothing due on {}.", app.today);
                return Ok(());
            }

            println!("{}", terminal::render_table(&items, app.today, use_color));

            let remaining = items.iter().filter(|i| !i.record.test_completed).count();
            println!("\n{} of {} left for {}", remaining, items.len(), app.today);
        }
    }

    Ok(())
}
