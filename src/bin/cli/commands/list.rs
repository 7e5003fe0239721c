use anyhow::{Context, Result};

use repaso_lib::roster::RosterQuery;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, query: &RosterQuery, format: &OutputFormat, use_color: bool) -> Result<()> {
    let items = app
        .engine
        .roster(&app.user_id, query, app.today)
        .context("Failed to list words")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No words found.");
                return Ok(());
            }

            println!("{}", terminal::render_table(&items, app.today, use_color));
            println!("\n{} words, sorted by {}", items.len(), query.sort);
        }
    }

    Ok(())
}
