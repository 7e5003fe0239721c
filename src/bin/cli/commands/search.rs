use anyhow::{Context, Result};

use repaso_lib::roster::GlossQuery;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, query: &GlossQuery, format: &OutputFormat, use_color: bool) -> Result<()> {
    let matches = app
        .engine
        .search_glosses(query)
        .context("Failed to search glosses")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        OutputFormat::Plain => {
            if matches.is_empty() {
                println!("No matching senses.");
                return Ok(());
            }

            let word_width = matches
                .iter()
                .map(|m| m.word.chars().count())
                .max()
                .unwrap_or(4)
                .max(4);

            for m in &matches {
                let padding = word_width - m.word.chars().count();
                println!(
                    "{}{}  {:>6}  {:<6}  {}",
                    terminal::paint(&m.word, Color::BOLD, use_color),
                    " ".repeat(padding),
                    m.rank,
                    m.sense.pos,
                    m.sense.gloss
                );
            }
            println!("\n{} senses", matches.len());
        }
    }

    Ok(())
}
