mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use repaso_lib::roster::{GlossQuery, RosterQuery, SortColumn, SortDirection};

#[derive(Parser)]
#[command(name = "repaso-cli", about = "Spanish vocabulary tests on a spaced schedule", version)]
struct Cli {
    /// Config file (default: <config dir>/repaso/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Learner the command acts for
    #[arg(long, global = true, default_value = "local")]
    user: String,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    date: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show today's words, selecting them on the first call of the day
    Today,

    /// Show one word and its test record
    Show {
        word: String,
    },

    /// Save a test: mark it completed, optionally adjusting the interval
    Grade {
        word: String,
        /// Known well: double the interval
        #[arg(long, conflicts_with = "harder")]
        easier: bool,
        /// Needs practice: halve the interval
        #[arg(long)]
        harder: bool,
        /// Replace the notes on this word
        #[arg(long)]
        notes: Option<String>,
    },

    /// List every word with its test record
    List {
        /// Accent-insensitive filter on the word
        #[arg(long)]
        search: Option<String>,
        /// word, rank, interval, trials or days-since
        #[arg(long, default_value = "word")]
        sort: SortColumn,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Search word senses by their English gloss
    Search {
        /// Terms the gloss must contain; quote a phrase to match it anywhere
        #[arg(default_value = "")]
        contains: String,
        /// Terms the gloss must not contain
        #[arg(long = "not", default_value = "")]
        excludes: String,
        /// Only this part of speech
        #[arg(long)]
        pos: Option<String>,
        /// Only senses of this lemma
        #[arg(long)]
        lemma: Option<String>,
    },

    /// Show or edit the learner profile
    Profile {
        /// Words per day (5-100)
        #[arg(long)]
        tests_per_day: Option<i32>,
        /// Preferred name
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref(), &cli.user, cli.date.as_deref())?;

    match cli.command {
        Command::Today => {
            commands::today::run(&app, &cli.format, use_color)?;
        }
        Command::Show { word } => {
            commands::show::run(&app, &word, &cli.format, use_color)?;
        }
        Command::Grade { word, easier, harder, notes } => {
            let adjust = if easier {
                commands::grade::Adjust::Widen
            } else if harder {
                commands::grade::Adjust::Narrow
            } else {
                commands::grade::Adjust::Keep
            };
            commands::grade::run(&app, &word, adjust, notes, &cli.format)?;
        }
        Command::List { search, sort, desc } => {
            let query = RosterQuery {
                search,
                sort,
                direction: if desc { SortDirection::Desc } else { SortDirection::Asc },
            };
            commands::list::run(&app, &query, &cli.format, use_color)?;
        }
        Command::Search {
            contains,
            excludes,
            pos,
            lemma,
        } => {
            let query = GlossQuery {
                contains,
                excludes,
                pos,
                lemma,
            };
            commands::search::run(&app, &query, &cli.format, use_color)?;
        }
        Command::Profile { tests_per_day, name } => {
            commands::profile::run(&app, tests_per_day, name, &cli.format)?;
        }
    }

    Ok(())
}
