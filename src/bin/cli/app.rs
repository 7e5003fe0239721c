use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use repaso_lib::config::Config;
use repaso_lib::schedule::parse_date;
use repaso_lib::{open_file_engine, FileEngine};

/// Shared application state for CLI commands
pub struct App {
    pub engine: FileEngine,
    pub user_id: String,
    pub today: NaiveDate,
}

impl App {
    pub fn new(config_path: Option<&Path>, user_id: &str, date: Option<&str>) -> Result<Self> {
        let config = Config::discover(config_path).context("Failed to load config")?;

        let today = match date {
            Some(d) => parse_date(d)?,
            None => Local::now().date_naive(),
        };

        let engine = open_file_engine(&config).context("Failed to open data directory")?;
        engine
            .profiles()
            .visit(user_id, today)
            .context("Failed to load profile")?;

        Ok(Self {
            engine,
            user_id: user_id.trim().to_string(),
            today,
        })
    }
}
