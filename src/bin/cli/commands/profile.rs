use anyhow::{Context, Result};

use repaso_lib::profile::ProfileUpdate;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    tests_per_day: Option<i32>,
    name: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let profiles = app.engine.profiles();

    let profile = if tests_per_day.is_some() || name.is_some() {
        let update = ProfileUpdate {
            preferred_name: name,
            tests_per_day,
        };
        profiles
            .update_profile(&app.user_id, update, app.today)
            .context("Failed to update profile")?
    } else {
        profiles
            .get_profile(&app.user_id)?
            .context("Profile not found")?
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        OutputFormat::Plain => {
            println!("User:          {}", profile.user_id);
            if let Some(name) = &profile.preferred_name {
                println!("Name:          {}", html_escape::decode_html_entities(name));
            }
            println!("Words per day: {}", profile.tests_per_day);
            println!("Last tests:    {}", profile.last_test_date);
            println!("First visit:   {}", profile.first_visit_date);
        }
    }

    Ok(())
}
