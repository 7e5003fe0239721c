use chrono::NaiveDate;
use repaso_lib::schedule::algorithm::format_interval;
use repaso_lib::schedule::{TestRecord, WordWithRecord};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn last_tested(record: &TestRecord, today: NaiveDate) -> String {
    if record.is_never_tested() {
        return "never".to_string();
    }
    match record.days_since_last_test(today) {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

/// Aligned table of words and their records
pub fn render_table(items: &[WordWithRecord], today: NaiveDate, use_color: bool) -> String {
    let word_width = items
        .iter()
        .map(|i| i.entry.word.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut lines = vec![
        format!(
            "{:<width$}  {:>6}  {:>8}  {:>6}  {:<12}  Done",
            "Word",
            "Rank",
            "Interval",
            "Trials",
            "Last test",
            width = word_width
        ),
        "\u{2500}".repeat(word_width + 48),
    ];

    for item in items {
        let record = &item.record;
        let done = if record.test_completed {
            paint("yes", Color::GREEN, use_color)
        } else {
            paint("no", Color::YELLOW, use_color)
        };
        // Pad by character count so accented words line up
        let padding = word_width - item.entry.word.chars().count();
        lines.push(format!(
            "{}{}  {:>6}  {:>8}  {:>6}  {:<12}  {}",
            item.entry.word,
            " ".repeat(padding),
            item.entry.rank,
            format!("{:.2}", record.average_days_between_tests),
            record.number_of_trials,
            last_tested(record, today),
            done
        ));
    }

    lines.join("\n")
}

pub fn describe_interval(days: f64) -> String {
    format!("{:.2} days (~{})", days, format_interval(days))
}
