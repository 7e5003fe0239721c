//! Word sources backing the catalog
//!
//! Supported files:
//! ```text
//! words.json   # Array of WordEntry objects
//! words.csv    # word,rank[,pos,gloss,translation] with a header row
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use super::models::{WordEntry, WordSense};
use crate::error::{RepasoError, Result};

/// Loads the full vocabulary list from its backing storage
pub trait WordSource: Send + Sync {
    fn load(&self) -> Result<Vec<WordEntry>>;
}

/// Fixed in-memory word list
#[derive(Debug, Clone, Default)]
pub struct StaticWordSource {
    words: Vec<WordEntry>,
}

impl StaticWordSource {
    pub fn new(words: Vec<WordEntry>) -> Self {
        Self { words }
    }
}

impl WordSource for StaticWordSource {
    fn load(&self) -> Result<Vec<WordEntry>> {
        Ok(self.words.clone())
    }
}

/// Word list stored in a JSON or CSV file, picked by extension
#[derive(Debug, Clone)]
pub struct FileWordSource {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvWordRow {
    word: String,
    rank: u32,
    #[serde(default)]
    pos: Option<String>,
    #[serde(default)]
    gloss: Option<String>,
    #[serde(default)]
    translation: Option<String>,
}

impl CsvWordRow {
    fn into_entry(self) -> WordEntry {
        let mut entry = WordEntry::new(self.word.trim(), self.rank);
        if let Some(gloss) = self.gloss.filter(|g| !g.trim().is_empty()) {
            entry.entries.push(WordSense {
                pos: self.pos.unwrap_or_default(),
                gloss,
                translation: self.translation.filter(|t| !t.trim().is_empty()),
                ..WordSense::default()
            });
        }
        entry
    }
}

impl FileWordSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_json(&self) -> Result<Vec<WordEntry>> {
        let content = fs::read_to_string(&self.path)?;
        let words: Vec<WordEntry> = serde_json::from_str(&content)?;
        Ok(words)
    }

    fn load_csv(&self) -> Result<Vec<WordEntry>> {
        let content = fs::read_to_string(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut words = Vec::new();
        for row in reader.deserialize::<CsvWordRow>() {
            words.push(row?.into_entry());
        }
        Ok(words)
    }
}

impl WordSource for FileWordSource {
    fn load(&self) -> Result<Vec<WordEntry>> {
        if !self.path.exists() {
            return Err(RepasoError::NotFound(format!(
                "Word list {}",
                self.path.display()
            )));
        }

        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let words = match extension.as_str() {
            "json" => self.load_json()?,
            "csv" => self.load_csv()?,
            other => return Err(RepasoError::UnsupportedFormat(other.to_string())),
        };

        log::info!("Loaded {} words from {}", words.len(), self.path.display());
        Ok(words)
    }
}

/// Check word/rank uniqueness and sort by rank
pub(crate) fn validate_and_sort(mut words: Vec<WordEntry>) -> Result<Vec<WordEntry>> {
    let mut seen_words: HashSet<String> = HashSet::new();
    let mut seen_ranks = HashSet::new();

    for entry in &words {
        if entry.word.is_empty() {
            return Err(RepasoError::Validation("Empty word in catalog".to_string()));
        }
        if entry.rank == 0 {
            return Err(RepasoError::Validation(format!(
                "Word '{}' has rank 0; ranks start at 1",
                entry.word
            )));
        }
        if !seen_words.insert(entry.word.clone()) {
            return Err(RepasoError::Validation(format!(
                "Duplicate word in catalog: {}",
                entry.word
            )));
        }
        if !seen_ranks.insert(entry.rank) {
            return Err(RepasoError::Validation(format!(
                "Duplicate rank in catalog: {}",
                entry.rank
            )));
        }
    }

    words.sort_by_key(|entry| entry.rank);
    Ok(words)
}
