//! Data models for the ranked vocabulary catalog

use serde::{Deserialize, Serialize};

/// One sense of a catalog word, shown alongside a test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    /// Part of speech
    pub pos: String,
    pub gloss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

/// A vocabulary word and its frequency rank (1 = most frequent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub word: String,
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<WordSense>,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, rank: u32) -> Self {
        Self {
            word: word.into(),
            rank,
            entries: Vec::new(),
        }
    }
}
