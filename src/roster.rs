//! Filtering and sorting of a learner's full word roster, and search of
//! catalog senses by their English gloss

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{WordEntry, WordSense};
use crate::collation::{compare_spanish, fold_accents};
use crate::error::{RepasoError, Result};
use crate::schedule::WordWithRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    #[default]
    Word,
    Rank,
    Interval,
    Trials,
    DaysSinceLastTest,
}

impl FromStr for SortColumn {
    type Err = RepasoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "rank" => Ok(Self::Rank),
            "interval" => Ok(Self::Interval),
            "trials" => Ok(Self::Trials),
            "last" | "days-since" => Ok(Self::DaysSinceLastTest),
            other => Err(RepasoError::Validation(format!("Unknown sort column: {}", other))),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "word",
            Self::Rank => "rank",
            Self::Interval => "interval",
            Self::Trials => "trials",
            Self::DaysSinceLastTest => "days-since",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Search and sort options for the roster listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterQuery {
    /// Accent-insensitive substring of the word
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortColumn,
    #[serde(default)]
    pub direction: SortDirection,
}

impl RosterQuery {
    pub fn matches(&self, item: &WordWithRecord) -> bool {
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                fold_accents(&item.entry.word).contains(&fold_accents(term))
            }
            _ => true,
        }
    }

    fn compare(&self, a: &WordWithRecord, b: &WordWithRecord, today: NaiveDate) -> Ordering {
        let ordering = match self.sort {
            SortColumn::Word => Ordering::Equal,
            SortColumn::Rank => a.entry.rank.cmp(&b.entry.rank),
            SortColumn::Interval => a
                .record
                .average_days_between_tests
                .total_cmp(&b.record.average_days_between_tests),
            SortColumn::Trials => a.record.number_of_trials.cmp(&b.record.number_of_trials),
            SortColumn::DaysSinceLastTest => a
                .record
                .days_since_last_test(today)
                .cmp(&b.record.days_since_last_test(today)),
        }
        .then_with(|| compare_spanish(&a.entry.word, &b.entry.word));

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn apply(&self, items: Vec<WordWithRecord>, today: NaiveDate) -> Vec<WordWithRecord> {
        let mut items: Vec<WordWithRecord> = items.into_iter().filter(|i| self.matches(i)).collect();
        items.sort_by(|a, b| self.compare(a, b, today));
        items
    }
}

/// One term of a gloss search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchToken {
    /// Quoted text, matched anywhere in the gloss
    Phrase(String),
    /// Bare word, matched on word boundaries
    Word(String),
}

/// Split search input into folded tokens.
///
/// Input with an unbalanced `"` yields no tokens at all.
pub fn tokenize(text: &str) -> Vec<SearchToken> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN.get_or_init(|| Regex::new(r#""([^"]+)"|(\S+)"#).unwrap());

    if text.trim().is_empty() || text.matches('"').count() % 2 != 0 {
        return Vec::new();
    }

    re.captures_iter(text)
        .filter_map(|caps| {
            if let Some(phrase) = caps.get(1) {
                Some(SearchToken::Phrase(fold_accents(phrase.as_str())))
            } else {
                caps.get(2).map(|word| SearchToken::Word(fold_accents(word.as_str())))
            }
        })
        .collect()
}

enum Matcher {
    Phrase(String),
    Word(Regex),
}

impl Matcher {
    fn compile(tokens: Vec<SearchToken>) -> Result<Vec<Self>> {
        tokens
            .into_iter()
            .map(|token| match token {
                SearchToken::Phrase(phrase) => Ok(Self::Phrase(phrase)),
                SearchToken::Word(word) => Regex::new(&format!(r"\b{}\b", regex::escape(&word)))
                    .map(Self::Word)
                    .map_err(|e| RepasoError::Validation(format!("Bad search term '{}': {}", word, e))),
            })
            .collect()
    }

    fn is_match(&self, folded_gloss: &str) -> bool {
        match self {
            Self::Phrase(phrase) => folded_gloss.contains(phrase.as_str()),
            Self::Word(re) => re.is_match(folded_gloss),
        }
    }
}

/// Search of catalog senses by gloss, part of speech and lemma
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossQuery {
    /// Every token must occur in the gloss
    #[serde(default)]
    pub contains: String,
    /// No token may occur in the gloss
    #[serde(default)]
    pub excludes: String,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub lemma: Option<String>,
}

/// A catalog sense matched by a `GlossQuery`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossMatch {
    pub word: String,
    pub rank: u32,
    /// Position of the sense within its word's entries
    pub sense_index: usize,
    pub sense: WordSense,
}

impl GlossQuery {
    /// Matching senses, in catalog order
    pub fn apply(&self, catalog: &[WordEntry]) -> Result<Vec<GlossMatch>> {
        let required = Matcher::compile(tokenize(&self.contains))?;
        let excluded = Matcher::compile(tokenize(&self.excludes))?;

        let mut matches = Vec::new();
        for entry in catalog {
            for (sense_index, sense) in entry.entries.iter().enumerate() {
                if let Some(pos) = &self.pos {
                    if &sense.pos != pos {
                        continue;
                    }
                }
                if self.lemma.is_some() && sense.lemma != self.lemma {
                    continue;
                }

                let gloss = fold_accents(&sense.gloss);
                if !required.iter().all(|m| m.is_match(&gloss))
                    || excluded.iter().any(|m| m.is_match(&gloss))
                {
                    continue;
                }

                matches.push(GlossMatch {
                    word: entry.word.clone(),
                    rank: entry.rank,
                    sense_index,
                    sense: sense.clone(),
                });
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WordEntry;
    use crate::schedule::TestRecord;

    fn item(word: &str, rank: u32, interval: f64, trials: u32) -> WordWithRecord {
        let entry = WordEntry::new(word, rank);
        let mut record = TestRecord::new(&entry);
        record.average_days_between_tests = interval;
        record.number_of_trials = trials;
        WordWithRecord { entry, record }
    }

    fn words(items: &[WordWithRecord]) -> Vec<&str> {
        items.iter().map(|i| i.entry.word.as_str()).collect()
    }

    fn roster() -> Vec<WordWithRecord> {
        vec![
            item("niño", 310, 4.0, 2),
            item("que", 1, 1.0, 7),
            item("árbol", 900, 90.0, 0),
            item("nada", 150, 15.0, 2),
        ]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_default_sorts_by_word() {
        let sorted = RosterQuery::default().apply(roster(), today());
        assert_eq!(words(&sorted), vec!["árbol", "nada", "niño", "que"]);
    }

    #[test]
    fn test_sort_by_rank_desc() {
        let query = RosterQuery {
            sort: SortColumn::Rank,
            direction: SortDirection::Desc,
            ..RosterQuery::default()
        };
        let sorted = query.apply(roster(), today());
        assert_eq!(words(&sorted), vec!["árbol", "niño", "nada", "que"]);
    }

    #[test]
    fn test_sort_by_trials_ties_by_word() {
        let query = RosterQuery {
            sort: SortColumn::Trials,
            ..RosterQuery::default()
        };
        let sorted = query.apply(roster(), today());
        assert_eq!(words(&sorted), vec!["árbol", "nada", "niño", "que"]);
    }

    #[test]
    fn test_sort_by_days_since_last_test() {
        let mut items = roster();
        items[1].record.last_test_date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        items[3].record.last_test_date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        let query = RosterQuery {
            sort: SortColumn::DaysSinceLastTest,
            ..RosterQuery::default()
        };
        let sorted = query.apply(items, today());
        assert_eq!(words(&sorted), vec!["que", "nada", "árbol", "niño"]);
    }

    #[test]
    fn test_search_ignores_accents() {
        let query = RosterQuery {
            search: Some("ARB".to_string()),
            ..RosterQuery::default()
        };
        assert_eq!(words(&query.apply(roster(), today())), vec!["árbol"]);

        let query = RosterQuery {
            search: Some("nin".to_string()),
            ..RosterQuery::default()
        };
        assert_eq!(words(&query.apply(roster(), today())), vec!["niño"]);
    }

    fn sense(pos: &str, lemma: &str, gloss: &str) -> WordSense {
        WordSense {
            lemma: Some(lemma.to_string()),
            pos: pos.to_string(),
            gloss: gloss.to_string(),
            ..WordSense::default()
        }
    }

    fn catalog() -> Vec<WordEntry> {
        let mut banco = WordEntry::new("banco", 420);
        banco.entries = vec![
            sense("noun", "banco", "bank (financial institution)"),
            sense("noun", "banco", "bench, seat"),
        ];
        let mut banca = WordEntry::new("banca", 3100);
        banca.entries = vec![sense("noun", "banca", "banking, the banking sector")];
        let mut sentar = WordEntry::new("sentar", 900);
        sentar.entries = vec![sense("verb", "sentar", "to seat, to sit down")];
        let mut cafe = WordEntry::new("café", 700);
        cafe.entries = vec![sense("noun", "café", "café, coffee shop")];
        vec![banco, cafe, sentar, banca]
    }

    fn found(query: &GlossQuery) -> Vec<(String, usize)> {
        query
            .apply(&catalog())
            .unwrap()
            .into_iter()
            .map(|m| (m.word, m.sense_index))
            .collect()
    }

    fn contains(text: &str) -> GlossQuery {
        GlossQuery {
            contains: text.to_string(),
            ..GlossQuery::default()
        }
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize(r#"Bank "sit down"  Café"#),
            vec![
                SearchToken::Word("bank".to_string()),
                SearchToken::Phrase("sit down".to_string()),
                SearchToken::Word("cafe".to_string()),
            ]
        );
        assert!(tokenize("   ").is_empty());
        assert!(tokenize(r#"bank "sit"#).is_empty());
    }

    #[test]
    fn test_gloss_word_boundaries() {
        // "bank" does not match inside "banking"
        assert_eq!(found(&contains("bank")), vec![("banco".to_string(), 0)]);
        assert_eq!(found(&contains("seat")), vec![("banco".to_string(), 1), ("sentar".to_string(), 0)]);
    }

    #[test]
    fn test_gloss_phrase_is_substring() {
        assert_eq!(
            found(&contains("\"bank\"")),
            vec![("banco".to_string(), 0), ("banca".to_string(), 0)]
        );
        assert_eq!(found(&contains("\"sit down\"")), vec![("sentar".to_string(), 0)]);
    }

    #[test]
    fn test_gloss_all_tokens_required() {
        assert_eq!(found(&contains("to seat")), vec![("sentar".to_string(), 0)]);
        assert!(found(&contains("bank seat")).is_empty());
    }

    #[test]
    fn test_gloss_excludes() {
        let query = GlossQuery {
            contains: "seat".to_string(),
            excludes: "bench".to_string(),
            ..GlossQuery::default()
        };
        assert_eq!(found(&query), vec![("sentar".to_string(), 0)]);

        let query = GlossQuery {
            excludes: "\"bank\"".to_string(),
            ..GlossQuery::default()
        };
        assert_eq!(
            found(&query),
            vec![("banco".to_string(), 1), ("café".to_string(), 0), ("sentar".to_string(), 0)]
        );
    }

    #[test]
    fn test_gloss_ignores_accents_and_case() {
        assert_eq!(found(&contains("CAFE")), vec![("café".to_string(), 0)]);
        assert_eq!(found(&contains("\"Coffee Shop\"")), vec![("café".to_string(), 0)]);
    }

    #[test]
    fn test_gloss_unbalanced_quotes_match_everything() {
        assert_eq!(found(&contains("\"bank")).len(), 5);
    }

    #[test]
    fn test_gloss_pos_and_lemma_filters() {
        let query = GlossQuery {
            pos: Some("verb".to_string()),
            ..GlossQuery::default()
        };
        assert_eq!(found(&query), vec![("sentar".to_string(), 0)]);

        let query = GlossQuery {
            contains: "\"bank\"".to_string(),
            lemma: Some("banca".to_string()),
            ..GlossQuery::default()
        };
        assert_eq!(found(&query), vec![("banca".to_string(), 0)]);
    }

    #[test]
    fn test_parse_sort_column() {
        assert_eq!("Interval".parse::<SortColumn>().unwrap(), SortColumn::Interval);
        assert_eq!("days-since".parse::<SortColumn>().unwrap(), SortColumn::DaysSinceLastTest);
        assert!("color".parse::<SortColumn>().is_err());
        assert_eq!(SortColumn::Trials.to_string(), "trials");
    }
}
