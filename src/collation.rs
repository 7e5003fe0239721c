//! Spanish word ordering
//!
//! Words compare by base letters first, ignoring case and accents, with `ñ`
//! as its own letter between `n` and `o`. Ties fall back to an accent-aware
//! comparison and finally to the raw strings so the order is total.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Lowercase `text` and drop diacritics, including the tilde of `ñ`
pub fn fold_accents(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Accent-insensitive sort key with `ñ` kept distinct
fn primary_key(word: &str) -> Vec<char> {
    let mut key = Vec::with_capacity(word.len());
    for c in word.to_lowercase().chars() {
        if c == 'ñ' {
            // Sorts after every n-prefixed sequence, before o
            key.push('n');
            key.push(char::MAX);
        } else {
            key.extend(std::iter::once(c).nfd().filter(|c| !is_combining_mark(*c)));
        }
    }
    key
}

/// Compare two words in Spanish dictionary order
pub fn compare_spanish(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}
