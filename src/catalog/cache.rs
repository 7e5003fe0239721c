//! Read-through cache over a word source

use std::sync::{Arc, Mutex};

use super::models::WordEntry;
use super::source::{validate_and_sort, WordSource};
use super::WordCatalog;
use crate::error::Result;

/// Loads the word list once and serves it until `invalidate` is called
pub struct CachedCatalog<S: WordSource> {
    source: S,
    words: Mutex<Option<Arc<Vec<WordEntry>>>>,
}

impl<S: WordSource> CachedCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            words: Mutex::new(None),
        }
    }

    fn cached(&self) -> Result<Arc<Vec<WordEntry>>> {
        let mut guard = self.words.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(words) = guard.as_ref() {
            return Ok(Arc::clone(words));
        }

        let words = Arc::new(validate_and_sort(self.source.load()?)?);
        log::debug!("Word catalog cached ({} words)", words.len());
        *guard = Some(Arc::clone(&words));
        Ok(words)
    }

    pub fn is_loaded(&self) -> bool {
        self.words
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl<S: WordSource> WordCatalog for CachedCatalog<S> {
    fn list_all(&self) -> Result<Vec<WordEntry>> {
        Ok(self.cached()?.as_ref().clone())
    }

    fn find(&self, word: &str) -> Result<Option<WordEntry>> {
        Ok(self.cached()?.iter().find(|entry| entry.word == word).cloned())
    }

    fn invalidate(&self) {
        let mut guard = self.words.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        log::info!("Word catalog cache invalidated");
    }
}
