//! Ranked Spanish vocabulary catalog
//!
//! The catalog is read-only for the scheduling engine. It is served through
//! `CachedCatalog`, which loads a `WordSource` once and keeps it until the
//! host calls `invalidate`.

mod cache;
pub mod models;
mod source;

pub use cache::CachedCatalog;
pub use models::*;
pub use source::{FileWordSource, StaticWordSource, WordSource};

use crate::error::Result;

/// Read access to the ranked word list
pub trait WordCatalog: Send + Sync {
    /// All words, ordered by rank
    fn list_all(&self) -> Result<Vec<WordEntry>>;

    fn find(&self, word: &str) -> Result<Option<WordEntry>> {
        Ok(self.list_all()?.into_iter().find(|entry| entry.word == word))
    }

    /// Drop any cached copy so the next read goes to the source
    fn invalidate(&self) {}
}
