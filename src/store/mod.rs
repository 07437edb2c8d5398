//! Work store for persisting harvest state
//!
//! This module is the single source of truth for what remains to be done:
//! discovered books, their catalogue entries with crawl status, chapter
//! artifact locations, and per-pass run records. The catalogue walker and
//! article fetcher are stateless processors that read and write through it,
//! which is what makes restart-safety possible.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{Store, StoreError, StoreResult};

/// A discovered book, created once on first discovery and never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    /// Stable identifier derived from the catalogue root URL
    pub book_id: String,
    pub name: String,
    pub author: String,
    pub category: String,
    /// Publication status as reported by the source (e.g. "Ongoing")
    pub status: String,
}

/// One chapter's entry in the work queue
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    pub id: i64,
    pub book_id: String,
    pub book_name: String,
    pub chapter: String,
    pub url: String,
    pub status: CrawlStatus,
    pub created_at: String,
}

/// A catalogue entry about to be inserted; status starts as Unused
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub book_id: String,
    pub book_name: String,
    pub chapter: String,
    pub url: String,
}

/// Location of one chapter's persisted body text
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub book_id: String,
    pub book_name: String,
    pub chapter: String,
    pub path: String,
}

/// Per-book progress counts for the --stats view
#[derive(Debug, Clone)]
pub struct BookSummary {
    pub book_id: String,
    pub name: String,
    pub total_entries: u64,
    pub used: u64,
    pub failed: u64,
    pub artifacts: u64,
}

/// Crawl status of a catalogue entry
///
/// Transitions only move forward: Unused -> Used. Fail is a diagnostic
/// marker left on the in-flight entry when its fetch aborts a pass; failed
/// entries are still pending and are retried on the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStatus {
    Unused,
    Used,
    Fail,
}

impl CrawlStatus {
    /// Returns true if the entry's body still needs to be fetched
    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::Used)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Used => "used",
            Self::Fail => "fail",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "unused" => Some(Self::Unused),
            "used" => Some(Self::Used),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Status of a harvest pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
