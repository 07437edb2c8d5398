//! Store trait defining the work-store contract
//!
//! The pipeline only talks to storage through this trait, so tests can
//! substitute an in-memory database and the SQLite layout stays private.

use crate::store::{ArtifactRecord, BookRecord, BookSummary, CatalogueEntry, NewEntry, RunStatus};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Entry not found for url: {0}")]
    EntryNotFound(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The durable work store behind the harvest pipeline
///
/// Every write is synchronous and committed before the call returns.
/// Insert operations are idempotent: re-discovering known books or entries
/// is a no-op, never an error.
pub trait Store {
    // ===== Run Tracking =====

    /// Records the start of a harvest pass and returns its id
    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64>;

    /// Marks a pass finished with the given terminal status
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StoreResult<()>;

    // ===== Discovery =====

    /// Inserts a book if absent; an existing record is left untouched
    fn upsert_book(&mut self, book: &BookRecord) -> StoreResult<()>;

    /// Bulk-inserts catalogue entries, skipping any URL already present.
    /// Returns the number of rows actually inserted.
    fn upsert_entries(&mut self, entries: &[NewEntry]) -> StoreResult<usize>;

    /// Commits one completed catalogue walk atomically: the book record and
    /// all of its entries land in a single transaction, so a failure
    /// persists nothing from the walk. Returns the number of new entries.
    fn record_discovery(&mut self, book: &BookRecord, entries: &[NewEntry]) -> StoreResult<usize>;

    // ===== Fetch Queue =====

    /// Returns entries whose body has not been fetched yet, in insertion
    /// order. Entries marked Fail are included (they are retried).
    fn pending_entries(&self, book_id: &str) -> StoreResult<Vec<CatalogueEntry>>;

    /// Transitions one entry to Used. Marking an already-used entry again
    /// is a no-op.
    fn mark_used(&mut self, url: &str) -> StoreResult<()>;

    /// Leaves a Fail marker on an entry whose fetch aborted the pass.
    /// The entry stays pending.
    fn mark_failed(&mut self, url: &str) -> StoreResult<()>;

    /// Records where a chapter's body was written, if not already recorded
    /// for that (book, chapter) pair
    fn record_artifact(&mut self, artifact: &ArtifactRecord) -> StoreResult<()>;

    // ===== Lookups =====

    fn lookup_book_id(&self, book_name: &str) -> StoreResult<Option<String>>;

    fn get_book(&self, book_id: &str) -> StoreResult<Option<BookRecord>>;

    /// Per-book progress counts, ordered by book name
    fn book_summaries(&self) -> StoreResult<Vec<BookSummary>>;
}
