//! SQLite implementation of the work store

use crate::store::schema::initialize_schema;
use crate::store::traits::{Store, StoreError, StoreResult};
use crate::store::{
    ArtifactRecord, BookRecord, BookSummary, CatalogueEntry, CrawlStatus, NewEntry, RunStatus,
};
use crate::BinderyError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite work store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema
    /// exists
    pub fn new(path: &Path) -> Result<Self, BinderyError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, BinderyError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn insert_book(conn: &Connection, book: &BookRecord) -> Result<(), rusqlite::Error> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR IGNORE INTO books (book_id, name, author, category, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            book.book_id,
            book.name,
            book.author,
            book.category,
            book.status,
            now
        ],
    )?;
    Ok(())
}

fn insert_entries(conn: &Connection, entries: &[NewEntry]) -> Result<usize, rusqlite::Error> {
    let now = Utc::now().to_rfc3339();
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO catalogue (book_id, book_name, chapter, url, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    let mut inserted = 0;
    for entry in entries {
        inserted += stmt.execute(params![
            entry.book_id,
            entry.book_name,
            entry.chapter,
            entry.url,
            CrawlStatus::Unused.to_db_string(),
            now
        ])?;
    }
    Ok(inserted)
}

impl Store for SqliteStore {
    // ===== Run Tracking =====

    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if changed == 0 {
            return Err(StoreError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Discovery =====

    fn upsert_book(&mut self, book: &BookRecord) -> StoreResult<()> {
        insert_book(&self.conn, book)?;
        Ok(())
    }

    fn upsert_entries(&mut self, entries: &[NewEntry]) -> StoreResult<usize> {
        Ok(insert_entries(&self.conn, entries)?)
    }

    fn record_discovery(&mut self, book: &BookRecord, entries: &[NewEntry]) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        insert_book(&tx, book)?;
        let inserted = insert_entries(&tx, entries)?;
        tx.commit()?;
        Ok(inserted)
    }

    // ===== Fetch Queue =====

    fn pending_entries(&self, book_id: &str) -> StoreResult<Vec<CatalogueEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, book_id, book_name, chapter, url, status, created_at
             FROM catalogue WHERE book_id = ?1 AND status != ?2 ORDER BY id",
        )?;

        let entries = stmt
            .query_map(
                params![book_id, CrawlStatus::Used.to_db_string()],
                |row| {
                    Ok(CatalogueEntry {
                        id: row.get(0)?,
                        book_id: row.get(1)?,
                        book_name: row.get(2)?,
                        chapter: row.get(3)?,
                        url: row.get(4)?,
                        status: CrawlStatus::from_db_string(&row.get::<_, String>(5)?)
                            .unwrap_or(CrawlStatus::Unused),
                        created_at: row.get(6)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn mark_used(&mut self, url: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE catalogue SET status = ?1, updated_at = ?2 WHERE url = ?3",
            params![CrawlStatus::Used.to_db_string(), now, url],
        )?;
        if changed == 0 {
            return Err(StoreError::EntryNotFound(url.to_string()));
        }
        Ok(())
    }

    fn mark_failed(&mut self, url: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        // Never move an entry backwards out of Used
        self.conn.execute(
            "UPDATE catalogue SET status = ?1, updated_at = ?2 WHERE url = ?3 AND status != ?4",
            params![
                CrawlStatus::Fail.to_db_string(),
                now,
                url,
                CrawlStatus::Used.to_db_string()
            ],
        )?;
        Ok(())
    }

    fn record_artifact(&mut self, artifact: &ArtifactRecord) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO artifacts (book_id, book_name, chapter, path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                artifact.book_id,
                artifact.book_name,
                artifact.chapter,
                artifact.path,
                now
            ],
        )?;
        Ok(())
    }

    // ===== Lookups =====

    fn lookup_book_id(&self, book_name: &str) -> StoreResult<Option<String>> {
        let book_id = self
            .conn
            .query_row(
                "SELECT book_id FROM books WHERE name = ?1",
                params![book_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(book_id)
    }

    fn get_book(&self, book_id: &str) -> StoreResult<Option<BookRecord>> {
        let book = self
            .conn
            .query_row(
                "SELECT book_id, name, author, category, status FROM books WHERE book_id = ?1",
                params![book_id],
                |row| {
                    Ok(BookRecord {
                        book_id: row.get(0)?,
                        name: row.get(1)?,
                        author: row.get(2)?,
                        category: row.get(3)?,
                        status: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(book)
    }

    fn book_summaries(&self) -> StoreResult<Vec<BookSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.book_id, b.name,
                (SELECT COUNT(*) FROM catalogue c WHERE c.book_id = b.book_id),
                (SELECT COUNT(*) FROM catalogue c WHERE c.book_id = b.book_id AND c.status = ?1),
                (SELECT COUNT(*) FROM catalogue c WHERE c.book_id = b.book_id AND c.status = ?2),
                (SELECT COUNT(*) FROM artifacts a WHERE a.book_id = b.book_id)
             FROM books b ORDER BY b.name",
        )?;

        let summaries = stmt
            .query_map(
                params![
                    CrawlStatus::Used.to_db_string(),
                    CrawlStatus::Fail.to_db_string()
                ],
                |row| {
                    Ok(BookSummary {
                        book_id: row.get(0)?,
                        name: row.get(1)?,
                        total_entries: row.get::<_, i64>(2)? as u64,
                        used: row.get::<_, i64>(3)? as u64,
                        failed: row.get::<_, i64>(4)? as u64,
                        artifacts: row.get::<_, i64>(5)? as u64,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }
}
