//! Article fetcher
//!
//! Drains the pending-entry queue for one book, one chapter at a time:
//! follow the chapter's own pagination, normalize the concatenated text,
//! write the artifact file, record it, mark the entry used. The status
//! flip happens before the next entry starts, so a crash loses at most the
//! in-flight chapter; the artifact write is idempotent by path, so the
//! refetch on restart is harmless.

use crate::harvest::fetcher::fetch_html;
use crate::harvest::paths::artifact_path;
use crate::page::{normalize_body, PageAdapter};
use crate::store::{ArtifactRecord, Store};
use crate::{BinderyError, Result};
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Fetches one chapter's complete body by following its next-links
///
/// Pages are concatenated in order and normalized once at the end.
/// Bounded by `max_pages` against cyclic pagination.
pub async fn chapter_body<A: PageAdapter>(
    client: &Client,
    adapter: &A,
    start: &Url,
    max_pages: u32,
) -> Result<String> {
    let mut raw = String::new();
    let mut next = Some(start.clone());
    let mut pages = 0u32;

    while let Some(url) = next {
        if pages >= max_pages {
            return Err(BinderyError::PageLimit {
                url: start.to_string(),
                limit: max_pages,
            });
        }
        pages += 1;

        let html = fetch_html(client, &url).await?;

        let text = adapter
            .chapter_text(&html)
            .map_err(|source| BinderyError::Parse {
                url: url.to_string(),
                source,
            })?;
        if !raw.is_empty() {
            raw.push('\n');
        }
        raw.push_str(&text);

        next = adapter
            .next_chapter_page(&html, &url)
            .map_err(|source| BinderyError::Parse {
                url: url.to_string(),
                source,
            })?;
    }

    Ok(normalize_body(&raw))
}

/// Fetches every pending entry of the named book
///
/// Entries are processed in store order. A fetch failure leaves a Fail
/// marker on the in-flight entry and aborts the pass; the entry stays
/// pending and is retried on the next pass. Returns the number of chapters
/// stored.
pub async fn fetch_pending<A: PageAdapter, S: Store>(
    client: &Client,
    adapter: &A,
    store: &mut S,
    library_dir: &Path,
    book_name: &str,
    max_pages: u32,
) -> Result<usize> {
    let book_id = store
        .lookup_book_id(book_name)?
        .ok_or_else(|| BinderyError::BookNotFound(book_name.to_string()))?;

    let pending = store.pending_entries(&book_id)?;
    tracing::info!(book = book_name, pending = pending.len(), "fetching chapters");

    let mut stored = 0;
    for entry in pending {
        let start = Url::parse(&entry.url)?;

        let body = match chapter_body(client, adapter, &start, max_pages).await {
            Ok(body) => body,
            Err(e) => {
                store.mark_failed(&entry.url)?;
                return Err(e);
            }
        };

        let path = artifact_path(library_dir, &entry.book_name, &entry.chapter);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        // Whole-file overwrite: same input, same output, so replaying a
        // partially-completed entry is safe
        std::fs::write(&path, &body)?;

        store.record_artifact(&ArtifactRecord {
            book_id: entry.book_id.clone(),
            book_name: entry.book_name.clone(),
            chapter: entry.chapter.clone(),
            path: path.display().to_string(),
        })?;
        store.mark_used(&entry.url)?;

        stored += 1;
        tracing::info!(
            book = %entry.book_name,
            chapter = %entry.chapter,
            path = %path.display(),
            "chapter stored"
        );
    }

    Ok(stored)
}
