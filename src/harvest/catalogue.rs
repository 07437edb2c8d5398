//! Catalogue walker
//!
//! Turns a catalogue root URL into one book record plus a complete,
//! deduplicated chapter list, committed to the work store in a single
//! transaction. A failure anywhere mid-walk persists nothing, so a restart
//! simply re-walks the same pages; URL uniqueness in the store makes the
//! re-walk idempotent.

use crate::harvest::fetcher::fetch_html;
use crate::page::{BookMeta, ChapterLink, PageAdapter};
use crate::store::{BookRecord, NewEntry, Store};
use crate::{BinderyError, Result};
use reqwest::Client;
use url::Url;

/// Derives a stable book identifier from the catalogue root URL:
/// the last non-empty path segment
pub fn book_id_from_url(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| BinderyError::BookId {
            url: url.to_string(),
        })
}

/// Follows next-links from `root`, accumulating chapter entries
///
/// Book metadata is captured from the first page only (it is stable per
/// book). The walk stops when a page has no next link, or errors out when
/// `max_pages` is reached, guarding against cyclic pagination.
pub async fn walk_catalogue<A: PageAdapter>(
    client: &Client,
    adapter: &A,
    root: &Url,
    max_pages: u32,
) -> Result<(BookMeta, Vec<ChapterLink>)> {
    let mut meta = None;
    let mut entries: Vec<ChapterLink> = Vec::new();
    let mut next = Some(root.clone());
    let mut pages = 0u32;

    while let Some(url) = next {
        if pages >= max_pages {
            return Err(BinderyError::PageLimit {
                url: root.to_string(),
                limit: max_pages,
            });
        }
        pages += 1;

        let html = fetch_html(client, &url).await?;

        if meta.is_none() {
            let parsed = adapter
                .book_meta(&html)
                .map_err(|source| BinderyError::Parse {
                    url: url.to_string(),
                    source,
                })?;
            tracing::info!(book = %parsed.name, "parsed book metadata");
            meta = Some(parsed);
        }

        let page_entries =
            adapter
                .catalogue_entries(&html, &url)
                .map_err(|source| BinderyError::Parse {
                    url: url.to_string(),
                    source,
                })?;
        tracing::debug!(
            page = pages,
            entries = page_entries.len(),
            total = entries.len() + page_entries.len(),
            "parsed catalogue page"
        );
        entries.extend(page_entries);

        next = adapter
            .next_catalogue_page(&html, &url)
            .map_err(|source| BinderyError::Parse {
                url: url.to_string(),
                source,
            })?;
    }

    // meta is set on the first iteration; the loop runs at least once
    let meta = meta.expect("catalogue walk visited no pages");
    Ok((meta, entries))
}

/// Walks the catalogue at `root` and commits the result to the store
///
/// Returns the (possibly pre-existing) book record for the catalogue.
pub async fn discover<A: PageAdapter, S: Store>(
    client: &Client,
    adapter: &A,
    store: &mut S,
    root: &Url,
    max_pages: u32,
) -> Result<BookRecord> {
    let book_id = book_id_from_url(root)?;
    let (meta, links) = walk_catalogue(client, adapter, root, max_pages).await?;

    let book = BookRecord {
        book_id: book_id.clone(),
        name: meta.name,
        author: meta.author,
        category: meta.category,
        status: meta.status,
    };

    let entries: Vec<NewEntry> = links
        .into_iter()
        .map(|link| NewEntry {
            book_id: book_id.clone(),
            book_name: book.name.clone(),
            chapter: link.title,
            url: link.url.to_string(),
        })
        .collect();

    let inserted = store.record_discovery(&book, &entries)?;
    tracing::info!(
        book = %book.name,
        discovered = entries.len(),
        new = inserted,
        "catalogue discovery complete"
    );

    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_from_simple_path() {
        let url = Url::parse("http://example.com/books/6114/").unwrap();
        assert_eq!(book_id_from_url(&url).unwrap(), "6114");
    }

    #[test]
    fn test_book_id_ignores_trailing_slash() {
        let with = Url::parse("http://example.com/books/6114/").unwrap();
        let without = Url::parse("http://example.com/books/6114").unwrap();
        assert_eq!(
            book_id_from_url(&with).unwrap(),
            book_id_from_url(&without).unwrap()
        );
    }

    #[test]
    fn test_book_id_missing_path_is_error() {
        let url = Url::parse("http://example.com/").unwrap();
        assert!(book_id_from_url(&url).is_err());
    }
}
