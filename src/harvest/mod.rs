//! Harvest pipeline
//!
//! This module contains the incremental harvesting logic:
//! - HTTP fetching of catalogue and chapter pages
//! - the catalogue walker that discovers a book's chapter list
//! - the article fetcher that drains the pending-entry queue
//! - the supervised resume driver that ties the two together

mod article;
mod catalogue;
mod driver;
mod fetcher;
mod paths;

pub use article::{chapter_body, fetch_pending};
pub use catalogue::{book_id_from_url, discover, walk_catalogue};
pub use driver::{run_pass, run_supervised, PassSummary, RetryPolicy};
pub use fetcher::{build_http_client, fetch_html};
pub use paths::{artifact_path, sanitize_component};

use crate::config::Config;
use crate::page::SelectorAdapter;
use crate::Result;
use url::Url;

/// Runs the complete supervised harvest for one catalogue root
///
/// Builds the HTTP client and page adapter once, then re-enters the
/// discover-and-fetch pass under the configured retry policy until a pass
/// completes. Safe to call against a database with prior state: discovery
/// and fetch are both idempotent against the work store.
pub async fn harvest(config: &Config, config_hash: &str, root: &Url) -> Result<()> {
    let client = build_http_client(&config.source).map_err(|source| crate::BinderyError::Http {
        url: root.to_string(),
        source,
    })?;
    let adapter = SelectorAdapter::from_config(&config.selectors)?;
    let policy = RetryPolicy::from_config(&config.retry);

    run_supervised(&client, &adapter, config, config_hash, &policy, root).await
}
