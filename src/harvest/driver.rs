//! Resume driver
//!
//! Sequences "discover catalogue, then fetch pending chapters" as one pass
//! and supervises it: a failed pass is logged and re-entered after a
//! bounded exponential backoff. Correctness across restarts rests entirely
//! on the work store's idempotence, not on driver-level checkpointing —
//! already-used entries are skipped, not redone.

use crate::config::{Config, RetryConfig};
use crate::harvest::article::fetch_pending;
use crate::harvest::catalogue::discover;
use crate::page::PageAdapter;
use crate::store::{RunStatus, SqliteStore, Store};
use crate::Result;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Outcome of one completed pipeline pass
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub book_name: String,
    /// Chapters fetched and stored during this pass (already-used entries
    /// are not counted; they were skipped)
    pub fetched: usize,
}

/// Supervised retry policy for the resume driver
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total passes attempted before giving up; None retries indefinitely
    pub max_attempts: Option<u32>,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    /// Backoff before retry number `attempt` (zero-based): initial delay
    /// doubled per attempt, capped at the maximum
    pub fn backoff(&self, attempt: u32) -> Duration {
        let doubled = self
            .initial_backoff
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(self.max_backoff);
        doubled.min(self.max_backoff)
    }

    /// Whether another pass may be started after `failures` failed ones
    pub fn allows_retry(&self, failures: u32) -> bool {
        match self.max_attempts {
            Some(max) => failures < max.saturating_sub(1),
            None => true,
        }
    }
}

/// Runs one full pipeline pass: open store, discover, fetch, close
///
/// The store handle is scoped to this pass and released on every exit
/// path. Each pass is recorded in the runs table with the config hash and
/// a Completed/Failed outcome.
pub async fn run_pass<A: PageAdapter>(
    client: &Client,
    adapter: &A,
    config: &Config,
    config_hash: &str,
    root: &url::Url,
) -> Result<PassSummary> {
    let mut store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let run_id = store.create_run(config_hash)?;

    let result = pass_inner(client, adapter, config, &mut store, root).await;

    let outcome = match &result {
        Ok(_) => RunStatus::Completed,
        Err(_) => RunStatus::Failed,
    };
    // A failed bookkeeping write must not mask the pass's own error
    if let Err(e) = store.finish_run(run_id, outcome) {
        tracing::warn!(run_id, error = %e, "failed to record run outcome");
    }

    result
}

async fn pass_inner<A: PageAdapter>(
    client: &Client,
    adapter: &A,
    config: &Config,
    store: &mut SqliteStore,
    root: &url::Url,
) -> Result<PassSummary> {
    let book = discover(
        client,
        adapter,
        store,
        root,
        config.limits.max_catalogue_pages,
    )
    .await?;

    let fetched = fetch_pending(
        client,
        adapter,
        store,
        Path::new(&config.output.library_dir),
        &book.name,
        config.limits.max_chapter_pages,
    )
    .await?;

    Ok(PassSummary {
        book_name: book.name,
        fetched,
    })
}

/// Re-enters the pipeline pass until one completes
///
/// Every failure is logged and followed by an exponential backoff; with a
/// bounded policy the last error is propagated once attempts run out.
pub async fn run_supervised<A: PageAdapter>(
    client: &Client,
    adapter: &A,
    config: &Config,
    config_hash: &str,
    policy: &RetryPolicy,
    root: &url::Url,
) -> Result<()> {
    let mut failures = 0u32;

    loop {
        match run_pass(client, adapter, config, config_hash, root).await {
            Ok(summary) => {
                tracing::info!(
                    book = %summary.book_name,
                    fetched = summary.fetched,
                    "harvest complete"
                );
                return Ok(());
            }
            Err(e) => {
                if !policy.allows_retry(failures) {
                    tracing::error!(error = %e, "harvest failed; retry budget exhausted");
                    return Err(e);
                }
                let delay = policy.backoff(failures);
                failures += 1;
                tracing::error!(
                    error = %e,
                    attempt = failures,
                    backoff_ms = delay.as_millis() as u64,
                    "harvest pass failed; will retry"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1_000),
        }
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let p = policy(None);
        assert_eq!(p.backoff(0), Duration::from_millis(100));
        assert_eq!(p.backoff(1), Duration::from_millis(200));
        assert_eq!(p.backoff(2), Duration::from_millis(400));
        assert_eq!(p.backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_is_capped() {
        let p = policy(None);
        assert_eq!(p.backoff(4), Duration::from_millis(1_000));
        assert_eq!(p.backoff(30), Duration::from_millis(1_000));
    }

    #[test]
    fn test_backoff_handles_huge_attempt_counts() {
        let p = policy(None);
        assert_eq!(p.backoff(u32::MAX), Duration::from_millis(1_000));
    }

    #[test]
    fn test_unbounded_policy_always_retries() {
        let p = policy(None);
        assert!(p.allows_retry(0));
        assert!(p.allows_retry(1_000_000));
    }

    #[test]
    fn test_bounded_policy_stops_after_max_attempts() {
        // max_attempts = 3 means three passes total: the initial one plus
        // two retries
        let p = policy(Some(3));
        assert!(p.allows_retry(0));
        assert!(p.allows_retry(1));
        assert!(!p.allows_retry(2));
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let p = policy(Some(1));
        assert!(!p.allows_retry(0));
    }
}
