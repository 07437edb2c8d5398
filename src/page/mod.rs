//! Page-format adapter
//!
//! The harvest pipeline is markup-agnostic; everything site-specific lives
//! behind the [`PageAdapter`] trait. The shipped [`SelectorAdapter`] is
//! driven entirely by CSS selectors from the configuration file.

mod adapter;
mod normalize;

pub use adapter::{BookMeta, ChapterLink, PageAdapter, SelectorAdapter};
pub use normalize::normalize_body;

use thiserror::Error;

/// Errors raised while extracting structure from a fetched page
///
/// Absence of expected markup is a loud failure, never an empty success;
/// only a missing *next* link is treated as the normal end of pagination.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("expected element not found: {0}")]
    Missing(String),

    #[error("anchor element has no href attribute")]
    MissingHref,

    #[error("malformed href {href:?}: {source}")]
    BadHref {
        href: String,
        source: url::ParseError,
    },
}
