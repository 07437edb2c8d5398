use serde::Deserialize;

/// Main configuration structure for Bindery
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    pub selectors: SelectorConfig,
}

/// Remote source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory under which chapter artifacts are written,
    /// one subdirectory per book
    #[serde(rename = "library-dir")]
    pub library_dir: String,
}

/// Supervised retry configuration for the resume driver
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of pipeline passes before giving up.
    /// Absent means retry indefinitely (with backoff).
    #[serde(rename = "max-attempts", default)]
    pub max_attempts: Option<u32>,

    /// Delay before the first retry (milliseconds); doubles per attempt
    #[serde(rename = "initial-backoff-ms", default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound on the backoff delay (milliseconds)
    #[serde(rename = "max-backoff-ms", default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

/// Pagination caps guarding against cyclic or malformed next-links
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum catalogue pages followed in a single walk
    #[serde(rename = "max-catalogue-pages", default = "default_max_catalogue_pages")]
    pub max_catalogue_pages: u32,

    /// Maximum pages followed within a single chapter
    #[serde(rename = "max-chapter-pages", default = "default_max_chapter_pages")]
    pub max_chapter_pages: u32,
}

/// CSS selectors describing the source's page markup
///
/// These are the only site-specific knobs; everything else in the pipeline
/// is markup-agnostic.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Book display name on the catalogue page
    #[serde(rename = "book-name")]
    pub book_name: FieldSelector,

    /// Book author on the catalogue page
    pub author: FieldSelector,

    /// Book category on the catalogue page
    pub category: FieldSelector,

    /// Publication status on the catalogue page
    #[serde(rename = "book-status")]
    pub book_status: FieldSelector,

    /// Anchor elements making up the chapter list (one match per chapter)
    #[serde(rename = "entry-list")]
    pub entry_list: String,

    /// Link to the next catalogue page
    #[serde(rename = "next-catalogue")]
    pub next_catalogue: LinkSelector,

    /// Chapter body content region
    pub content: String,

    /// Link to the next page within a chapter
    #[serde(rename = "next-page")]
    pub next_page: LinkSelector,
}

/// A selector for a single metadata field, with an optional literal
/// prefix stripped from the extracted text (e.g. "Author:")
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSelector {
    pub selector: String,

    #[serde(rename = "strip-prefix", default)]
    pub strip_prefix: Option<String>,
}

/// A selector for a pagination link, optionally narrowed to anchors
/// whose text equals `label` (some sources reuse one class for every
/// pager link and distinguish them only by text)
#[derive(Debug, Clone, Deserialize)]
pub struct LinkSelector {
    pub selector: String,

    #[serde(default)]
    pub label: Option<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_catalogue_pages: default_max_catalogue_pages(),
            max_chapter_pages: default_max_chapter_pages(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_initial_backoff_ms() -> u64 {
    1_000
}

fn default_max_backoff_ms() -> u64 {
    300_000
}

fn default_max_catalogue_pages() -> u32 {
    1_000
}

fn default_max_chapter_pages() -> u32 {
    500
}
