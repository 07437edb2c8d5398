use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded with every harvest run so state produced under a
/// different configuration can be recognized.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[source]
user-agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"
timeout-secs = 10

[output]
database-path = "./books.db"
library-dir = "./library"

[retry]
max-attempts = 5
initial-backoff-ms = 100
max-backoff-ms = 5000

[limits]
max-catalogue-pages = 200
max-chapter-pages = 50

[selectors]
book-name = { selector = "div.info h1" }
author = { selector = "div.info p.author", strip-prefix = "Author:" }
category = { selector = "div.info p.category", strip-prefix = "Category:" }
book-status = { selector = "div.info p.state", strip-prefix = "Status:" }
entry-list = "ul.chapters li a"
next-catalogue = { selector = "a.pager", label = "Next" }
content = "div#content"
next-page = { selector = "a.pagenext" }
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.retry.max_attempts, Some(5));
        assert_eq!(config.limits.max_catalogue_pages, 200);
        assert_eq!(config.selectors.entry_list, "ul.chapters li a");
        assert_eq!(
            config.selectors.author.strip_prefix.as_deref(),
            Some("Author:")
        );
        assert_eq!(
            config.selectors.next_catalogue.label.as_deref(),
            Some("Next")
        );
    }

    #[test]
    fn test_retry_and_limits_default() {
        let config_content = r#"
[source]
user-agent = "TestAgent/1.0"

[output]
database-path = "./books.db"
library-dir = "./library"

[selectors]
book-name = { selector = "h1" }
author = { selector = "p.author" }
category = { selector = "p.category" }
book-status = { selector = "p.state" }
entry-list = "li a"
next-catalogue = { selector = "a.next" }
content = "div#content"
next-page = { selector = "a.next" }
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.retry.max_attempts, None);
        assert_eq!(config.retry.initial_backoff_ms, 1_000);
        assert_eq!(config.limits.max_chapter_pages, 500);
        assert_eq!(config.source.timeout_secs, 10);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/bindery.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let bad = VALID_CONFIG.replace("max-catalogue-pages = 200", "max-catalogue-pages = 0");
        let file = create_temp_config(&bad);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
