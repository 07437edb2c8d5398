use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration
///
/// Selector syntax is not checked here; selectors are compiled (and
/// rejected) when the page adapter is built from the config.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.source.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source.user-agent must not be empty".to_string(),
        ));
    }

    if config.source.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "source.timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.database-path must not be empty".to_string(),
        ));
    }

    if config.output.library_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.library-dir must not be empty".to_string(),
        ));
    }

    if config.limits.max_catalogue_pages == 0 {
        return Err(ConfigError::Validation(
            "limits.max-catalogue-pages must be greater than 0".to_string(),
        ));
    }

    if config.limits.max_chapter_pages == 0 {
        return Err(ConfigError::Validation(
            "limits.max-chapter-pages must be greater than 0".to_string(),
        ));
    }

    if config.retry.max_attempts == Some(0) {
        return Err(ConfigError::Validation(
            "retry.max-attempts must be greater than 0 when set".to_string(),
        ));
    }

    if config.retry.initial_backoff_ms == 0 {
        return Err(ConfigError::Validation(
            "retry.initial-backoff-ms must be greater than 0".to_string(),
        ));
    }

    if config.retry.max_backoff_ms < config.retry.initial_backoff_ms {
        return Err(ConfigError::Validation(
            "retry.max-backoff-ms must be at least retry.initial-backoff-ms".to_string(),
        ));
    }

    Ok(())
}
