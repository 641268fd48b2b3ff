use anyhow::{anyhow, Result};
use std::env;
use tracing::{info, warn};

use crate::models::CategoryFilter;

// Import logging macros
use crate::{log_system_event, log_validation};

/// Complete application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub lesson: LessonConfig,
    pub logging: LoggingConfig,
}

/// Lesson data and drill configuration
#[derive(Debug, Clone)]
pub struct LessonConfig {
    /// Directory or base URL holding the datasets
    pub source: String,
    pub lesson_dataset: String,
    pub practice_dataset: String,
    pub sort_field: String,
    /// Category labels selected at startup
    pub selected_sets: Vec<String>,
    pub audio_root: String,
}

/// Logging system configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub console_enabled: bool,
    pub log_directory: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        log_system_event!(config, "Loading drill configuration from environment variables");

        let config = Config {
            lesson: LessonConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        };

        log_system_event!(config, "Configuration loaded successfully");
        config.log_configuration_summary();

        Ok(config)
    }

    fn log_configuration_summary(&self) {
        info!(
            lesson_source = %self.lesson.source,
            lesson_dataset = %self.lesson.lesson_dataset,
            practice_dataset = %self.lesson.practice_dataset,
            sort_field = %self.lesson.sort_field,
            selected_sets = ?self.lesson.selected_sets,
            log_level = %self.logging.level,
            "Configuration summary"
        );
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.lesson.source.trim().is_empty() {
            return Err(anyhow!("LESSON_SOURCE must name a directory or URL"));
        }

        if self.lesson.lesson_dataset.trim().is_empty()
            || self.lesson.practice_dataset.trim().is_empty()
        {
            return Err(anyhow!("LESSON_DATASET and PRACTICE_DATASET must not be empty"));
        }

        if self.lesson.sort_field.trim().is_empty() {
            return Err(anyhow!("SORT_FIELD must not be empty"));
        }

        if self.lesson.selected_sets.is_empty() {
            return Err(anyhow!("LESSON_SETS must select at least one set"));
        }

        if !["trace", "debug", "info", "warn", "error"]
            .iter()
            .any(|level| self.logging.level.to_lowercase().starts_with(level))
        {
            warn!("Unrecognised log level '{}', the default filter will be used", self.logging.level);
        }

        log_validation!(success, "configuration", "Configuration validation completed successfully");
        Ok(())
    }
}

impl LessonConfig {
    fn from_env() -> Result<Self> {
        let source = env::var("LESSON_SOURCE").unwrap_or_else(|_| "data/week-1".to_string());

        let lesson_dataset =
            env::var("LESSON_DATASET").unwrap_or_else(|_| "ひらがな.json".to_string());

        let practice_dataset =
            env::var("PRACTICE_DATASET").unwrap_or_else(|_| "words.json".to_string());

        let sort_field = env::var("SORT_FIELD").unwrap_or_else(|_| "ひらがな".to_string());

        let sets = env::var("LESSON_SETS").unwrap_or_else(|_| "Set 1: あか".to_string());
        let selected_sets: Vec<String> = CategoryFilter::parse(&sets)
            .labels()
            .map(str::to_string)
            .collect();
        if selected_sets.is_empty() {
            return Err(anyhow!("Invalid LESSON_SETS value: '{}'. Expected a comma separated list", sets));
        }

        let audio_root = env::var("AUDIO_ROOT")
            .unwrap_or_else(|_| "https://static.bpev.me/pages/japanese/audio/".to_string());

        Ok(LessonConfig {
            source,
            lesson_dataset,
            practice_dataset,
            sort_field,
            selected_sets,
            audio_root,
        })
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::new(self.selected_sets.iter().cloned())
    }
}

impl LoggingConfig {
    fn from_env() -> Result<Self> {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info,kana_drill=debug".to_string());

        let file_enabled = env::var("LOG_FILE_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let console_enabled = env::var("LOG_CONSOLE_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let log_directory = env::var("LOG_DIRECTORY").unwrap_or_else(|_| "logs".to_string());

        Ok(LoggingConfig {
            level,
            file_enabled,
            console_enabled,
            log_directory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            lesson: LessonConfig {
                source: "data/week-1".to_string(),
                lesson_dataset: "ひらがな.json".to_string(),
                practice_dataset: "words.json".to_string(),
                sort_field: "ひらがな".to_string(),
                selected_sets: vec!["Set 1: あか".to_string()],
                audio_root: "https://example.org/audio/".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_enabled: true,
                console_enabled: false,
                log_directory: "logs".to_string(),
            },
        }
    }

    #[test]
    fn test_config_validation() {
        let config = create_test_config();
        assert!(config.validate().is_ok());

        let mut invalid_config = config.clone();
        invalid_config.lesson.sort_field = " ".to_string();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = config.clone();
        invalid_config.lesson.selected_sets.clear();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = config;
        invalid_config.lesson.source = String::new();
        assert!(invalid_config.validate().is_err());
    }

    #[test]
    fn test_category_filter_from_config() {
        let mut config = create_test_config();
        config.lesson.selected_sets.push("Set 2: さた".to_string());
        let filter = config.lesson.category_filter();
        assert!(filter.contains("Set 1: あか"));
        assert!(filter.contains("Set 2: さた"));
        assert!(!filter.contains("Set 3: なは"));
    }
}
