//! Site and content-source configuration
//!
//! Every field has a default so a partial JSON document (or none at all) yields
//! a usable configuration.
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::config::SiteConfig;
//!
//! let config = SiteConfig::from_json_str(r#"{ "page_size": 9 }"#).unwrap();
//! assert_eq!(config.page_size, 9);
//! assert_eq!(config.words_per_minute, 200);
//! ```

use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;

/// How an active category filter is compared against an article's raw category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMatch {
    /// Label, key, or key-as-substring match
    #[default]
    Lenient,
    /// Label or key match only
    Exact,
}

/// Tunables for the transform, localization and discovery layers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Initial number of visible articles
    pub page_size: usize,
    /// Articles added per "load more"
    pub load_more_step: usize,
    /// Delay before a search query is applied
    #[serde(with = "millis")]
    pub debounce: Duration,
    /// Maximum characters of a derived excerpt
    pub excerpt_chars: usize,
    /// Reading speed for reading-time estimates
    pub words_per_minute: usize,
    /// Visible ratio above which an element is revealed
    pub reveal_threshold: f32,
    /// Category used when a raw article has none
    pub default_category: String,
    /// Title used when a raw article has none
    pub untitled_placeholder: String,
    /// Role used when a raw author has none
    pub default_author_role: String,
    /// Client storage key holding the chosen language
    pub preference_key: String,
    /// Category filter comparison mode
    pub category_match: CategoryMatch,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            load_more_step: 3,
            debounce: Duration::from_millis(300),
            excerpt_chars: 150,
            words_per_minute: 200,
            reveal_threshold: 0.1,
            default_category: "Science".to_string(),
            untitled_placeholder: "Sans titre".to_string(),
            default_author_role: "Contributeur".to_string(),
            preference_key: "preferred-lang".to_string(),
            category_match: CategoryMatch::Lenient,
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be non-zero".into()));
        }
        if self.words_per_minute == 0 {
            return Err(ConfigError::Invalid(
                "words_per_minute must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ConfigError::Invalid(format!(
                "reveal_threshold {} is outside [0, 1]",
                self.reveal_threshold
            )));
        }
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_category must be non-empty".into(),
            ));
        }
        Ok(())
    }
}

/// Location of the external content store and its asset CDN
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContentSourceConfig {
    /// Content store project identifier
    pub project_id: String,
    /// Dataset name within the project
    pub dataset: String,
    /// Query API version date
    pub api_version: String,
    /// Serve reads through the CDN
    pub use_cdn: bool,
    /// Base URL of the asset CDN
    pub cdn_base: String,
}

impl Default for ContentSourceConfig {
    fn default() -> Self {
        Self {
            project_id: "yfsyhc2p".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            cdn_base: "https://cdn.sanity.io".to_string(),
        }
    }
}

impl ContentSourceConfig {
    /// Defaults overridden by `LONKO_PROJECT_ID`, `LONKO_DATASET`,
    /// `LONKO_API_VERSION` and `LONKO_USE_CDN`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(project_id) = lookup("LONKO_PROJECT_ID").filter(|v| !v.is_empty()) {
            config.project_id = project_id;
        }
        if let Some(dataset) = lookup("LONKO_DATASET").filter(|v| !v.is_empty()) {
            config.dataset = dataset;
        }
        if let Some(api_version) = lookup("LONKO_API_VERSION").filter(|v| !v.is_empty()) {
            config.api_version = api_version;
        }
        if let Some(use_cdn) = lookup("LONKO_USE_CDN") {
            config.use_cdn = matches!(use_cdn.trim(), "1" | "true" | "yes");
        }
        config
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
