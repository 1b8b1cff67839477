//! Error types for the content pipeline
//!
//! Each failure domain has its own error enum. Asset resolution failures are
//! deliberately absent: a missing image is an expected occurrence and is
//! modeled as `Option` / [`crate::card::ImageSlot::Placeholder`] instead.

use thiserror::Error;

/// Errors raised while converting a raw document into a safe entity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A field that carries navigation identity is absent
    #[error("Missing required field: {field}")]
    MissingRequiredField {
        /// Name of the missing field (e.g. "slug")
        field: &'static str,
    },
}

impl TransformError {
    /// Get numeric error code
    pub fn code(&self) -> u32 {
        match self {
            TransformError::MissingRequiredField { .. } => 1,
        }
    }
}

/// Errors reported by a content provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or provider failure
    #[error("Fetch failed: {0}")]
    Fetch(String),
    /// Payload bytes are invalid for the detected charset
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// Payload is not the expected JSON shape
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ProviderError {
    /// Get numeric error code
    pub fn code(&self) -> u32 {
        match self {
            ProviderError::Fetch(_) => 10,
            ProviderError::Encoding(_) => 11,
            ProviderError::Payload(_) => 12,
        }
    }
}

/// Errors raised while loading the UI dictionaries
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Dictionary JSON does not match the schema
    #[error("Dictionary parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A locale key other than the two supported ones
    #[error("Unknown locale key: {0}")]
    UnknownLocale(String),
    /// One of the two supported locales has no dictionary
    #[error("Missing dictionary for locale: {0}")]
    MissingLocale(&'static str),
    /// A category translation with an empty label
    #[error("Empty category label for key '{key}' in locale '{locale}'")]
    EmptyLabel {
        /// Locale code of the offending dictionary
        locale: &'static str,
        /// Category key with the empty label
        key: String,
    },
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration JSON does not match the schema
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = TransformError::MissingRequiredField { field: "slug" };
        assert_eq!(err.to_string(), "Missing required field: slug");
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn test_provider_error_codes() {
        assert_eq!(ProviderError::Fetch("offline".into()).code(), 10);
        assert_eq!(ProviderError::Encoding("bad".into()).code(), 11);

        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = ProviderError::from(json_err);
        assert_eq!(err.code(), 12);
        assert!(err.to_string().starts_with("Invalid payload"));
    }

    #[test]
    fn test_dictionary_error_display() {
        let err = DictionaryError::EmptyLabel {
            locale: "nko",
            key: "biology".into(),
        };
        assert_eq!(
            err.to_string(),
            "Empty category label for key 'biology' in locale 'nko'"
        );
    }
}
