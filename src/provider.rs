//! Content provider interface and the loading path
//!
//! The content store is a black box behind [`ContentProvider`]. Loading
//! happens once per fetch cycle; provider failures are logged and degrade to
//! an empty feed (or a missing article) instead of propagating to the views.
//!
//! # Payload Shape
//!
//! Payloads are JSON, either a bare array of raw articles or the store's
//! query envelope `{ "result": [...] }`. Mistyped fields inside a record read
//! as absent; an entry that is not a record at all is skipped on its own
//! without discarding the rest of the payload.
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::config::SiteConfig;
//! use lonko_content::image::CdnImageUrlBuilder;
//! use lonko_content::provider::{StaticProvider, load_articles};
//! use lonko_content::transform::SafeTransformer;
//!
//! # tokio_test_block(async {
//! let payload = br#"{ "result": [ { "slug": "a", "publishedAt": "2025-01-01" }, { "title": "no slug" } ] }"#;
//! let provider = StaticProvider::from_payload(payload, Some("application/json")).unwrap();
//!
//! let config = SiteConfig::default();
//! let images = CdnImageUrlBuilder::new("https://cdn.sanity.io", "p", "production");
//! let transformer = SafeTransformer::new(&images, &config);
//!
//! let articles = load_articles(&provider, &transformer).await;
//! assert_eq!(articles.len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::future::Future;
use tracing::{debug, warn};

use crate::charset::decode_payload;
use crate::error::ProviderError;
use crate::model::Article;
use crate::raw::RawArticle;
use crate::transform::SafeTransformer;

/// Source of raw article documents
///
/// Records may be partially populated but carry a slug whenever the article
/// exists.
pub trait ContentProvider {
    fn fetch_articles(&self) -> impl Future<Output = Result<Vec<RawArticle>, ProviderError>> + Send;

    fn fetch_article_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<RawArticle>, ProviderError>> + Send;
}

/// Provider serving a fixed, already-decoded payload
#[derive(Debug, Clone)]
pub struct StaticProvider {
    articles: Result<Vec<RawArticle>, String>,
}

impl StaticProvider {
    /// Serve the given raw articles
    pub fn from_articles(articles: Vec<RawArticle>) -> Self {
        Self {
            articles: Ok(articles),
        }
    }

    /// Decode and parse a payload
    ///
    /// # Errors
    ///
    /// `ProviderError::Encoding` when the bytes are invalid for the detected
    /// charset, `ProviderError::Payload` when the text is not a JSON array or
    /// result envelope.
    pub fn from_payload(payload: &[u8], content_type: Option<&str>) -> Result<Self, ProviderError> {
        let text = decode_payload(payload, content_type)?;
        Ok(Self::from_articles(parse_payload(&text)?))
    }

    /// A provider whose every fetch fails
    pub fn unavailable(reason: &str) -> Self {
        Self {
            articles: Err(reason.to_string()),
        }
    }

    fn articles(&self) -> Result<&[RawArticle], ProviderError> {
        self.articles
            .as_deref()
            .map_err(|reason| ProviderError::Fetch(reason.clone()))
    }
}

impl ContentProvider for StaticProvider {
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>, ProviderError> {
        Ok(self.articles()?.to_vec())
    }

    async fn fetch_article_by_slug(&self, slug: &str) -> Result<Option<RawArticle>, ProviderError> {
        let slug = slug.trim();
        Ok(self
            .articles()?
            .iter()
            .find(|raw| {
                raw.slug
                    .as_ref()
                    .and_then(|s| s.as_str())
                    .is_some_and(|candidate| candidate.trim() == slug)
            })
            .cloned())
    }
}

/// Parse a decoded payload into raw articles
///
/// Accepts a bare array or `{ "result": [...] }`. Records that do not
/// deserialize are skipped.
pub fn parse_payload(text: &str) -> Result<Vec<RawArticle>, ProviderError> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut envelope) => match envelope.remove("result") {
            Some(serde_json::Value::Array(items)) => items,
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(other) => vec![other],
        },
        other => {
            return Err(ProviderError::Payload(<serde_json::Error as serde::de::Error>::custom(
                format!("expected an array of articles or a result envelope, found {other}"),
            )));
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<RawArticle>(item) {
            Ok(raw) => Some(raw),
            Err(err) => {
                debug!(index, "skipping malformed record: {err}");
                None
            }
        })
        .collect())
}

/// Fetch and transform the whole feed
///
/// Articles without a slug are dropped; the rest are sorted newest first. A
/// provider failure is logged and yields an empty list.
pub async fn load_articles<P: ContentProvider>(
    provider: &P,
    transformer: &SafeTransformer<'_>,
) -> Vec<Article> {
    match provider.fetch_articles().await {
        Ok(raws) => transformer.transform_all(&raws),
        Err(err) => {
            warn!(code = err.code(), "article fetch failed, showing empty feed: {err}");
            Vec::new()
        }
    }
}

/// Fetch and transform a single article
pub async fn load_article<P: ContentProvider>(
    provider: &P,
    transformer: &SafeTransformer<'_>,
    slug: &str,
) -> Option<Article> {
    let raw = match provider.fetch_article_by_slug(slug).await {
        Ok(raw) => raw?,
        Err(err) => {
            warn!(code = err.code(), slug, "article fetch failed: {err}");
            return None;
        }
    };

    match transformer.transform_article(&raw) {
        Ok(article) => Some(article),
        Err(err) => {
            warn!(slug, "dropping article: {err}");
            None
        }
    }
}
