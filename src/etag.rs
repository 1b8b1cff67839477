//! Feed ETags using BLAKE3 hashing
//!
//! A feed ETag identifies one snapshot of the transformed article list, so
//! the presentation shell can skip re-rendering when a fetch cycle returns
//! exactly what it already shows.
//!
//! # Algorithm
//!
//! 1. Serialize the articles to JSON, streaming straight into a BLAKE3 hasher
//! 2. Take the first 128 bits (16 bytes) of the hash
//! 3. Encode as hexadecimal string
//! 4. Wrap in double quotes per RFC 9110
//!
//! # Example
//!
//! ```
//! use lonko_content::etag::FeedETag;
//!
//! let etag = FeedETag::generate(&[]).unwrap();
//! assert!(etag.starts_with('"'));
//! assert!(etag.ends_with('"'));
//! assert_eq!(etag.len(), 34); // 32 hex chars + 2 quotes
//! ```

use crate::model::Article;

/// ETag generator for article snapshots
pub struct FeedETag;

impl FeedETag {
    /// Generate a strong ETag for a list of articles
    ///
    /// Identical snapshots (same articles, same order) produce identical tags.
    pub fn generate(articles: &[Article]) -> Result<String, serde_json::Error> {
        let mut hasher = blake3::Hasher::new();
        serde_json::to_writer(&mut hasher, articles)?;
        Ok(Self::format(hasher.finalize()))
    }

    /// Generate a strong ETag for raw bytes
    pub fn generate_bytes(bytes: &[u8]) -> String {
        Self::format(blake3::hash(bytes))
    }

    /// Weak form (`W/"..."`) of [`FeedETag::generate`]
    pub fn generate_weak(articles: &[Article]) -> Result<String, serde_json::Error> {
        Ok(format!("W/{}", Self::generate(articles)?))
    }

    fn format(hash: blake3::Hash) -> String {
        // first 128 bits
        format!("\"{}\"", hex::encode(&hash.as_bytes()[..16]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, Span};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn article(slug: &str, title: &str) -> Article {
        Article {
            title: title.into(),
            slug: slug.into(),
            cover_image_url: None,
            cover_image_alt: None,
            published_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            body: vec![ContentBlock::Paragraph {
                spans: vec![Span::plain("ߒߞߏ")],
            }],
            excerpt: String::new(),
            category: "Science".into(),
            author: None,
        }
    }

    #[test]
    fn test_etag_format() {
        let etag = FeedETag::generate(&[article("a", "A")]).unwrap();
        assert_eq!(etag.len(), 34);
        assert!(etag[1..33].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_identical_snapshots_match() {
        let first = vec![article("a", "A"), article("b", "B")];
        let second = first.clone();
        assert_eq!(
            FeedETag::generate(&first).unwrap(),
            FeedETag::generate(&second).unwrap()
        );
    }

    #[test]
    fn test_changes_alter_tag() {
        let base = vec![article("a", "A"), article("b", "B")];
        let retitled = vec![article("a", "A'"), article("b", "B")];
        let reordered = vec![article("b", "B"), article("a", "A")];

        let tag = FeedETag::generate(&base).unwrap();
        assert_ne!(tag, FeedETag::generate(&retitled).unwrap());
        assert_ne!(tag, FeedETag::generate(&reordered).unwrap());
    }

    #[test]
    fn test_streamed_hash_matches_serialized_bytes() {
        let articles = vec![article("a", "A")];
        let bytes = serde_json::to_vec(&articles).unwrap();
        assert_eq!(
            FeedETag::generate(&articles).unwrap(),
            FeedETag::generate_bytes(&bytes)
        );
    }

    #[test]
    fn test_weak_etag() {
        let weak = FeedETag::generate_weak(&[]).unwrap();
        assert!(weak.starts_with("W/\""));
        assert_eq!(weak.len(), 36);
    }

    proptest! {
        #[test]
        fn prop_deterministic(title in "\\PC{0,40}") {
            let articles = vec![article("x", &title)];
            prop_assert_eq!(
                FeedETag::generate(&articles).unwrap(),
                FeedETag::generate(&articles).unwrap()
            );
        }
    }
}
