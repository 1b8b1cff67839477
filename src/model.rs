//! Safe internal content model
//!
//! Values of these types are only produced by [`crate::transform`]; every
//! field is defaulted, sanitized and normalized. Articles and authors are
//! read-only snapshots for one fetch cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A fully-defaulted article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    /// Display title, never empty
    pub title: String,
    /// Navigation identity
    pub slug: String,
    /// Resolved cover image
    pub cover_image_url: Option<String>,
    /// Alternative text for the cover image
    pub cover_image_alt: Option<String>,
    pub published_at: DateTime<Utc>,
    pub body: Vec<ContentBlock>,
    /// Explicit or derived excerpt, possibly empty
    pub excerpt: String,
    /// Raw category label or key, never empty
    pub category: String,
    pub author: Option<Author>,
}

/// A fully-defaulted author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub name: String,
    /// Name written in N'Ko script
    pub alternate_script_name: Option<String>,
    pub image_url: Option<String>,
    pub role: String,
    pub bio: Option<Bio>,
    /// Insertion order preserved, duplicates kept
    pub social_links: Vec<SocialLink>,
}

/// Author biography, plain or rich
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bio {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Heading weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a block style (`h1`..`h6`) to a level; deeper levels clamp to `H3`
    pub fn from_style(style: &str) -> Option<Self> {
        match style {
            "h1" => Some(HeadingLevel::H1),
            "h2" => Some(HeadingLevel::H2),
            "h3" | "h4" | "h5" | "h6" => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// Inline decoration of a text span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Mark {
    Strong,
    Emphasis,
    Code,
    Underline,
    StrikeThrough,
    /// Hyperlink with a sanitized target
    Link(String),
}

/// A run of inline text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl Span {
    /// Undecorated span
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }
}

/// Reference to an asset hosted by the content store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Embedded image inside an article body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub asset: Option<AssetRef>,
    /// Direct URL when the source gave one instead of an asset
    pub direct_url: Option<String>,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    /// Photo credit
    pub credit: Option<String>,
}

/// One typed unit of an article body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    Paragraph { spans: Vec<Span> },
    Heading { level: HeadingLevel, spans: Vec<Span> },
    Quote { spans: Vec<Span> },
    BulletList { items: Vec<Vec<Span>> },
    NumberedList { items: Vec<Vec<Span>> },
    Image(ImageBlock),
}

/// Concatenate span texts
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

impl ContentBlock {
    /// Returns true for every variant except images
    pub fn is_text_bearing(&self) -> bool {
        !matches!(self, ContentBlock::Image(_))
    }

    /// Plain text of the block
    ///
    /// Inline spans are concatenated as-is; list items are joined with a
    /// single space. Images have no text.
    pub fn text(&self) -> String {
        match self {
            ContentBlock::Paragraph { spans }
            | ContentBlock::Heading { spans, .. }
            | ContentBlock::Quote { spans } => spans_text(spans),
            ContentBlock::BulletList { items } | ContentBlock::NumberedList { items } => items
                .iter()
                .map(|item| spans_text(item))
                .collect::<Vec<_>>()
                .join(" "),
            ContentBlock::Image(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_from_style() {
        assert_eq!(HeadingLevel::from_style("h1"), Some(HeadingLevel::H1));
        assert_eq!(HeadingLevel::from_style("h2"), Some(HeadingLevel::H2));
        assert_eq!(HeadingLevel::from_style("h5"), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_style("normal"), None);
        assert_eq!(HeadingLevel::H3.as_u8(), 3);
    }

    #[test]
    fn test_block_text() {
        let paragraph = ContentBlock::Paragraph {
            spans: vec![Span::plain("Le "), Span::plain("Soleil")],
        };
        assert_eq!(paragraph.text(), "Le Soleil");

        let list = ContentBlock::BulletList {
            items: vec![vec![Span::plain("un")], vec![Span::plain("deux")]],
        };
        assert_eq!(list.text(), "un deux");

        let image = ContentBlock::Image(ImageBlock {
            asset: None,
            direct_url: None,
            caption: Some("légende".into()),
            alt_text: None,
            credit: None,
        });
        assert!(!image.is_text_bearing());
        assert_eq!(image.text(), "");
    }
}
