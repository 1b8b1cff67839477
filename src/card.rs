//! Feed card view-model
//!
//! Collects everything a feed card displays for one article in the active
//! language. Missing pieces degrade to placeholders: no cover image gives
//! [`ImageSlot::Placeholder`], no excerpt gives the dictionary's placeholder
//! text.

use serde::Serialize;

use crate::localization::{DocumentRoot, LanguageContext, PreferenceStore};
use crate::model::Article;

/// Icon used when no category keyword matches
pub const DEFAULT_ICON: &str = "ph-star";

/// Category keyword to icon, checked as substrings in this order
const CATEGORY_ICONS: &[(&str, &str)] = &[
    ("astronomie", "ph-star"),
    ("astronomy", "ph-star"),
    ("physique", "ph-atom"),
    ("physics", "ph-atom"),
    ("biologie", "ph-dna"),
    ("biology", "ph-dna"),
    ("mathématiques", "ph-function"),
    ("mathematics", "ph-function"),
    ("chimie", "ph-flask"),
    ("chemistry", "ph-flask"),
    ("géologie", "ph-mountains"),
    ("geology", "ph-mountains"),
    ("technologie", "ph-robot"),
    ("technology", "ph-robot"),
    ("tech", "ph-robot"),
    ("histoire", "ph-scroll"),
    ("history", "ph-scroll"),
    ("santé", "ph-heartbeat"),
    ("health", "ph-heartbeat"),
    ("science", "ph-flask"),
];

/// Icon for a raw category
///
/// # Examples
///
/// ```rust
/// use lonko_content::card::category_icon;
///
/// assert_eq!(category_icon("Physique Quantique"), "ph-atom");
/// assert_eq!(category_icon("  BIOLOGY "), "ph-dna");
/// assert_eq!(category_icon("Océanographie"), "ph-star");
/// ```
pub fn category_icon(category: &str) -> &'static str {
    let normalized = category.trim().to_lowercase();
    if normalized.is_empty() {
        return DEFAULT_ICON;
    }
    CATEGORY_ICONS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Image area of a card or profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum ImageSlot {
    Resolved(String),
    Placeholder,
}

impl ImageSlot {
    pub fn from_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => ImageSlot::Resolved(url.to_string()),
            None => ImageSlot::Placeholder,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageSlot::Resolved(url) => Some(url),
            ImageSlot::Placeholder => None,
        }
    }
}

/// One card of the article feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleCard {
    pub slug: String,
    /// Link to the reading view
    pub href: String,
    pub title: String,
    pub category: String,
    pub icon: &'static str,
    pub date: String,
    pub reading_minutes: usize,
    /// Reading time with localized digits and unit
    pub reading_time: String,
    pub excerpt: String,
    /// True when `excerpt` is the dictionary placeholder
    pub excerpt_is_placeholder: bool,
    pub cover: ImageSlot,
    pub cover_alt: String,
    pub author_name: Option<String>,
}

impl ArticleCard {
    /// Build a card in the context's active language
    pub fn build<S: PreferenceStore, D: DocumentRoot>(
        article: &Article,
        ctx: &LanguageContext<S, D>,
    ) -> Self {
        let dictionary = ctx.dictionary();
        let reading_minutes = ctx.estimate_reading_time(&article.body);

        let (excerpt, excerpt_is_placeholder) = if article.excerpt.trim().is_empty() {
            (dictionary.article.excerpt_placeholder.clone(), true)
        } else {
            (article.excerpt.clone(), false)
        };

        // N'Ko readers see the N'Ko spelling of the author's name when present
        let author_name = article.author.as_ref().map(|author| {
            match (ctx.is_secondary(), &author.alternate_script_name) {
                (true, Some(alternate)) => alternate.clone(),
                _ => author.name.clone(),
            }
        });

        Self {
            slug: article.slug.clone(),
            href: format!("/article/{}", article.slug),
            title: article.title.clone(),
            category: ctx.resolve_category_label(&article.category),
            icon: category_icon(&article.category),
            date: ctx.format_date(article.published_at),
            reading_minutes,
            reading_time: format!(
                "{} {}",
                ctx.localize_digits(&reading_minutes.to_string()),
                dictionary.article.minutes
            ),
            excerpt,
            excerpt_is_placeholder,
            cover: ImageSlot::from_url(article.cover_image_url.as_deref()),
            cover_alt: article
                .cover_image_alt
                .clone()
                .unwrap_or_else(|| article.title.clone()),
            author_name,
        }
    }
}
