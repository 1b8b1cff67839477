//! Safe-transform layer: raw documents to the internal model
//!
//! This is the containment boundary for untrusted content. Nothing past this
//! module ever sees a raw record, and nothing in this module panics on a
//! missing or oddly shaped field.
//!
//! # Fallback Chains
//!
//! Each defaulted field resolves through an explicit, ordered chain:
//!
//! - Category: direct `category` field (first label when it is a list) > first
//!   label of `categories` > `"Science"`
//! - Excerpt: explicit `excerpt` > first text-bearing block of `body`
//!   (truncated, suffixed with `…`) > empty string
//! - Images: direct `http(s)` URL > asset reference via the [`ImageUrlBuilder`] > `None`
//! - Title: `title` > placeholder; published date: `publishedAt` > transformation time
//!
//! The only hard failure is a missing slug, since it is the article's
//! navigation identity. Every other absence degrades to a default.
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::config::SiteConfig;
//! use lonko_content::image::CdnImageUrlBuilder;
//! use lonko_content::raw::RawArticle;
//! use lonko_content::transform::SafeTransformer;
//!
//! let config = SiteConfig::default();
//! let images = CdnImageUrlBuilder::new("https://cdn.sanity.io", "p", "production");
//! let transformer = SafeTransformer::new(&images, &config);
//!
//! let raw: RawArticle = serde_json::from_str(r#"{ "slug": { "current": "mars" } }"#).unwrap();
//! let article = transformer.transform_article(&raw).unwrap();
//! assert_eq!(article.title, "Sans titre");
//! assert_eq!(article.category, "Science");
//! assert_eq!(article.excerpt, "");
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::config::SiteConfig;
use crate::error::TransformError;
use crate::image::ImageUrlBuilder;
use crate::markup::strip_markup;
use crate::model::{
    Article, AssetRef, Author, Bio, ContentBlock, HeadingLevel, ImageBlock, Mark, SocialLink,
    Span,
};
use crate::raw::{
    RawArticle, RawAuthor, RawBio, RawBlock, RawCategory, RawImageSource, RawLabel, RawMarkDef,
    RawSpan,
};
use crate::security::SecurityValidator;

/// Suffix appended to excerpts derived from the body
pub const EXCERPT_ELLIPSIS: char = '…';

/// Platform label used when a social link has none
const DEFAULT_PLATFORM: &str = "web";

/// Converts raw records into fully-defaulted articles and authors
pub struct SafeTransformer<'a> {
    images: &'a dyn ImageUrlBuilder,
    config: &'a SiteConfig,
    validator: SecurityValidator,
    now: DateTime<Utc>,
}

impl<'a> SafeTransformer<'a> {
    /// Create a transformer that stamps undated articles with the current time
    pub fn new(images: &'a dyn ImageUrlBuilder, config: &'a SiteConfig) -> Self {
        Self {
            images,
            config,
            validator: SecurityValidator::new(),
            now: Utc::now(),
        }
    }

    /// Use a fixed transformation time
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Transform one raw article
    ///
    /// # Errors
    ///
    /// `TransformError::MissingRequiredField { field: "slug" }` when the slug
    /// is absent or blank in any of its accepted shapes.
    pub fn transform_article(&self, raw: &RawArticle) -> Result<Article, TransformError> {
        let slug = raw
            .slug
            .as_ref()
            .and_then(|slug| slug.as_str())
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .ok_or(TransformError::MissingRequiredField { field: "slug" })?
            .to_string();

        let title = clean_text(raw.title.as_deref())
            .unwrap_or_else(|| self.config.untitled_placeholder.clone());

        let body = raw
            .body
            .as_deref()
            .map(|blocks| self.transform_blocks(blocks))
            .unwrap_or_default();

        let excerpt = resolve_excerpt(raw.excerpt.as_deref(), &body, self.config.excerpt_chars);

        let category = resolve_category(
            raw.category.as_ref().and_then(RawCategory::first),
            raw.categories.as_deref(),
            &self.config.default_category,
        );

        let cover_image_alt = match raw.main_image {
            Some(RawImageSource::Image(ref image)) => clean_text(image.alt.as_deref()),
            _ => None,
        };

        Ok(Article {
            title,
            slug,
            cover_image_url: self.resolve_image(raw.main_image.as_ref()),
            cover_image_alt,
            published_at: parse_timestamp(raw.published_at.as_deref()).unwrap_or(self.now),
            body,
            excerpt,
            category,
            author: raw.author.as_ref().and_then(|author| self.transform_author(author)),
        })
    }

    /// Transform one raw author; `None` when the author has no name
    pub fn transform_author(&self, raw: &RawAuthor) -> Option<Author> {
        let name = clean_text(raw.name.as_deref())?;

        let bio = match raw.bio {
            Some(RawBio::Text(ref text)) => clean_text(Some(text)).map(Bio::Text),
            Some(RawBio::Blocks(ref blocks)) => {
                let blocks = self.transform_blocks(blocks);
                (!blocks.is_empty()).then_some(Bio::Blocks(blocks))
            }
            None => None,
        };

        let social_links = raw
            .socials
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|social| {
                let url = social.url.as_deref().unwrap_or_default();
                match self.validator.sanitize_url(url) {
                    Some(url) => Some(SocialLink {
                        platform: clean_text(social.platform.as_deref())
                            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
                        url: url.to_string(),
                    }),
                    None => {
                        debug!(author = %name, url, "dropping social link with unsafe or empty URL");
                        None
                    }
                }
            })
            .collect();

        Some(Author {
            alternate_script_name: clean_text(raw.name_nko.as_deref()),
            image_url: self.resolve_image(raw.image.as_ref()),
            role: clean_text(raw.role.as_deref())
                .unwrap_or_else(|| self.config.default_author_role.clone()),
            bio,
            social_links,
            name,
        })
    }

    /// Transform a list of raw articles for one fetch cycle
    ///
    /// Articles without a slug are dropped (and logged); the rest are sorted
    /// newest first.
    pub fn transform_all(&self, raws: &[RawArticle]) -> Vec<Article> {
        let mut articles: Vec<Article> = raws
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| match self.transform_article(raw) {
                Ok(article) => Some(article),
                Err(err) => {
                    warn!(index, title = ?raw.title, "dropping article: {err}");
                    None
                }
            })
            .collect();

        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles
    }

    /// Transform portable-text blocks into content blocks
    ///
    /// Consecutive list items of the same kind are grouped into one list.
    /// Unknown block types are skipped.
    pub fn transform_blocks(&self, raw: &[RawBlock]) -> Vec<ContentBlock> {
        let mut blocks: Vec<ContentBlock> = Vec::with_capacity(raw.len());

        for block in raw {
            match block.kind.as_deref() {
                Some("block") | None if block.children.is_some() => {
                    self.push_text_block(block, &mut blocks);
                }
                Some("image") => blocks.push(ContentBlock::Image(self.image_block(block))),
                other => {
                    debug!(kind = ?other, "skipping unsupported block type");
                }
            }
        }

        blocks
    }

    fn push_text_block(&self, block: &RawBlock, blocks: &mut Vec<ContentBlock>) {
        let spans = self.transform_spans(
            block.children.as_deref().unwrap_or_default(),
            block.mark_defs.as_deref().unwrap_or_default(),
        );

        match block.list_item.as_deref() {
            Some("bullet") => {
                if let Some(ContentBlock::BulletList { items }) = blocks.last_mut() {
                    items.push(spans);
                } else {
                    blocks.push(ContentBlock::BulletList { items: vec![spans] });
                }
            }
            Some("number") => {
                if let Some(ContentBlock::NumberedList { items }) = blocks.last_mut() {
                    items.push(spans);
                } else {
                    blocks.push(ContentBlock::NumberedList { items: vec![spans] });
                }
            }
            _ => {
                let style = block.style.as_deref().unwrap_or("normal");
                let content = match HeadingLevel::from_style(style) {
                    Some(level) => ContentBlock::Heading { level, spans },
                    None if style == "blockquote" => ContentBlock::Quote { spans },
                    None => ContentBlock::Paragraph { spans },
                };
                blocks.push(content);
            }
        }
    }

    fn transform_spans(&self, children: &[RawSpan], mark_defs: &[RawMarkDef]) -> Vec<Span> {
        children
            .iter()
            .filter_map(|child| {
                let text = strip_markup(child.text.as_deref().unwrap_or_default()).into_owned();
                if text.is_empty() {
                    return None;
                }
                let marks = child
                    .marks
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|mark| self.resolve_mark(mark, mark_defs))
                    .collect();
                Some(Span { text, marks })
            })
            .collect()
    }

    fn resolve_mark(&self, mark: &str, mark_defs: &[RawMarkDef]) -> Option<Mark> {
        match mark {
            "strong" => Some(Mark::Strong),
            "em" => Some(Mark::Emphasis),
            "code" => Some(Mark::Code),
            "underline" => Some(Mark::Underline),
            "strike-through" => Some(Mark::StrikeThrough),
            key => {
                let def = mark_defs.iter().find(|def| def.key.as_deref() == Some(key))?;
                if def.kind.as_deref() != Some("link") {
                    return None;
                }
                let href = self.validator.sanitize_url(def.href.as_deref()?)?;
                Some(Mark::Link(href.to_string()))
            }
        }
    }

    fn image_block(&self, block: &RawBlock) -> ImageBlock {
        let asset = block
            .asset
            .as_ref()
            .and_then(|asset| asset.reference.as_deref())
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
            .map(|reference| AssetRef(reference.to_string()));

        let direct_url = block
            .url
            .as_deref()
            .or_else(|| block.asset.as_ref().and_then(|asset| asset.url.as_deref()))
            .and_then(|url| self.validator.sanitize_image_url(url))
            .map(str::to_string);

        ImageBlock {
            asset,
            direct_url,
            caption: clean_text(block.caption.as_deref()),
            alt_text: clean_text(block.alt.as_deref()),
            credit: clean_text(block.source.as_deref()),
        }
    }

    /// Resolve an image source to a URL, `None` when nothing usable is found
    pub fn resolve_image(&self, source: Option<&RawImageSource>) -> Option<String> {
        match source? {
            RawImageSource::Url(url) => self.validator.sanitize_image_url(url).map(str::to_string),
            RawImageSource::Image(image) => {
                let asset = image.asset.as_ref()?;
                if let Some(url) = asset
                    .url
                    .as_deref()
                    .and_then(|url| self.validator.sanitize_image_url(url))
                {
                    return Some(url.to_string());
                }
                let reference = asset.reference.as_deref()?.trim();
                if reference.is_empty() {
                    return None;
                }
                self.images.build_url(&AssetRef(reference.to_string()))
            }
        }
    }
}

/// Resolve an article category
///
/// Precedence: a non-blank direct category, else the first label of the
/// list (when non-blank), else `default`.
///
/// # Examples
///
/// ```rust
/// use lonko_content::raw::RawLabel;
/// use lonko_content::transform::resolve_category;
///
/// assert_eq!(resolve_category(Some("Biologie"), None, "Science"), "Biologie");
/// let list = [RawLabel::Text("Physique".into())];
/// assert_eq!(resolve_category(Some("  "), Some(&list), "Science"), "Physique");
/// assert_eq!(resolve_category(None, None, "Science"), "Science");
/// ```
pub fn resolve_category(
    direct: Option<&str>,
    list: Option<&[RawLabel]>,
    default: &str,
) -> String {
    if let Some(direct) = direct.map(str::trim).filter(|c| !c.is_empty()) {
        return direct.to_string();
    }

    if let Some(first) = list
        .and_then(|labels| labels.first())
        .and_then(RawLabel::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        return first.to_string();
    }

    default.to_string()
}

/// Resolve an article excerpt
///
/// Precedence: a non-blank explicit excerpt, else one derived from the body
/// (see [`derive_excerpt`]), else the empty string.
pub fn resolve_excerpt(explicit: Option<&str>, body: &[ContentBlock], max_chars: usize) -> String {
    clean_text(explicit)
        .or_else(|| derive_excerpt(body, max_chars))
        .unwrap_or_default()
}

/// Derive an excerpt from the first text-bearing block with visible text
///
/// Takes at most `max_chars` characters and appends [`EXCERPT_ELLIPSIS`].
pub fn derive_excerpt(body: &[ContentBlock], max_chars: usize) -> Option<String> {
    let text = body
        .iter()
        .filter(|block| block.is_text_bearing())
        .map(ContentBlock::text)
        .find(|text| !text.trim().is_empty())?;

    let mut excerpt: String = text.trim().chars().take(max_chars).collect();
    excerpt.truncate(excerpt.trim_end().len());
    excerpt.push(EXCERPT_ELLIPSIS);
    Some(excerpt)
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Strip markup, trim, and treat blank as absent
fn clean_text(value: Option<&str>) -> Option<String> {
    let value = value?;
    let stripped = strip_markup(value);
    let trimmed = stripped.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
