//! Reading view: article header, rendered body, author profile and reader controls

use serde::Serialize;

use crate::card::ImageSlot;
use crate::localization::{DocumentRoot, LanguageContext, PreferenceStore};
use crate::model::{Article, Author, Bio, SocialLink};
use crate::render::{BlockRenderer, RenderedBlock};
use crate::script::{Direction, detect_script};

/// Initial body font scale, in rem
pub const DEFAULT_FONT_SCALE: f32 = 1.125;
/// Change per zoom step
pub const FONT_SCALE_STEP: f32 = 0.125;
pub const MIN_FONT_SCALE: f32 = 0.875;
pub const MAX_FONT_SCALE: f32 = 2.0;

/// Split a bilingual title at its first `(`
///
/// Titles are written as `N'Ko part (French part)`. The first element is the
/// trimmed text before the parenthesis; the second is the parenthesized rest,
/// if any.
///
/// # Examples
///
/// ```rust
/// use lonko_content::reader::split_bilingual_title;
///
/// assert_eq!(
///     split_bilingual_title("ߛߊ߲ߡߊߛߓߍ (Astronomie)"),
///     ("ߛߊ߲ߡߊߛߓߍ", Some("(Astronomie)"))
/// );
/// assert_eq!(split_bilingual_title("Les trous noirs"), ("Les trous noirs", None));
/// ```
pub fn split_bilingual_title(title: &str) -> (&str, Option<&str>) {
    match title.find('(') {
        Some(index) => {
            let secondary = title[index..].trim_end();
            (title[..index].trim(), Some(secondary))
        }
        None => (title.trim(), None),
    }
}

/// Reading progress as a fraction in `[0, 1]`
///
/// A page that does not scroll reports zero.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let scrollable = scroll_height - client_height;
    if scrollable <= 0.0 || !scrollable.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable).clamp(0.0, 1.0)
}

/// Reader zoom state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReaderSettings {
    font_scale: f32,
}

impl ReaderSettings {
    pub fn new() -> Self {
        Self {
            font_scale: DEFAULT_FONT_SCALE,
        }
    }

    pub fn font_scale(&self) -> f32 {
        self.font_scale
    }

    /// Grow the font by one step, up to the maximum
    pub fn increase(&mut self) -> f32 {
        self.font_scale = (self.font_scale + FONT_SCALE_STEP).min(MAX_FONT_SCALE);
        self.font_scale
    }

    /// Shrink the font by one step, down to the minimum
    pub fn decrease(&mut self) -> f32 {
        self.font_scale = (self.font_scale - FONT_SCALE_STEP).max(MIN_FONT_SCALE);
        self.font_scale
    }

    pub fn reset(&mut self) {
        self.font_scale = DEFAULT_FONT_SCALE;
    }

    /// CSS `font-size` value
    pub fn css_font_size(&self) -> String {
        format!("{}rem", self.font_scale)
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Author biography ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BioView {
    Text { text: String, direction: Direction },
    Blocks { blocks: Vec<RenderedBlock> },
}

/// Author profile shown under an article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    pub name: String,
    pub alternate_script_name: Option<String>,
    pub role: String,
    pub image: ImageSlot,
    pub bio: Option<BioView>,
    pub social_links: Vec<SocialLink>,
}

impl AuthorView {
    pub fn build(author: &Author, renderer: &BlockRenderer<'_>) -> Self {
        let bio = author.bio.as_ref().map(|bio| match bio {
            Bio::Text(text) => BioView::Text {
                direction: detect_script(text).direction(),
                text: text.clone(),
            },
            Bio::Blocks(blocks) => BioView::Blocks {
                blocks: renderer.render(blocks),
            },
        });

        Self {
            name: author.name.clone(),
            alternate_script_name: author.alternate_script_name.clone(),
            role: author.role.clone(),
            image: ImageSlot::from_url(author.image_url.as_deref()),
            bio,
            social_links: author.social_links.clone(),
        }
    }
}

/// Everything the reading view displays for one article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    pub slug: String,
    pub title: String,
    pub title_secondary: Option<String>,
    /// Direction of the page chrome, from the active language
    pub direction: Direction,
    pub category: String,
    pub date: String,
    pub reading_time: String,
    pub cover: ImageSlot,
    pub blocks: Vec<RenderedBlock>,
    pub author: Option<AuthorView>,
}

impl ArticleView {
    pub fn build<S: PreferenceStore, D: DocumentRoot>(
        article: &Article,
        ctx: &LanguageContext<S, D>,
        renderer: &BlockRenderer<'_>,
    ) -> Self {
        let (title, title_secondary) = split_bilingual_title(&article.title);
        let minutes = ctx.estimate_reading_time(&article.body);

        Self {
            slug: article.slug.clone(),
            title: title.to_string(),
            title_secondary: title_secondary.map(str::to_string),
            direction: ctx.direction(),
            category: ctx.resolve_category_label(&article.category),
            date: ctx.format_date_numeric(article.published_at),
            reading_time: format!(
                "{} {}",
                ctx.localize_digits(&minutes.to_string()),
                ctx.dictionary().article.minutes
            ),
            cover: ImageSlot::from_url(article.cover_image_url.as_deref()),
            blocks: renderer.render(&article.body),
            author: article
                .author
                .as_ref()
                .map(|author| AuthorView::build(author, renderer)),
        }
    }
}
