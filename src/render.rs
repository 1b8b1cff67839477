//! Rich-text block renderer - turns an article body into direction-aware output
//!
//! Each block is classified on its own text, never on the active UI
//! language, so a French paragraph inside an N'Ko article stays
//! left-to-right and an N'Ko quote inside a French article reads
//! right-to-left.
//!
//! # Rendering Rules
//!
//! - **Direction**: `rtl` when the block contains any N'Ko code point, `ltr` otherwise
//! - **Typography**: N'Ko blocks get the `font-kigelia` class
//! - **Headings**: levels 1-3 map to `heading-xl`, `heading-lg`, `heading-md`
//! - **Empty paragraphs**: suppressed entirely
//! - **Images**: the direct URL, else the asset resolved by the [`ImageUrlBuilder`];
//!   an image with neither renders nothing
//! - **Lists**: the list and each item carry their own direction
//!
//! Rendering is deterministic: the same body always produces the same blocks
//! and the same HTML.
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::image::CdnImageUrlBuilder;
//! use lonko_content::model::{ContentBlock, Span};
//! use lonko_content::render::BlockRenderer;
//! use lonko_content::script::Direction;
//!
//! let images = CdnImageUrlBuilder::new("https://cdn.sanity.io", "p", "production");
//! let renderer = BlockRenderer::new(&images);
//!
//! let body = vec![
//!     ContentBlock::Paragraph { spans: vec![Span::plain("ߒߞߏ ߦߋ߫ ߛߓߍߛߎ߲ ߟߋ߬ ߘߌ߫")] },
//!     ContentBlock::Paragraph { spans: vec![Span::plain("  ")] },
//!     ContentBlock::Paragraph { spans: vec![Span::plain("Le N'Ko est une écriture.")] },
//! ];
//!
//! let blocks = renderer.render(&body);
//! assert_eq!(blocks.len(), 2);
//! assert_eq!(blocks[0].direction, Direction::Rtl);
//! assert_eq!(blocks[1].direction, Direction::Ltr);
//!
//! let html = renderer.to_html(&body);
//! assert!(html.starts_with("<p dir=\"rtl\" class=\"paragraph font-kigelia\">"));
//! ```

use serde::Serialize;

use crate::image::ImageUrlBuilder;
use crate::model::{ContentBlock, HeadingLevel, ImageBlock, Mark, Span, spans_text};
use crate::script::{Direction, Script, detect_script};

/// A block ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBlock {
    /// Plain text used for script detection
    pub text: String,
    pub script: Script,
    pub direction: Direction,
    /// Space-separated typographic classes
    pub class: String,
    pub content: RenderedContent,
}

/// Block payload after rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderedContent {
    Paragraph {
        spans: Vec<Span>,
    },
    Heading {
        level: HeadingLevel,
        spans: Vec<Span>,
    },
    Quote {
        spans: Vec<Span>,
    },
    List {
        ordered: bool,
        items: Vec<RenderedItem>,
    },
    Image {
        url: String,
        alt_text: Option<String>,
        caption: Option<String>,
        credit: Option<String>,
    },
}

/// One list item with its own direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedItem {
    pub spans: Vec<Span>,
    pub script: Script,
    pub direction: Direction,
}

/// Renders content blocks, resolving image assets through a builder
pub struct BlockRenderer<'a> {
    images: &'a dyn ImageUrlBuilder,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(images: &'a dyn ImageUrlBuilder) -> Self {
        Self { images }
    }

    /// Render a body, dropping blocks that render nothing
    pub fn render(&self, body: &[ContentBlock]) -> Vec<RenderedBlock> {
        body.iter()
            .filter_map(|block| self.render_block(block))
            .collect()
    }

    /// Render one block; `None` for empty paragraphs and unresolvable images
    pub fn render_block(&self, block: &ContentBlock) -> Option<RenderedBlock> {
        let (base_class, content) = match block {
            ContentBlock::Paragraph { spans } => {
                if spans_text(spans).trim().is_empty() {
                    return None;
                }
                ("paragraph", RenderedContent::Paragraph { spans: spans.clone() })
            }
            ContentBlock::Heading { level, spans } => (
                heading_class(*level),
                RenderedContent::Heading {
                    level: *level,
                    spans: spans.clone(),
                },
            ),
            ContentBlock::Quote { spans } => {
                ("quote", RenderedContent::Quote { spans: spans.clone() })
            }
            ContentBlock::BulletList { items } => ("list", list_content(false, items)),
            ContentBlock::NumberedList { items } => ("list", list_content(true, items)),
            ContentBlock::Image(image) => return self.render_image(image),
        };

        let text = block.text();
        let script = detect_script(&text);
        Some(RenderedBlock {
            class: class_for(base_class, script),
            direction: script.direction(),
            script,
            text,
            content,
        })
    }

    fn render_image(&self, image: &ImageBlock) -> Option<RenderedBlock> {
        let url = image
            .direct_url
            .clone()
            .or_else(|| image.asset.as_ref().and_then(|asset| self.images.build_url(asset)))?;

        let text = image.caption.clone().unwrap_or_default();
        let script = detect_script(&text);
        Some(RenderedBlock {
            class: class_for("figure", script),
            direction: script.direction(),
            script,
            text,
            content: RenderedContent::Image {
                url,
                alt_text: image.alt_text.clone(),
                caption: image.caption.clone(),
                credit: image.credit.clone(),
            },
        })
    }

    /// Render a body to an HTML fragment
    ///
    /// Text and attribute values are escaped; each block carries a `dir`
    /// attribute and its classes.
    pub fn to_html(&self, body: &[ContentBlock]) -> String {
        let mut output = String::with_capacity(body.len() * 128);
        for block in self.render(body) {
            write_block_html(&mut output, &block);
            output.push('\n');
        }
        output
    }
}

fn heading_class(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "heading-xl",
        HeadingLevel::H2 => "heading-lg",
        HeadingLevel::H3 => "heading-md",
    }
}

fn class_for(base: &str, script: Script) -> String {
    match script.font_class() {
        Some(font) => format!("{base} {font}"),
        None => base.to_string(),
    }
}

fn list_content(ordered: bool, items: &[Vec<Span>]) -> RenderedContent {
    let items = items
        .iter()
        .map(|spans| {
            let script = detect_script(&spans_text(spans));
            RenderedItem {
                spans: spans.clone(),
                script,
                direction: script.direction(),
            }
        })
        .collect();
    RenderedContent::List { ordered, items }
}

fn write_block_html(output: &mut String, block: &RenderedBlock) {
    let dir = block.direction.as_str();
    let class = escape_attr(&block.class);

    match &block.content {
        RenderedContent::Paragraph { spans } => {
            write_element(output, "p", dir, &class, spans);
        }
        RenderedContent::Heading { level, spans } => {
            let tag = format!("h{}", level.as_u8());
            write_element(output, &tag, dir, &class, spans);
        }
        RenderedContent::Quote { spans } => {
            write_element(output, "blockquote", dir, &class, spans);
        }
        RenderedContent::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            output.push_str(&format!("<{tag} dir=\"{dir}\" class=\"{class}\">"));
            for item in items {
                let item_class = class_for("list-item", item.script);
                write_element(output, "li", item.direction.as_str(), &item_class, &item.spans);
            }
            output.push_str(&format!("</{tag}>"));
        }
        RenderedContent::Image {
            url,
            alt_text,
            caption,
            credit,
        } => {
            output.push_str(&format!("<figure dir=\"{dir}\" class=\"{class}\">"));
            output.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                escape_attr(url),
                escape_attr(alt_text.as_deref().unwrap_or_default())
            ));
            if caption.is_some() || credit.is_some() {
                output.push_str("<figcaption>");
                if let Some(caption) = caption {
                    output.push_str(&escape_text(caption));
                }
                if let Some(credit) = credit {
                    output.push_str(&format!("<small>{}</small>", escape_text(credit)));
                }
                output.push_str("</figcaption>");
            }
            output.push_str("</figure>");
        }
    }
}

fn write_element(output: &mut String, tag: &str, dir: &str, class: &str, spans: &[Span]) {
    output.push_str(&format!("<{tag} dir=\"{dir}\" class=\"{class}\">"));
    for span in spans {
        write_span_html(output, span);
    }
    output.push_str(&format!("</{tag}>"));
}

fn write_span_html(output: &mut String, span: &Span) {
    for mark in &span.marks {
        match mark {
            Mark::Link(href) => output.push_str(&format!(
                "<a href=\"{}\" rel=\"noopener noreferrer\">",
                escape_attr(href)
            )),
            other => output.push_str(&format!("<{}>", mark_tag(other))),
        }
    }

    output.push_str(&escape_text(&span.text));

    for mark in span.marks.iter().rev() {
        output.push_str(&format!("</{}>", mark_tag(mark)));
    }
}

fn mark_tag(mark: &Mark) -> &'static str {
    match mark {
        Mark::Strong => "strong",
        Mark::Emphasis => "em",
        Mark::Code => "code",
        Mark::Underline => "u",
        Mark::StrikeThrough => "s",
        Mark::Link(_) => "a",
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
