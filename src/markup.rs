//! Markup stripping for untrusted text fields
//!
//! Editors occasionally paste HTML fragments into plain-text fields (titles,
//! excerpts, captions, bios). Such text is parsed with html5ever, which follows
//! the WHATWG parsing algorithm and therefore handles malformed markup the same
//! way a browser would, and reduced to its text nodes.
//!
//! # Rules
//!
//! - Text without `<` or `&` is returned unchanged (no parse)
//! - Only tag-shaped runs (`<` then a letter, `/` or `!`, closed by `>`) are
//!   markup; any other `<` is literal text, so `0<x<1` survives intact
//! - Subtrees of dangerous elements (`script`, `style`, `iframe`, ...) are dropped
//! - Character references are decoded (`&amp;` becomes `&`)
//! - Leading and trailing whitespace of the input is preserved so adjacent
//!   inline spans keep their separation
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::markup::strip_markup;
//!
//! assert_eq!(strip_markup("Plain text"), "Plain text");
//! assert_eq!(strip_markup("<b>Mars</b> &amp; Vénus"), "Mars & Vénus");
//! assert_eq!(strip_markup("Hi<script>alert(1)</script>!"), "Hi!");
//! assert_eq!(strip_markup("si 0<x<1 alors"), "si 0<x<1 alors");
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::security::{SanitizeAction, SecurityValidator};

/// Returns true when the text may contain markup or character references
pub fn looks_like_markup(text: &str) -> bool {
    text.contains('<') || text.contains('&')
}

fn tag_pattern() -> Option<&'static Regex> {
    static TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    TAG_REGEX
        .get_or_init(|| Regex::new(r"<[A-Za-z/!][^<>]*>").ok())
        .as_ref()
}

/// Returns true when the text holds at least one tag-shaped `<...>` run
pub fn contains_tag(text: &str) -> bool {
    tag_pattern().is_some_and(|regex| regex.is_match(text))
}

/// Escape every `<` that does not open a tag-shaped run
fn escape_stray_angles(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    let mut last = 0;
    if let Some(regex) = tag_pattern() {
        for tag in regex.find_iter(text) {
            escaped.push_str(&text[last..tag.start()].replace('<', "&lt;"));
            escaped.push_str(tag.as_str());
            last = tag.end();
        }
    }
    escaped.push_str(&text[last..].replace('<', "&lt;"));
    escaped
}

/// Reduce possibly-marked-up text to its visible text content
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    if !looks_like_markup(text) || (!text.contains('&') && !contains_tag(text)) {
        return Cow::Borrowed(text);
    }

    let trimmed_start = text.trim_start();
    let leading = &text[..text.len() - trimmed_start.len()];
    let core = trimmed_start.trim_end();
    let trailing = &trimmed_start[core.len()..];

    let dom = parse_document(RcDom::default(), Default::default()).one(escape_stray_angles(core));

    let validator = SecurityValidator::new();
    let mut extracted = String::with_capacity(core.len());
    collect_text(&dom.document, &validator, &mut extracted);

    let mut output = String::with_capacity(leading.len() + extracted.len() + trailing.len());
    output.push_str(leading);
    output.push_str(extracted.trim());
    output.push_str(trailing);
    Cow::Owned(output)
}

fn collect_text(node: &Handle, validator: &SecurityValidator, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => {
            output.push_str(&contents.borrow());
        }
        NodeData::Element { ref name, .. } => {
            if validator.check_element(name.local.as_ref()) == SanitizeAction::Remove {
                return;
            }
            for child in node.children.borrow().iter() {
                collect_text(child, validator, output);
            }
        }
        NodeData::Document => {
            for child in node.children.borrow().iter() {
                collect_text(child, validator, output);
            }
        }
        _ => {}
    }
}
