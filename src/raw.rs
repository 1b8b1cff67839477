//! Raw (untrusted) documents as delivered by the content store
//!
//! Every field is optional and several fields accept more than one shape,
//! mirroring what the store actually returns across schema revisions. A field
//! holding a value of an unexpected type reads as absent, so one bad field
//! never costs the whole record.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::Value;

/// Article record as returned by the content store
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub slug: Option<RawSlug>,
    #[serde(deserialize_with = "lenient")]
    pub main_image: Option<RawImageSource>,
    #[serde(deserialize_with = "lenient")]
    pub published_at: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "lenient_seq")]
    pub body: Option<Vec<RawBlock>>,
    #[serde(deserialize_with = "lenient")]
    pub category: Option<RawCategory>,
    #[serde(deserialize_with = "lenient_seq")]
    pub categories: Option<Vec<RawLabel>>,
    #[serde(deserialize_with = "lenient")]
    pub author: Option<RawAuthor>,
}

/// Author record as returned by the content store
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAuthor {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name_nko: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub image: Option<RawImageSource>,
    #[serde(deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub bio: Option<RawBio>,
    #[serde(deserialize_with = "lenient_seq")]
    pub socials: Option<Vec<RawSocial>>,
}

/// Deserialize an optional field, reading a value of the wrong shape as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize an optional list, keeping only the elements of the right shape
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Slug as a plain string or as `{ "current": ... }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSlug {
    Plain(String),
    Current { current: Option<String> },
}

impl RawSlug {
    /// The slug text, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawSlug::Plain(value) => Some(value),
            RawSlug::Current { current } => current.as_deref(),
        }
    }
}

/// Image given as an asset object or as a direct URL
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawImageSource {
    Url(String),
    Image(RawImage),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub asset: Option<RawAsset>,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAsset {
    #[serde(rename = "_ref")]
    pub reference: Option<String>,
    pub url: Option<String>,
}

/// Category label as a string or as `{ "title": ... }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Text(String),
    Titled { title: Option<String> },
}

impl RawLabel {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawLabel::Text(value) => Some(value),
            RawLabel::Titled { title } => title.as_deref(),
        }
    }
}

/// Direct category given as one label or as a list of labels
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCategory {
    Many(Vec<RawLabel>),
    One(RawLabel),
}

impl RawCategory {
    /// Text of the single label, or of the first label of a list
    pub fn first(&self) -> Option<&str> {
        match self {
            RawCategory::Many(labels) => labels.first().and_then(RawLabel::as_str),
            RawCategory::One(label) => label.as_str(),
        }
    }
}

/// Biography as plain text or rich-text blocks
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBio {
    Text(String),
    Blocks(Vec<RawBlock>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSocial {
    pub platform: Option<String>,
    pub url: Option<String>,
}

/// Portable-text block (text block or embedded image)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBlock {
    #[serde(rename = "_type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub style: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub list_item: Option<String>,
    #[serde(deserialize_with = "lenient_seq")]
    pub children: Option<Vec<RawSpan>>,
    #[serde(deserialize_with = "lenient_seq")]
    pub mark_defs: Option<Vec<RawMarkDef>>,
    pub asset: Option<RawAsset>,
    pub url: Option<String>,
    pub caption: Option<String>,
    pub alt: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSpan {
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_seq")]
    pub marks: Option<Vec<String>>,
}

/// Annotation referenced from a span's marks
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMarkDef {
    #[serde(rename = "_key")]
    pub key: Option<String>,
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    pub href: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug_shapes() {
        let plain: RawArticle = serde_json::from_value(json!({ "slug": "mars" })).unwrap();
        assert_eq!(plain.slug.unwrap().as_str(), Some("mars"));

        let current: RawArticle =
            serde_json::from_value(json!({ "slug": { "_type": "slug", "current": "mars" } }))
                .unwrap();
        assert_eq!(current.slug.unwrap().as_str(), Some("mars"));

        let empty: RawArticle = serde_json::from_value(json!({ "slug": {} })).unwrap();
        assert_eq!(empty.slug.unwrap().as_str(), None);
    }

    #[test]
    fn test_image_shapes() {
        let raw: RawArticle = serde_json::from_value(json!({
            "mainImage": { "asset": { "_ref": "image-abc-10x10-png" }, "alt": "Mars" }
        }))
        .unwrap();
        match raw.main_image {
            Some(RawImageSource::Image(image)) => {
                assert_eq!(
                    image.asset.unwrap().reference.as_deref(),
                    Some("image-abc-10x10-png")
                );
                assert_eq!(image.alt.as_deref(), Some("Mars"));
            }
            other => panic!("unexpected image shape: {other:?}"),
        }

        let raw: RawAuthor =
            serde_json::from_value(json!({ "image": "https://cdn.example.com/a.jpg" })).unwrap();
        assert!(matches!(raw.image, Some(RawImageSource::Url(_))));
    }

    #[test]
    fn test_category_list_shapes() {
        let raw: RawArticle = serde_json::from_value(json!({
            "categories": ["Physique", { "title": "Chimie" }, {}]
        }))
        .unwrap();
        let labels: Vec<Option<&str>> = raw
            .categories
            .as_deref()
            .unwrap()
            .iter()
            .map(RawLabel::as_str)
            .collect();
        assert_eq!(labels, vec![Some("Physique"), Some("Chimie"), None]);
    }

    #[test]
    fn test_direct_category_shapes() {
        let first = |value| {
            let raw: RawArticle = serde_json::from_value(json!({ "category": value })).unwrap();
            raw.category.as_ref().and_then(RawCategory::first).map(str::to_string)
        };
        assert_eq!(first(json!("Biologie")), Some("Biologie".to_string()));
        assert_eq!(first(json!(["Biologie", "Chimie"])), Some("Biologie".to_string()));
        assert_eq!(first(json!([{ "title": "Chimie" }])), Some("Chimie".to_string()));
        assert_eq!(first(json!([])), None);
        assert_eq!(first(json!(7)), None);
    }

    #[test]
    fn test_mistyped_fields_read_as_absent() {
        let raw: RawArticle = serde_json::from_value(json!({
            "slug": "a",
            "title": 42,
            "excerpt": { "fr": "texte" },
            "publishedAt": false,
            "categories": ["Physique", 3, null],
            "body": [
                "stray string",
                { "_type": "block", "style": 2, "children": [{ "text": 5 }, { "text": "ok" }] }
            ],
            "author": { "name": "Awa", "role": ["x"], "socials": [1, { "url": "https://a.example" }] }
        }))
        .unwrap();

        assert_eq!(raw.slug.unwrap().as_str(), Some("a"));
        assert!(raw.title.is_none());
        assert!(raw.excerpt.is_none());
        assert!(raw.published_at.is_none());
        assert_eq!(raw.categories.unwrap().len(), 1);

        let body = raw.body.unwrap();
        assert_eq!(body.len(), 1);
        assert!(body[0].style.is_none());
        let texts: Vec<Option<&str>> = body[0]
            .children
            .as_deref()
            .unwrap()
            .iter()
            .map(|span| span.text.as_deref())
            .collect();
        assert_eq!(texts, vec![None, Some("ok")]);

        let author = raw.author.unwrap();
        assert_eq!(author.name.as_deref(), Some("Awa"));
        assert!(author.role.is_none());
        assert_eq!(author.socials.unwrap().len(), 1);
    }

    #[test]
    fn test_bio_shapes() {
        let text: RawAuthor = serde_json::from_value(json!({ "bio": "Astrophysicienne" })).unwrap();
        assert!(matches!(text.bio, Some(RawBio::Text(_))));

        let blocks: RawAuthor = serde_json::from_value(json!({
            "bio": [{ "_type": "block", "children": [{ "text": "ߒߞߏ" }] }]
        }))
        .unwrap();
        assert!(matches!(blocks.bio, Some(RawBio::Blocks(ref b)) if b.len() == 1));
    }

    #[test]
    fn test_block_fields() {
        let block: RawBlock = serde_json::from_value(json!({
            "_type": "block",
            "style": "h2",
            "listItem": "bullet",
            "markDefs": [{ "_key": "k1", "_type": "link", "href": "https://x.org" }],
            "children": [{ "_type": "span", "text": "Voir", "marks": ["k1", "strong"] }]
        }))
        .unwrap();
        assert_eq!(block.kind.as_deref(), Some("block"));
        assert_eq!(block.list_item.as_deref(), Some("bullet"));
        assert_eq!(block.mark_defs.unwrap()[0].href.as_deref(), Some("https://x.org"));
        assert_eq!(block.children.unwrap()[0].marks.as_ref().unwrap().len(), 2);
    }
}
