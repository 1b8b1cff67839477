//! UI dictionaries and category-label resolution
//!
//! Each locale has one dictionary with a fixed schema. Both are embedded at
//! compile time from `messages/*.json`, validated once at load time, and never
//! mutated afterwards.
//!
//! # Category Labels
//!
//! [`resolve_category_label`] resolves a raw category through three tiers, in
//! this order:
//!
//! 1. The dictionary's `home.categories` table (case-insensitive key match)
//! 2. A built-in table per language, used when the dictionary is incomplete
//! 3. The raw value, unchanged
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::dictionary::{Dictionaries, resolve_category_label};
//! use lonko_content::localization::Language;
//!
//! let dictionaries = Dictionaries::embedded().unwrap();
//! let nko = dictionaries.get(Language::Nko);
//!
//! // dictionary
//! assert_eq!(resolve_category_label("Physics", Language::Nko, nko), "ߘߐ߬ߞߏ");
//! // built-in table
//! assert_eq!(resolve_category_label("Santé", Language::Nko, nko), "ߞߍ߲ߘߍߦߊ");
//! // passthrough
//! assert_eq!(resolve_category_label("Océanographie", Language::Nko, nko), "Océanographie");
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::DictionaryError;
use crate::localization::Language;

const FR_MESSAGES: &str = include_str!("../messages/fr.json");
const NKO_MESSAGES: &str = include_str!("../messages/nko.json");

/// Built-in French labels, keyed by lowercase category key
const FR_CATEGORY_LABELS: &[(&str, &str)] = &[
    ("science", "Science"),
    ("astronomy", "Astronomie"),
    ("physics", "Physique"),
    ("biology", "Biologie"),
    ("chemistry", "Chimie"),
    ("mathematics", "Mathématiques"),
    ("technology", "Technologie"),
    ("history", "Histoire"),
    ("geology", "Géologie"),
    ("health", "Santé"),
];

/// Built-in N'Ko labels, keyed by lowercase French label or category key
const NKO_CATEGORY_LABELS: &[(&str, &str)] = &[
    ("science", "ߟߐ߲ߞߏ"),
    ("astronomie", "ߛߊ߲ߡߊߛߓߍ"),
    ("astronomy", "ߛߊ߲ߡߊߛߓߍ"),
    ("physique", "ߘߐ߬ߞߏ"),
    ("physics", "ߘߐ߬ߞߏ"),
    ("physique quantique", "ߘߐ߬ߞߏ ߢߊ߰ߙߊ"),
    ("biologie", "ߢߣߊߡߦߊ"),
    ("biology", "ߢߣߊߡߦߊ"),
    ("chimie", "ߖߎ߲߯ߛߊ"),
    ("chemistry", "ߖߎ߲߯ߛߊ"),
    ("mathématiques", "ߘߊ߲߬ߠߊ߬ߕߍ߰ߟߌ"),
    ("mathematics", "ߘߊ߲߬ߠߊ߬ߕߍ߰ߟߌ"),
    ("technologie", "ߛߋߒߞߏߟߦߊ"),
    ("technology", "ߛߋߒߞߏߟߦߊ"),
    ("histoire", "ߘߐ߬ߝߐ"),
    ("history", "ߘߐ߬ߝߐ"),
    ("géologie", "ߘߎ߰ߘߐ߬ߛߓߍ"),
    ("geology", "ߘߎ߰ߘߐ߬ߛߓߍ"),
    ("santé", "ߞߍ߲ߘߍߦߊ"),
    ("health", "ߞߍ߲ߘߍߦߊ"),
];

/// UI strings for one locale
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Dictionary {
    pub metadata: MetadataStrings,
    pub nav: NavStrings,
    pub home: HomeStrings,
    pub article: ArticleStrings,
    pub search: SearchStrings,
    pub footer: FooterStrings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetadataStrings {
    pub site_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavStrings {
    pub home: String,
    pub articles: String,
    pub about: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomeStrings {
    pub hero: HeroStrings,
    pub featured: FeaturedStrings,
    /// Category key to display label
    pub categories: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroStrings {
    pub title: String,
    pub subtitle: String,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeaturedStrings {
    pub title: String,
    pub view_all: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArticleStrings {
    /// Reading-time unit
    pub minutes: String,
    pub read_more: String,
    /// Shown on cards whose article has no excerpt
    pub excerpt_placeholder: String,
    pub by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchStrings {
    pub placeholder: String,
    /// Label of the "all categories" filter
    pub all: String,
    pub no_results: String,
    pub load_more: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterStrings {
    pub about: String,
    pub contact: String,
    pub legal: String,
    pub privacy: String,
    pub terms: String,
    /// Copyright line with a `{year}` placeholder
    pub copyright: String,
}

impl Dictionary {
    /// Parse and validate one dictionary
    pub fn from_json_str(json: &str, language: Language) -> Result<Self, DictionaryError> {
        let dictionary: Dictionary = serde_json::from_str(json)?;
        dictionary.validate(language)?;
        Ok(dictionary)
    }

    fn from_value(value: serde_json::Value, language: Language) -> Result<Self, DictionaryError> {
        let dictionary: Dictionary = serde_json::from_value(value)?;
        dictionary.validate(language)?;
        Ok(dictionary)
    }

    fn validate(&self, language: Language) -> Result<(), DictionaryError> {
        match self
            .home
            .categories
            .iter()
            .find(|(_, label)| label.trim().is_empty())
        {
            Some((key, _)) => Err(DictionaryError::EmptyLabel {
                locale: language.code(),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Case-insensitive lookup in the category table
    pub fn category_label(&self, key: &str) -> Option<&str> {
        let key = key.trim().to_lowercase();
        self.home
            .categories
            .iter()
            .find(|(candidate, _)| candidate.to_lowercase() == key)
            .map(|(_, label)| label.as_str())
    }
}

/// The two locale dictionaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionaries {
    fr: Dictionary,
    nko: Dictionary,
}

impl Dictionaries {
    /// Load the dictionaries compiled into the crate
    pub fn embedded() -> Result<Self, DictionaryError> {
        Ok(Self {
            fr: Dictionary::from_json_str(FR_MESSAGES, Language::French)?,
            nko: Dictionary::from_json_str(NKO_MESSAGES, Language::Nko)?,
        })
    }

    /// Load dictionaries from a locale map such as `{ "fr": {...}, "nko": {...} }`
    ///
    /// Locale keys are parsed with [`Language::from_code`], so `nqo` is
    /// accepted for N'Ko. Any other key is rejected.
    pub fn from_locale_map(json: &str) -> Result<Self, DictionaryError> {
        let map: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut fr = None;
        let mut nko = None;
        for (key, value) in map {
            match Language::from_code(&key) {
                Some(Language::French) => fr = Some(Dictionary::from_value(value, Language::French)?),
                Some(Language::Nko) => nko = Some(Dictionary::from_value(value, Language::Nko)?),
                None => return Err(DictionaryError::UnknownLocale(key)),
            }
        }

        Ok(Self {
            fr: fr.ok_or(DictionaryError::MissingLocale(Language::French.code()))?,
            nko: nko.ok_or(DictionaryError::MissingLocale(Language::Nko.code()))?,
        })
    }

    pub fn get(&self, language: Language) -> &Dictionary {
        match language {
            Language::French => &self.fr,
            Language::Nko => &self.nko,
        }
    }
}

fn builtin_table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::French => FR_CATEGORY_LABELS,
        Language::Nko => NKO_CATEGORY_LABELS,
    }
}

/// Resolve a raw category key or label to its display label
///
/// Resolving an already-resolved label returns it unchanged.
pub fn resolve_category_label(raw: &str, language: Language, dictionary: &Dictionary) -> String {
    if let Some(label) = dictionary.category_label(raw) {
        return label.to_string();
    }

    let key = raw.trim().to_lowercase();
    if let Some((_, label)) = builtin_table(language)
        .iter()
        .find(|(candidate, _)| *candidate == key)
    {
        return (*label).to_string();
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dictionaries() -> Dictionaries {
        Dictionaries::embedded().unwrap()
    }

    #[test]
    fn test_embedded_dictionaries_load() {
        let dictionaries = dictionaries();
        assert_eq!(dictionaries.get(Language::French).metadata.site_name, "N'ko ni Lonko");
        assert_eq!(
            dictionaries.get(Language::Nko).article.minutes,
            "ߡߌ߬ߛߍ߲"
        );
        assert!(dictionaries.get(Language::French).footer.copyright.contains("{year}"));
        assert!(dictionaries.get(Language::Nko).footer.copyright.contains("{year}"));
    }

    #[test]
    fn test_locales_share_category_keys() {
        let dictionaries = dictionaries();
        let fr: Vec<&String> = dictionaries.get(Language::French).home.categories.keys().collect();
        let nko: Vec<&String> = dictionaries.get(Language::Nko).home.categories.keys().collect();
        assert_eq!(fr, nko);
    }

    #[test]
    fn test_dictionary_overrides_builtin() {
        let dictionaries = dictionaries();
        let nko = dictionaries.get(Language::Nko);
        // built-in says ߢߣߊߡߦߊ, the dictionary wins
        assert_eq!(resolve_category_label("biology", Language::Nko, nko), "ߣߌߡߊߞߊߙߊ߲");
        assert_eq!(resolve_category_label("BIOLOGY", Language::Nko, nko), "ߣߌߡߊߞߊߙߊ߲");
        // French label only known to the built-in table
        assert_eq!(resolve_category_label("Biologie", Language::Nko, nko), "ߢߣߊߡߦߊ");
    }

    #[test]
    fn test_french_resolution() {
        let dictionaries = dictionaries();
        let fr = dictionaries.get(Language::French);
        assert_eq!(resolve_category_label("chemistry", Language::French, fr), "Chimie");
        assert_eq!(resolve_category_label("health", Language::French, fr), "Santé");
        assert_eq!(resolve_category_label("Chimie", Language::French, fr), "Chimie");
    }

    #[test]
    fn test_passthrough_keeps_raw_value() {
        let dictionaries = dictionaries();
        let nko = dictionaries.get(Language::Nko);
        assert_eq!(resolve_category_label(" Inconnu ", Language::Nko, nko), " Inconnu ");
    }

    #[test]
    fn test_locale_map_accepts_nqo_alias() {
        let json = format!(r#"{{ "fr": {FR_MESSAGES}, "nqo": {NKO_MESSAGES} }}"#);
        let loaded = Dictionaries::from_locale_map(&json).unwrap();
        assert_eq!(loaded, dictionaries());
    }

    #[test]
    fn test_locale_map_rejects_unknown_locale() {
        let json = format!(r#"{{ "fr": {FR_MESSAGES}, "nko": {NKO_MESSAGES}, "en": {FR_MESSAGES} }}"#);
        assert!(matches!(
            Dictionaries::from_locale_map(&json),
            Err(DictionaryError::UnknownLocale(ref key)) if key == "en"
        ));
    }

    #[test]
    fn test_locale_map_requires_both_locales() {
        let json = format!(r#"{{ "fr": {FR_MESSAGES} }}"#);
        assert!(matches!(
            Dictionaries::from_locale_map(&json),
            Err(DictionaryError::MissingLocale("nko"))
        ));
    }

    #[test]
    fn test_empty_label_rejected() {
        let json = FR_MESSAGES.replace("\"Chimie\"", "\"  \"");
        assert!(matches!(
            Dictionary::from_json_str(&json, Language::French),
            Err(DictionaryError::EmptyLabel { locale: "fr", ref key }) if key == "chemistry"
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = FR_MESSAGES.replacen("{", r#"{ "extra": 1, "#, 1);
        assert!(matches!(
            Dictionary::from_json_str(&json, Language::French),
            Err(DictionaryError::Parse(_))
        ));
    }

    fn known_keys() -> Vec<String> {
        let dictionaries = dictionaries();
        let mut keys: Vec<String> = FR_CATEGORY_LABELS
            .iter()
            .chain(NKO_CATEGORY_LABELS)
            .map(|(key, _)| key.to_string())
            .collect();
        keys.extend(dictionaries.get(Language::French).home.categories.keys().cloned());
        keys
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent(
            index in 0usize..64,
            nko in any::<bool>(),
            free in "\\PC{0,16}",
        ) {
            let dictionaries = dictionaries();
            let language = if nko { Language::Nko } else { Language::French };
            let dictionary = dictionaries.get(language);

            let keys = known_keys();
            let raw = keys.get(index).cloned().unwrap_or(free);

            let once = resolve_category_label(&raw, language, dictionary);
            let twice = resolve_category_label(&once, language, dictionary);
            prop_assert_eq!(once, twice);
        }
    }
}
