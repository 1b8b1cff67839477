//! Localization engine tests
//!
//! Language state transitions, digit transliteration, category-label
//! resolution and reading time, exercised through the public API.

use lonko_content::config::SiteConfig;
use lonko_content::dictionary::Dictionaries;
use lonko_content::localization::{
    DocumentRoot, Language, LanguageContext, MemoryDocument, MemoryPreferenceStore,
    PreferenceStore,
};
use lonko_content::model::{ContentBlock, ImageBlock, Span};
use lonko_content::script::{Direction, digits_to_local_script, local_digits_to_ascii};
use proptest::prelude::*;

/// Store that records every write, to check persistence happens on toggle
#[derive(Default)]
struct RecordingStore {
    writes: Vec<(String, String)>,
}

impl PreferenceStore for RecordingStore {
    fn load(&self, key: &str) -> Option<String> {
        self.writes
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn save(&mut self, key: &str, value: &str) {
        self.writes.push((key.to_string(), value.to_string()));
    }
}

/// Document that records every direction change
#[derive(Default)]
struct RecordingDocument {
    directions: Vec<Direction>,
    lang: String,
}

impl DocumentRoot for RecordingDocument {
    fn set_direction(&mut self, direction: Direction) {
        self.directions.push(direction);
    }

    fn set_lang(&mut self, tag: &str) {
        self.lang = tag.to_string();
    }
}

fn dictionaries() -> Dictionaries {
    Dictionaries::embedded().expect("embedded dictionaries are valid")
}

#[test]
fn test_toggle_applies_side_effects_each_time() {
    let mut ctx = LanguageContext::initialize(
        dictionaries(),
        RecordingStore::default(),
        RecordingDocument::default(),
        &SiteConfig::default(),
        None,
    );

    ctx.toggle_language();
    assert_eq!(ctx.document().lang, "nqo");
    ctx.toggle_language();

    assert_eq!(
        ctx.document().directions,
        vec![Direction::Ltr, Direction::Rtl, Direction::Ltr]
    );
    let values: Vec<&str> = ctx.store().writes.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["fr", "nko", "fr"]);
}

#[test]
fn test_toggle_twice_restores_direction_and_preference() {
    for stored in ["fr", "nko"] {
        let mut ctx = LanguageContext::initialize(
            dictionaries(),
            MemoryPreferenceStore::with_entry("preferred-lang", stored),
            MemoryDocument::default(),
            &SiteConfig::default(),
            None,
        );
        let direction = ctx.document().direction();

        ctx.toggle_language();
        assert_ne!(ctx.document().direction(), direction);
        ctx.toggle_language();

        assert_eq!(ctx.document().direction(), direction);
        assert_eq!(ctx.store().get("preferred-lang"), Some(stored));
    }
}

#[test]
fn test_custom_preference_key() {
    let config = SiteConfig::from_json_str(r#"{ "preference_key": "lang" }"#).unwrap();
    let ctx = LanguageContext::initialize(
        dictionaries(),
        MemoryPreferenceStore::with_entry("lang", "nqo"),
        MemoryDocument::default(),
        &config,
        None,
    );
    assert_eq!(ctx.language(), Language::Nko);
    assert_eq!(ctx.store().get("lang"), Some("nko"));
}

#[test]
fn test_dictionary_follows_language() {
    let mut ctx = LanguageContext::initialize(
        dictionaries(),
        MemoryPreferenceStore::default(),
        MemoryDocument::default(),
        &SiteConfig::default(),
        Some("fr-FR"),
    );
    assert_eq!(ctx.dictionary().nav.home, "Accueil");
    ctx.toggle_language();
    assert_eq!(ctx.dictionary().nav.home, "ߟߊ߬ߓߍ߲߬ߠߌ");
    assert_eq!(ctx.dictionary_for(Language::French).nav.home, "Accueil");
}

#[test]
fn test_reading_time_examples() {
    let ctx = LanguageContext::initialize(
        dictionaries(),
        MemoryPreferenceStore::default(),
        MemoryDocument::default(),
        &SiteConfig::default(),
        None,
    );

    let words: Vec<String> = (0..400).map(|i| format!("mot{i}")).collect();
    let body = vec![
        ContentBlock::Heading {
            level: lonko_content::model::HeadingLevel::H2,
            spans: vec![Span::plain(words[..100].join(" "))],
        },
        ContentBlock::Image(ImageBlock {
            asset: None,
            direct_url: None,
            caption: Some("légende non comptée".into()),
            alt_text: None,
            credit: None,
        }),
        ContentBlock::Paragraph {
            spans: vec![Span::plain(words[100..].join(" "))],
        },
    ];

    assert_eq!(ctx.estimate_reading_time(&body), 2);
    assert_eq!(ctx.estimate_reading_time(&[]), 1);
}

proptest! {
    #[test]
    fn prop_digits_round_trip(digits in "[0-9]{0,40}") {
        prop_assert_eq!(local_digits_to_ascii(&digits_to_local_script(&digits)), digits);
    }

    #[test]
    fn prop_category_resolution_idempotent(raw in "\\PC{0,20}", nko in any::<bool>()) {
        let mut ctx = LanguageContext::initialize(
            dictionaries(),
            MemoryPreferenceStore::default(),
            MemoryDocument::default(),
            &SiteConfig::default(),
            None,
        );
        if nko {
            ctx.toggle_language();
        }
        let once = ctx.resolve_category_label(&raw);
        prop_assert_eq!(ctx.resolve_category_label(&once), once);
    }
}
