//! Language state and locale-aware formatting
//!
//! The active language lives in a [`LanguageContext`] that consumers receive
//! explicitly. [`LanguageContext::toggle_language`] is the only way to change
//! it, and each change applies its side effects in one place: the document's
//! reading direction and `lang` attribute are updated and the choice is
//! persisted.
//!
//! # Initialization Order
//!
//! 1. **Stored preference**: a previously persisted language code
//! 2. **Browser negotiation**: an `Accept-Language`-style list naming N'Ko
//! 3. **Primary language**: French
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::config::SiteConfig;
//! use lonko_content::dictionary::Dictionaries;
//! use lonko_content::localization::{Language, LanguageContext, MemoryDocument, MemoryPreferenceStore};
//! use lonko_content::script::Direction;
//!
//! let mut ctx = LanguageContext::initialize(
//!     Dictionaries::embedded().unwrap(),
//!     MemoryPreferenceStore::default(),
//!     MemoryDocument::default(),
//!     &SiteConfig::default(),
//!     Some("nqo-GN, fr;q=0.8"),
//! );
//! assert_eq!(ctx.language(), Language::Nko);
//! assert_eq!(ctx.document().direction(), Direction::Rtl);
//!
//! ctx.toggle_language();
//! assert_eq!(ctx.language(), Language::French);
//! assert_eq!(ctx.store().get("preferred-lang"), Some("fr"));
//! ```

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::config::SiteConfig;
use crate::dictionary::{Dictionaries, Dictionary, resolve_category_label};
use crate::model::ContentBlock;
use crate::reading_time::ReadingTimeEstimator;
use crate::script::{Direction, digits_to_local_script};

/// N'Ko month names, January first
pub const NKO_MONTHS: [&str; 12] = [
    "ߓߌ߲ߠߊߥߎߟߋ߲",
    "ߞߏ߲ߞߏߜߍ",
    "ߕߙߊߓߊ",
    "ߞߏ߲ߞߏߘߌ߬ߓߌ",
    "ߘߓߊ߬ߕߊ",
    "ߘߓߊ߬ߓߌߟߊ",
    "ߞߐ߬ߓߊ߬ߟߏ߲",
    "ߘߓߊ߬ߗߍ",
    "ߕߎߟߊߝߌ߲",
    "ߓߊ߲߬ߘߊ߬ߓߌߟߊ",
    "ߣߍߣߍߓߊ",
    "ߞߏߟߌ߲ߞߏߟߌ߲",
];

/// Abbreviated French month names, January first
const FR_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Particle between the N'Ko month and day
const NKO_DAY_MARKER: &str = "ߕߟߋ߬";
/// Particle between the N'Ko day and year
const NKO_YEAR_MARKER: &str = "ߛߊ߲߭";

/// One of the two supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Language {
    /// Primary language, left-to-right
    #[default]
    French,
    /// Secondary language, right-to-left
    Nko,
}

impl Language {
    /// Code used for persistence and dictionary keys
    pub fn code(self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::Nko => "nko",
        }
    }

    /// BCP 47 tag for the document `lang` attribute
    pub fn lang_tag(self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::Nko => "nqo",
        }
    }

    /// Parse a persisted code or locale key (`fr`, `nko`, `nqo`)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Language::French),
            "nko" | "nqo" => Some(Language::Nko),
            _ => None,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Language::French => Direction::Ltr,
            Language::Nko => Direction::Rtl,
        }
    }

    /// The other language
    pub fn toggled(self) -> Self {
        match self {
            Language::French => Language::Nko,
            Language::Nko => Language::French,
        }
    }
}

/// Client-local key-value storage for the language preference
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// The document whose direction and language follow the active language
pub trait DocumentRoot {
    fn set_direction(&mut self, direction: Direction);
    fn set_lang(&mut self, tag: &str);
}

/// In-memory preference store
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    /// Store pre-seeded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.save(key, value);
        store
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// In-memory document root
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    direction: Direction,
    lang: String,
}

impl MemoryDocument {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }
}

impl DocumentRoot for MemoryDocument {
    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn set_lang(&mut self, tag: &str) {
        self.lang = tag.to_string();
    }
}

/// Pick N'Ko from an `Accept-Language`-style list
///
/// Returns `Some(Language::Nko)` when any acceptable entry has `nqo` or `nko`
/// as its primary subtag, `None` otherwise. Entries with `q=0` are ignored.
///
/// # Examples
///
/// ```rust
/// use lonko_content::localization::{Language, negotiate_language};
///
/// assert_eq!(negotiate_language("fr-FR, nqo;q=0.5"), Some(Language::Nko));
/// assert_eq!(negotiate_language("fr-FR, en"), None);
/// assert_eq!(negotiate_language("nqo;q=0"), None);
/// ```
pub fn negotiate_language(accept_language: &str) -> Option<Language> {
    accept_language
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim().to_ascii_lowercase();
            let refused = parts.any(|param| {
                param
                    .trim()
                    .strip_prefix("q=")
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .is_some_and(|q| q <= 0.0)
            });
            (!refused).then_some(tag)
        })
        .find_map(|tag| match tag.split(['-', '_']).next() {
            Some("nqo" | "nko") => Some(Language::Nko),
            _ => None,
        })
}

/// Show digits in the language's script
pub fn localize_digits(text: &str, language: Language) -> String {
    match language {
        Language::French => text.to_string(),
        Language::Nko => digits_to_local_script(text),
    }
}

/// Long date: `15 janv. 2026` or `{month} ߕߟߋ߬ {day} ߛߊ߲߭ {year}`
///
/// Both forms are the same Gregorian date in UTC.
pub fn format_date(timestamp: DateTime<Utc>, language: Language) -> String {
    let month = timestamp.month0() as usize;
    match language {
        Language::French => format!(
            "{} {} {}",
            timestamp.day(),
            FR_MONTHS[month],
            timestamp.year()
        ),
        Language::Nko => format!(
            "{} {} {} {} {}",
            NKO_MONTHS[month],
            NKO_DAY_MARKER,
            digits_to_local_script(&timestamp.day().to_string()),
            NKO_YEAR_MARKER,
            digits_to_local_script(&timestamp.year().to_string())
        ),
    }
}

/// Numeric date `dd/mm/yyyy`, with N'Ko digits for N'Ko
pub fn format_date_numeric(timestamp: DateTime<Utc>, language: Language) -> String {
    let numeric = timestamp.format("%d/%m/%Y").to_string();
    localize_digits(&numeric, language)
}

/// Footer copyright line for `year`
pub fn copyright_line(dictionary: &Dictionary, language: Language, year: i32) -> String {
    dictionary
        .footer
        .copyright
        .replace("{year}", &localize_digits(&year.to_string(), language))
}

/// Active language plus its side effects
pub struct LanguageContext<S: PreferenceStore, D: DocumentRoot> {
    language: Language,
    dictionaries: Dictionaries,
    reading_time: ReadingTimeEstimator,
    preference_key: String,
    store: S,
    document: D,
}

impl<S: PreferenceStore, D: DocumentRoot> LanguageContext<S, D> {
    /// Resolve the initial language and apply it to the document
    ///
    /// `browser_languages` is the browser's language list in
    /// `Accept-Language` form, if available.
    pub fn initialize(
        dictionaries: Dictionaries,
        store: S,
        document: D,
        config: &SiteConfig,
        browser_languages: Option<&str>,
    ) -> Self {
        let stored = store
            .load(&config.preference_key)
            .and_then(|code| Language::from_code(&code));

        let language = stored
            .or_else(|| browser_languages.and_then(negotiate_language))
            .unwrap_or_default();

        debug!(language = language.code(), from_store = stored.is_some(), "language initialized");

        let mut ctx = Self {
            language,
            dictionaries,
            reading_time: ReadingTimeEstimator::new(config.words_per_minute),
            preference_key: config.preference_key.clone(),
            store,
            document,
        };
        ctx.apply();
        ctx
    }

    /// Flip the active language, update the document and persist the choice
    pub fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggled();
        debug!(language = self.language.code(), "language toggled");
        self.apply();
        self.language
    }

    fn apply(&mut self) {
        self.document.set_direction(self.language.direction());
        self.document.set_lang(self.language.lang_tag());
        self.store.save(&self.preference_key, self.language.code());
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    /// Dictionary of the active language
    pub fn dictionary(&self) -> &Dictionary {
        self.dictionaries.get(self.language)
    }

    /// Dictionary of a specific language
    pub fn dictionary_for(&self, language: Language) -> &Dictionary {
        self.dictionaries.get(language)
    }

    pub fn is_secondary(&self) -> bool {
        self.language == Language::Nko
    }

    pub fn localize_digits(&self, text: &str) -> String {
        localize_digits(text, self.language)
    }

    pub fn format_date(&self, timestamp: DateTime<Utc>) -> String {
        format_date(timestamp, self.language)
    }

    pub fn format_date_numeric(&self, timestamp: DateTime<Utc>) -> String {
        format_date_numeric(timestamp, self.language)
    }

    /// Display label of a category in the active language
    pub fn resolve_category_label(&self, raw: &str) -> String {
        resolve_category_label(raw, self.language, self.dictionary())
    }

    /// Reading time in whole minutes
    pub fn estimate_reading_time(&self, body: &[ContentBlock]) -> usize {
        self.reading_time.estimate(body)
    }

    pub fn copyright_line(&self, year: i32) -> String {
        copyright_line(self.dictionary(), self.language, year)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn document(&self) -> &D {
        &self.document
    }
}
