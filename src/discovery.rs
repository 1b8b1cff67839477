//! Content discovery - search, category filtering and incremental pagination
//!
//! All articles are held in memory from a single initial load. Filtering is a
//! pure function of the article list and the UI state; "load more" only
//! widens the window and never triggers a fetch.
//!
//! # Visible Set
//!
//! [`compute_visible`] applies, in order:
//!
//! 1. **Category filter**: `All` passes everything; otherwise an article matches
//!    when its raw category equals one of the active category's display labels,
//!    equals the key, or (lenient mode only) contains the key. Comparisons are
//!    case-insensitive on trimmed values.
//! 2. **Search filter**: a non-blank query (trimmed, case-folded) must be a
//!    substring of the title or the excerpt.
//! 3. **Truncation**: the first `visible_count` matches are kept; `has_more`
//!    reports whether any were cut.
//!
//! # State Rules
//!
//! [`DiscoveryEngine`] owns the mutable view state. Committing a query or
//! changing the category always resets the visible count to the page size.
//! Keystrokes update the displayed query at once but reach the filter only
//! through a last-write-wins debouncer. Cards are revealed through the
//! engine's own [`RevealTracker`], keyed by slug. [`DiscoveryEngine::teardown`]
//! cancels the pending query and disconnects the tracker.
//!
//! # Examples
//!
//! ```rust
//! use chrono::Utc;
//! use lonko_content::config::CategoryMatch;
//! use lonko_content::discovery::{CategoryFilter, compute_visible};
//! use lonko_content::model::Article;
//!
//! let article = |title: &str, category: &str| Article {
//!     title: title.into(),
//!     slug: title.to_lowercase().replace(' ', "-"),
//!     cover_image_url: None,
//!     cover_image_alt: None,
//!     published_at: Utc::now(),
//!     body: Vec::new(),
//!     excerpt: String::new(),
//!     category: category.into(),
//!     author: None,
//! };
//! let articles = vec![article("Mars Rover", "Astronomie"), article("DNA Basics", "Biologie")];
//!
//! let visible = compute_visible(&articles, "dna", &CategoryFilter::All, 6, CategoryMatch::Lenient);
//! assert_eq!(visible.articles.len(), 1);
//! assert_eq!(visible.articles[0].title, "DNA Basics");
//! assert!(!visible.has_more);
//! ```

use std::time::Instant;
use tracing::debug;

use crate::config::{CategoryMatch, SiteConfig};
use crate::deferred::{Debouncer, RevealTracker};
use crate::dictionary::{Dictionaries, resolve_category_label};
use crate::localization::Language;
use crate::model::Article;

/// The active category filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category {
        /// Machine key, e.g. `biology`
        key: String,
        /// Display labels the key resolves to
        labels: Vec<String>,
    },
}

impl CategoryFilter {
    /// Filter on a key alone, without display labels
    pub fn key(key: &str) -> Self {
        CategoryFilter::Category {
            key: key.trim().to_string(),
            labels: Vec::new(),
        }
    }

    /// Filter on a key and its labels in the active and primary languages
    pub fn for_key(key: &str, dictionaries: &Dictionaries, language: Language) -> Self {
        let mut labels = Vec::with_capacity(2);
        for lang in [language, Language::French] {
            let label = resolve_category_label(key, lang, dictionaries.get(lang));
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        CategoryFilter::Category {
            key: key.trim().to_string(),
            labels,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }

    /// Whether an article's raw category passes this filter
    pub fn matches(&self, raw_category: &str, mode: CategoryMatch) -> bool {
        let CategoryFilter::Category { key, labels } = self else {
            return true;
        };

        let raw = raw_category.trim().to_lowercase();
        let key = key.trim().to_lowercase();

        if labels.iter().any(|label| label.trim().to_lowercase() == raw) || raw == key {
            return true;
        }

        mode == CategoryMatch::Lenient && !key.is_empty() && raw.contains(&key)
    }
}

/// Result of [`compute_visible`]
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleArticles<'a> {
    pub articles: Vec<&'a Article>,
    /// True when more filtered articles exist beyond the window
    pub has_more: bool,
    /// Number of articles passing both filters
    pub total_matches: usize,
}

/// Whether an article passes the search query
///
/// `query` must already be trimmed and case-folded.
fn matches_query(article: &Article, query: &str) -> bool {
    query.is_empty()
        || article.title.to_lowercase().contains(query)
        || article.excerpt.to_lowercase().contains(query)
}

/// Compute the visible subset of `articles`
pub fn compute_visible<'a>(
    articles: &'a [Article],
    query: &str,
    category: &CategoryFilter,
    visible_count: usize,
    mode: CategoryMatch,
) -> VisibleArticles<'a> {
    let query = query.trim().to_lowercase();

    let filtered: Vec<&Article> = articles
        .iter()
        .filter(|article| category.matches(&article.category, mode))
        .filter(|article| matches_query(article, &query))
        .collect();

    let total_matches = filtered.len();
    let mut visible = filtered;
    visible.truncate(visible_count);

    VisibleArticles {
        articles: visible,
        has_more: total_matches > visible_count,
        total_matches,
    }
}

/// View state for the article feed
pub struct DiscoveryEngine {
    articles: Vec<Article>,
    query_input: String,
    query: String,
    category: CategoryFilter,
    visible_count: usize,
    page_size: usize,
    load_more_step: usize,
    category_match: CategoryMatch,
    debouncer: Debouncer<String>,
    reveal: RevealTracker<String>,
}

impl DiscoveryEngine {
    /// Create an engine over one fetch cycle's articles
    pub fn new(articles: Vec<Article>, config: &SiteConfig) -> Self {
        let page_size = config.page_size.max(1);
        Self {
            articles,
            query_input: String::new(),
            query: String::new(),
            category: CategoryFilter::All,
            visible_count: page_size,
            page_size,
            load_more_step: config.load_more_step.max(1),
            category_match: config.category_match,
            debouncer: Debouncer::new(config.debounce),
            reveal: RevealTracker::new(config.reveal_threshold),
        }
    }

    /// Record a keystroke; the filter picks it up once the debounce elapses
    pub fn input_query(&mut self, text: &str, now: Instant) {
        self.query_input = text.to_string();
        self.debouncer.push(text.to_string(), now);
    }

    /// Apply a debounced query if due; returns true when one was applied
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.commit_query(query);
                true
            }
            None => false,
        }
    }

    /// Apply a query immediately, bypassing the debounce
    pub fn set_query(&mut self, text: &str) {
        self.debouncer.cancel();
        self.query_input = text.to_string();
        self.commit_query(text.to_string());
    }

    fn commit_query(&mut self, query: String) {
        debug!(query = %query, "search query applied");
        self.query = query;
        self.visible_count = self.page_size;
    }

    /// Change the category filter
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.visible_count = self.page_size;
    }

    /// Widen the window by one step
    pub fn load_more(&mut self) {
        self.visible_count += self.load_more_step;
    }

    /// The visible subset for the current state
    pub fn visible(&self) -> VisibleArticles<'_> {
        compute_visible(
            &self.articles,
            &self.query,
            &self.category,
            self.visible_count,
            self.category_match,
        )
    }

    /// Start watching the cards of the visible subset
    pub fn observe_visible(&mut self) {
        let slugs: Vec<String> = self
            .visible()
            .articles
            .iter()
            .map(|article| article.slug.clone())
            .collect();
        for slug in slugs {
            self.reveal.observe(slug);
        }
    }

    /// Report a card's visible ratio; returns true on the report that reveals it
    pub fn report_visibility(&mut self, slug: &str, visible_ratio: f32) -> bool {
        self.reveal.report(&slug.to_string(), visible_ratio)
    }

    pub fn reveal(&self) -> &RevealTracker<String> {
        &self.reveal
    }

    /// Cancel the pending query and stop observing cards
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.reveal.disconnect();
    }

    /// Query as typed, shown in the search box
    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    /// Query currently applied to the filter
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn has_pending_query(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use proptest::prelude::*;
    use std::time::Duration;

    fn article(title: &str, category: &str, excerpt: &str) -> Article {
        Article {
            title: title.into(),
            slug: title.to_lowercase().replace(' ', "-"),
            cover_image_url: None,
            cover_image_alt: None,
            published_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            body: Vec::new(),
            excerpt: excerpt.into(),
            category: category.into(),
            author: None,
        }
    }

    fn feed(n: usize) -> Vec<Article> {
        (0..n)
            .map(|i| {
                let mut a = article(&format!("Article {i}"), "Science", "");
                a.published_at += ChronoDuration::days(i as i64);
                a
            })
            .collect()
    }

    #[test]
    fn test_search_by_title() {
        let articles = vec![
            article("Mars Rover", "Astronomie", ""),
            article("DNA Basics", "Biologie", ""),
        ];
        let visible = compute_visible(&articles, "dna", &CategoryFilter::All, 6, CategoryMatch::Lenient);
        let titles: Vec<&str> = visible.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["DNA Basics"]);
    }

    #[test]
    fn test_search_by_excerpt_and_trim() {
        let articles = vec![
            article("Mars", "Astronomie", "Le robot Curiosity"),
            article("Lune", "Astronomie", ""),
        ];
        let visible = compute_visible(&articles, "  CURIOSITY ", &CategoryFilter::All, 6, CategoryMatch::Lenient);
        assert_eq!(visible.articles.len(), 1);
        assert_eq!(visible.articles[0].title, "Mars");

        let all = compute_visible(&articles, "   ", &CategoryFilter::All, 6, CategoryMatch::Lenient);
        assert_eq!(all.articles.len(), 2);
    }

    #[test]
    fn test_key_matches_label_case_insensitive() {
        let articles = vec![article("ADN", "Biologie", "")];
        let filter = CategoryFilter::key("biologie");
        let visible = compute_visible(&articles, "", &filter, 6, CategoryMatch::Exact);
        assert_eq!(visible.articles.len(), 1);
    }

    #[test]
    fn test_label_match_via_dictionaries() {
        let dictionaries = Dictionaries::embedded().unwrap();
        let articles = vec![
            article("A", "Physique", ""),
            article("B", "ߘߐ߬ߞߏ", ""),
            article("C", "physics", ""),
            article("D", "Chimie", ""),
        ];

        let filter = CategoryFilter::for_key("physics", &dictionaries, Language::Nko);
        let visible = compute_visible(&articles, "", &filter, 6, CategoryMatch::Exact);
        let titles: Vec<&str> = visible.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_substring_only_in_lenient_mode() {
        let filter = CategoryFilter::key("bio");
        assert!(filter.matches("Biologie marine", CategoryMatch::Lenient));
        assert!(!filter.matches("Biologie marine", CategoryMatch::Exact));
        assert!(CategoryFilter::All.matches("", CategoryMatch::Exact));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let articles = vec![
            article("Atomes", "Physique", ""),
            article("Atomes du vivant", "Biologie", ""),
        ];
        let filter = CategoryFilter::key("biologie");
        let visible = compute_visible(&articles, "atome", &filter, 6, CategoryMatch::Lenient);
        assert_eq!(visible.articles.len(), 1);
        assert_eq!(visible.articles[0].category, "Biologie");
    }

    #[test]
    fn test_truncation_and_has_more() {
        let articles = feed(7);
        let visible = compute_visible(&articles, "", &CategoryFilter::All, 6, CategoryMatch::Lenient);
        assert_eq!(visible.articles.len(), 6);
        assert!(visible.has_more);
        assert_eq!(visible.total_matches, 7);

        let visible = compute_visible(&articles, "", &CategoryFilter::All, 7, CategoryMatch::Lenient);
        assert!(!visible.has_more);
    }

    #[test]
    fn test_query_resets_visible_count() {
        let config = SiteConfig::default();
        let mut engine = DiscoveryEngine::new(feed(20), &config);
        engine.load_more();
        engine.load_more();
        assert_eq!(engine.visible_count(), 12);

        engine.set_query("atom");
        assert_eq!(engine.visible_count(), 6);
    }

    #[test]
    fn test_category_resets_visible_count() {
        let config = SiteConfig::default();
        let mut engine = DiscoveryEngine::new(feed(20), &config);
        engine.load_more();
        engine.set_category(CategoryFilter::key("science"));
        assert_eq!(engine.visible_count(), 6);
        assert_eq!(engine.visible().articles.len(), 6);

        engine.load_more();
        engine.set_category(CategoryFilter::All);
        assert_eq!(engine.visible_count(), 6);
    }

    #[test]
    fn test_debounced_query() {
        let config = SiteConfig::default();
        let mut engine = DiscoveryEngine::new(
            vec![article("Mars", "Astronomie", ""), article("ADN", "Biologie", "")],
            &config,
        );
        let start = Instant::now();

        engine.input_query("m", start);
        engine.input_query("ma", start + Duration::from_millis(120));
        assert_eq!(engine.query_input(), "ma");
        assert_eq!(engine.query(), "");
        assert_eq!(engine.visible().articles.len(), 2);

        assert!(!engine.poll(start + Duration::from_millis(300)));
        assert!(engine.poll(start + Duration::from_millis(420)));
        assert_eq!(engine.query(), "ma");
        assert_eq!(engine.visible().articles.len(), 1);
    }

    #[test]
    fn test_teardown_cancels_pending_query() {
        let config = SiteConfig::default();
        let mut engine = DiscoveryEngine::new(feed(3), &config);
        let start = Instant::now();

        engine.input_query("zzz", start);
        engine.teardown();
        assert!(!engine.has_pending_query());
        assert!(!engine.poll(start + Duration::from_secs(1)));
        assert_eq!(engine.query(), "");
    }

    #[test]
    fn test_reveal_cards_until_teardown() {
        let config = SiteConfig::default();
        let mut engine = DiscoveryEngine::new(feed(3), &config);
        engine.observe_visible();
        assert_eq!(engine.reveal().pending(), 3);

        assert!(engine.report_visibility("article-0", 0.5));
        assert!(!engine.report_visibility("article-0", 0.9));
        assert!(!engine.report_visibility("article-1", 0.05));
        assert!(!engine.report_visibility("absent", 1.0));

        engine.teardown();
        assert!(!engine.reveal().is_connected());
        assert_eq!(engine.reveal().pending(), 0);
        assert!(!engine.report_visibility("article-1", 1.0));
        assert!(engine.reveal().is_revealed(&"article-0".to_string()));

        engine.observe_visible();
        assert_eq!(engine.reveal().pending(), 0);
    }

    #[test]
    fn test_debounced_commit_resets_visible_count() {
        let config = SiteConfig::default();
        let mut engine = DiscoveryEngine::new(feed(20), &config);
        let start = Instant::now();
        engine.load_more();

        engine.input_query("article", start);
        assert_eq!(engine.visible_count(), 9);
        engine.poll(start + config.debounce);
        assert_eq!(engine.visible_count(), 6);
    }

    proptest! {
        #[test]
        fn prop_window_invariants(
            n in 0usize..40,
            clicks in 0usize..10,
            query in "[a-z0-9 ]{0,4}",
        ) {
            let config = SiteConfig::default();
            let mut engine = DiscoveryEngine::new(feed(n), &config);
            for _ in 0..clicks {
                engine.load_more();
            }
            prop_assert_eq!(engine.visible_count(), 6 + 3 * clicks);

            let visible = engine.visible();
            prop_assert!(visible.articles.len() <= engine.visible_count());
            prop_assert_eq!(visible.has_more, visible.total_matches > engine.visible_count());

            engine.set_query(&query);
            prop_assert_eq!(engine.visible_count(), 6);
        }
    }
}
