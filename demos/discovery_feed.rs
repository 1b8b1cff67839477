//! Feed example: search, category filter and "load more" over a loaded feed

use std::time::{Duration, Instant};

use lonko_content::card::ArticleCard;
use lonko_content::config::SiteConfig;
use lonko_content::dictionary::Dictionaries;
use lonko_content::discovery::{CategoryFilter, DiscoveryEngine};
use lonko_content::etag::FeedETag;
use lonko_content::image::CdnImageUrlBuilder;
use lonko_content::localization::{
    DocumentRoot, LanguageContext, MemoryDocument, MemoryPreferenceStore, PreferenceStore,
};
use lonko_content::provider::{StaticProvider, load_articles};
use lonko_content::transform::SafeTransformer;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn payload() -> Vec<u8> {
    let topics = [
        ("Les trous noirs", "Astronomie"),
        ("L'ADN expliqué", "Biologie"),
        ("La gravité quantique", "Physique quantique"),
        ("Les volcans du Mali", "Géologie"),
        ("Le théorème de Pythagore", "Mathématiques"),
        ("Les atomes", "Chimie"),
        ("Les exoplanètes", "astronomy"),
        ("La photosynthèse", "Biologie"),
        ("Les ondes", "Physique"),
    ];

    let records: Vec<_> = topics
        .iter()
        .enumerate()
        .map(|(i, (title, category))| {
            json!({
                "title": title,
                "slug": format!("article-{i}"),
                "publishedAt": format!("2025-0{}-15", i % 9 + 1),
                "category": category,
                "body": [{ "_type": "block", "children": [{ "text": format!("{title}, une introduction.") }] }]
            })
        })
        .collect();

    serde_json::to_vec(&json!({ "result": records })).unwrap_or_default()
}

fn print_cards<S: PreferenceStore, D: DocumentRoot>(
    engine: &DiscoveryEngine,
    ctx: &LanguageContext<S, D>,
) {
    let visible = engine.visible();
    for article in &visible.articles {
        let card = ArticleCard::build(article, ctx);
        println!(
            "  {:<28} {:<22} {:<18} {}",
            card.title, card.category, card.date, card.reading_time
        );
    }
    if visible.articles.is_empty() {
        println!("  {}", ctx.dictionary().search.no_results);
    }
    println!(
        "  ({} of {} shown{})\n",
        visible.articles.len(),
        visible.total_matches,
        if visible.has_more { ", more available" } else { "" }
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== N'Ko ni Lonko - Discovery ===\n");

    let config = SiteConfig::default();
    let images = CdnImageUrlBuilder::new("https://cdn.sanity.io", "demo", "production");
    let transformer = SafeTransformer::new(&images, &config);

    let provider = match StaticProvider::from_payload(&payload(), Some("application/json")) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("invalid payload: {err}");
            return;
        }
    };
    let articles = load_articles(&provider, &transformer).await;

    match FeedETag::generate(&articles) {
        Ok(etag) => println!("Feed snapshot: {etag}\n"),
        Err(err) => eprintln!("could not tag feed: {err}"),
    }

    let dictionaries = match Dictionaries::embedded() {
        Ok(dictionaries) => dictionaries,
        Err(err) => {
            eprintln!("dictionaries unavailable: {err}");
            return;
        }
    };
    let biology = CategoryFilter::for_key("biology", &dictionaries, lonko_content::Language::Nko);
    let mut ctx = LanguageContext::initialize(
        dictionaries,
        MemoryPreferenceStore::default(),
        MemoryDocument::default(),
        &config,
        None,
    );
    let mut engine = DiscoveryEngine::new(articles, &config);

    println!("First page:");
    print_cards(&engine, &ctx);

    // Cards fade in once a tenth of them is on screen
    engine.observe_visible();
    let slugs: Vec<String> = engine
        .visible()
        .articles
        .iter()
        .map(|article| article.slug.clone())
        .collect();
    for (i, slug) in slugs.iter().enumerate() {
        let ratio = if i < 3 { 0.6 } else { 0.05 };
        if engine.report_visibility(slug, ratio) {
            println!("  revealed {slug}");
        }
    }
    println!("  {} cards still hidden\n", engine.reveal().pending());

    engine.load_more();
    println!("After load more:");
    print_cards(&engine, &ctx);

    let start = Instant::now();
    for (offset, text) in ["p", "ph", "physique"].iter().enumerate() {
        engine.input_query(text, start + Duration::from_millis(offset as u64 * 80));
    }
    engine.poll(start + config.debounce + Duration::from_millis(200));
    println!("Search \"{}\":", engine.query());
    print_cards(&engine, &ctx);

    engine.set_query("");
    engine.set_category(biology);
    ctx.toggle_language();
    println!("Category biology, in N'Ko:");
    print_cards(&engine, &ctx);

    engine.teardown();
}
