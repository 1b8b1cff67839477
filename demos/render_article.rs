//! Reading-view example: load one article and render it in both languages
//!
//! Run with `RUST_LOG=lonko_content=debug` to see skipped blocks and records.

use lonko_content::config::SiteConfig;
use lonko_content::dictionary::Dictionaries;
use lonko_content::image::CdnImageUrlBuilder;
use lonko_content::localization::{LanguageContext, MemoryDocument, MemoryPreferenceStore};
use lonko_content::provider::{StaticProvider, load_article};
use lonko_content::reader::{ArticleView, ReaderSettings, scroll_progress};
use lonko_content::render::BlockRenderer;
use lonko_content::transform::SafeTransformer;
use tracing_subscriber::EnvFilter;

const PAYLOAD: &str = r#"{
  "result": [
    {
      "title": "ߛߊ߲ߡߊߛߓߍ ߞߎ߲߬ߕߋ߲ (Les étoiles filantes)",
      "slug": { "_type": "slug", "current": "etoiles-filantes" },
      "publishedAt": "2025-08-12T21:00:00Z",
      "category": "astronomy",
      "mainImage": { "asset": { "_ref": "image-f1a2b3-1200x800-jpg" }, "alt": "Perséides" },
      "body": [
        { "_type": "block", "style": "h2", "children": [{ "text": "Les Perséides" }] },
        {
          "_type": "block",
          "markDefs": [{ "_key": "imo", "_type": "link", "href": "https://www.imo.net" }],
          "children": [
            { "text": "Chaque été, la Terre traverse les débris de la comète " },
            { "text": "Swift-Tuttle", "marks": ["strong"] },
            { "text": ". Voir l'" },
            { "text": "IMO", "marks": ["imo"] },
            { "text": "." }
          ]
        },
        { "_type": "block", "children": [{ "text": "ߞߊ߬ ߛߊ߲ߡߊߛߓߍ ߟߎ߬ ߦߋ߫ ߞߊ߲߬ ߘߐ߫" }] },
        { "_type": "block", "listItem": "bullet", "children": [{ "text": "Pic vers le 12 août" }] },
        { "_type": "block", "listItem": "bullet", "children": [{ "text": "Jusqu'à 100 météores par heure" }] },
        { "_type": "image", "asset": { "_ref": "image-c0ffee-800x600-png" }, "caption": "Trace lumineuse" },
        { "_type": "video", "url": "https://video.example/x.mp4" }
      ],
      "author": {
        "name": "Awa Keita",
        "nameNko": "ߊߥߊ ߞߋߕߊ",
        "role": "Astronome",
        "bio": "ߛߊ߲ߡߊߛߓߍ ߘߐ߬ߞߏ߬ߟߊ",
        "socials": [{ "platform": "site", "url": "https://awa.example" }]
      }
    }
  ]
}"#;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== N'Ko ni Lonko - Reading View ===\n");

    let config = SiteConfig::default();
    let images = CdnImageUrlBuilder::new("https://cdn.sanity.io", "demo", "production");
    let transformer = SafeTransformer::new(&images, &config);
    let renderer = BlockRenderer::new(&images);

    let provider = match StaticProvider::from_payload(PAYLOAD.as_bytes(), Some("application/json")) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("invalid payload: {err}");
            return;
        }
    };

    let Some(article) = load_article(&provider, &transformer, "etoiles-filantes").await else {
        eprintln!("article not found");
        return;
    };

    let dictionaries = match Dictionaries::embedded() {
        Ok(dictionaries) => dictionaries,
        Err(err) => {
            eprintln!("dictionaries unavailable: {err}");
            return;
        }
    };

    let mut ctx = LanguageContext::initialize(
        dictionaries,
        MemoryPreferenceStore::default(),
        MemoryDocument::default(),
        &config,
        Some("fr-FR,fr;q=0.9,en;q=0.5"),
    );

    for _ in 0..2 {
        let view = ArticleView::build(&article, &ctx, &renderer);
        println!("Language: {} (dir={})", ctx.language().code(), view.direction);
        println!("Title: {}", view.title);
        if let Some(secondary) = &view.title_secondary {
            println!("       {secondary}");
        }
        println!("Category: {}", view.category);
        println!("Date: {}  Reading time: {}", view.date, view.reading_time);
        if let Some(author) = &view.author {
            println!("Author: {} ({})", author.name, author.role);
        }
        println!("Blocks:");
        for block in &view.blocks {
            println!("  [{} {}] {}", block.class, block.direction, block.text);
        }
        println!("---\n");
        ctx.toggle_language();
    }

    println!("HTML body:");
    println!("{}", renderer.to_html(&article.body));

    let mut settings = ReaderSettings::new();
    settings.increase();
    settings.increase();
    println!("Font size after two zoom steps: {}", settings.css_font_size());
    println!(
        "Progress at 1200px of 3000px (viewport 900px): {:.0}%",
        scroll_progress(1200.0, 3000.0, 900.0) * 100.0
    );
}
