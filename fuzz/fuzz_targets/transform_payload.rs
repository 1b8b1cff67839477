#![no_main]

use libfuzzer_sys::fuzz_target;
use lonko_content::config::SiteConfig;
use lonko_content::image::CdnImageUrlBuilder;
use lonko_content::provider::parse_payload;
use lonko_content::render::BlockRenderer;
use lonko_content::transform::SafeTransformer;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(raws) = parse_payload(text) else {
        return;
    };

    let config = SiteConfig::default();
    let images = CdnImageUrlBuilder::new("https://cdn.sanity.io", "fuzz", "production");
    let transformer = SafeTransformer::new(&images, &config);
    let renderer = BlockRenderer::new(&images);

    for article in transformer.transform_all(&raws) {
        assert!(!article.title.is_empty());
        assert!(!article.category.trim().is_empty());
        let _ = renderer.to_html(&article.body);
    }
});
