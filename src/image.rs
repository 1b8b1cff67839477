//! Image URL building for content-store assets
//!
//! Asset references have the form `image-<id>-<width>x<height>-<format>`.
//! The CDN serves them at
//! `<cdn>/images/<project>/<dataset>/<id>-<width>x<height>.<format>`.
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::image::{CdnImageUrlBuilder, ImageUrlBuilder};
//! use lonko_content::model::AssetRef;
//!
//! let builder = CdnImageUrlBuilder::new("https://cdn.sanity.io", "yfsyhc2p", "production");
//! let url = builder.build_url(&AssetRef("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg".into()));
//! assert_eq!(
//!     url.as_deref(),
//!     Some("https://cdn.sanity.io/images/yfsyhc2p/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg")
//! );
//!
//! assert_eq!(builder.build_url(&AssetRef("not-an-asset".into())), None);
//! ```

use regex::Regex;
use std::sync::OnceLock;

use crate::config::ContentSourceConfig;
use crate::model::AssetRef;

/// Turns asset references into fetchable URLs
///
/// Implementations must not panic on malformed or empty references; they
/// return `None` instead.
pub trait ImageUrlBuilder {
    fn build_url(&self, asset: &AssetRef) -> Option<String>;
}

/// Builder for the content store's public image CDN
#[derive(Debug, Clone)]
pub struct CdnImageUrlBuilder {
    base: String,
    project_id: String,
    dataset: String,
}

impl CdnImageUrlBuilder {
    pub fn new(base: &str, project_id: &str, dataset: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            dataset: dataset.to_string(),
        }
    }

    pub fn from_config(config: &ContentSourceConfig) -> Self {
        Self::new(&config.cdn_base, &config.project_id, &config.dataset)
    }
}

impl ImageUrlBuilder for CdnImageUrlBuilder {
    fn build_url(&self, asset: &AssetRef) -> Option<String> {
        static ASSET_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        let regex = ASSET_REGEX
            .get_or_init(|| Regex::new(r"^image-([A-Za-z0-9]+)-(\d+)x(\d+)-([a-z0-9]+)$").ok());
        let caps = regex.as_ref()?.captures(asset.as_str().trim())?;

        Some(format!(
            "{}/images/{}/{}/{}-{}x{}.{}",
            self.base,
            self.project_id,
            self.dataset,
            &caps[1],
            &caps[2],
            &caps[3],
            &caps[4]
        ))
    }
}
