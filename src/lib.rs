//! N'Ko ni Lonko content pipeline
//!
//! This library turns loosely-structured documents from an external content
//! store into bilingual (French / N'Ko) article views: a searchable,
//! paginated feed and individual reading views.
//!
//! # Architecture
//!
//! Data flows leaf-first through these modules:
//! - `provider`: content provider interface, payload decoding and the loading path
//! - `raw`: untrusted documents as delivered by the store
//! - `transform`: safe transformation into the internal `model`
//! - `localization` / `dictionary` / `script`: language state, UI strings,
//!   category labels, digits, dates and script detection
//! - `render`: per-block, direction-aware rendering of article bodies
//! - `discovery` / `deferred`: search, category filter, pagination, debounce, reveal
//! - `card` / `reader`: view-models for feed cards and the reading view
//! - `etag`: snapshot tags for the transformed feed
//!
//! Supporting modules: `charset` (payload decoding), `markup` and `security`
//! (content safety), `image` (asset URLs), `reading_time`, `config`, `error`.
//!
//! # Failure Policy
//!
//! Nothing past the transform boundary fails. A missing slug drops that one
//! article, a provider failure yields an empty feed, and an unresolvable
//! image becomes a placeholder.

pub mod card;
pub mod charset;
pub mod config;
pub mod deferred;
pub mod dictionary;
pub mod discovery;
pub mod error;
pub mod etag;
pub mod image;
pub mod localization;
pub mod markup;
pub mod model;
pub mod provider;
pub mod raw;
pub mod reader;
pub mod reading_time;
pub mod render;
pub mod script;
pub mod security;
pub mod transform;

// Re-export main types for convenience
pub use config::SiteConfig;
pub use discovery::{DiscoveryEngine, compute_visible};
pub use error::{ProviderError, TransformError};
pub use localization::{Language, LanguageContext};
pub use model::{Article, Author, ContentBlock};
pub use render::BlockRenderer;
pub use transform::SafeTransformer;
