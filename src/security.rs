//! Security validation for untrusted content fields
//!
//! Raw documents come from an external content store and are treated as
//! untrusted. This module decides which embedded markup elements are dropped
//! and which URLs may be carried into the safe model.
//!
//! # Threat Model
//!
//! Text fields and URLs written by editors (or injected upstream) may contain:
//! - Markup with `<script>` or `<iframe>` elements
//! - `javascript:` or `data:` URLs in links, images or social profiles
//! - Local or browser-internal URLs (`file:`, `about:`)
//!
//! # Defense Layers
//!
//! 1. **Element Sanitization**: Subtrees of dangerous elements are dropped when
//!    markup is reduced to text (see [`crate::markup`])
//! 2. **URL Sanitization**: Dangerous schemes are rejected everywhere a URL is kept
//! 3. **Image Sources**: Direct image URLs must additionally be `http(s)`

/// Elements whose whole subtree is dropped when stripping markup
const DANGEROUS_ELEMENTS: &[&str] = &[
    "script",   // JavaScript execution
    "style",    // CSS injection
    "noscript", // Alternative content
    "iframe",   // Can load external content
    "object",   // Can execute plugins
    "embed",    // Can execute plugins
    "applet",   // Legacy Java applets
    "link",     // External stylesheets
    "base",     // Changes base URL for relative URLs
    "template", // Inert content never shown to readers
];

/// Dangerous URL schemes that should be blocked
const DANGEROUS_URL_SCHEMES: &[&str] = &[
    "javascript:", // JavaScript execution
    "data:",       // Can contain executable content
    "vbscript:",   // VBScript execution (legacy IE)
    "file:",       // Local file access
    "about:",      // Browser internal URLs
];

/// Action to take when an element is met while stripping markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeAction {
    /// Keep the element's text
    Allow,
    /// Drop the element and all its children
    Remove,
}

/// Security validator for untrusted fields
#[derive(Debug, Default, Clone, Copy)]
pub struct SecurityValidator;

impl SecurityValidator {
    /// Create a new security validator
    pub fn new() -> Self {
        Self
    }

    /// Check if an element should be dropped
    ///
    /// # Examples
    ///
    /// ```
    /// use lonko_content::security::{SecurityValidator, SanitizeAction};
    ///
    /// let validator = SecurityValidator::new();
    /// assert_eq!(validator.check_element("script"), SanitizeAction::Remove);
    /// assert_eq!(validator.check_element("em"), SanitizeAction::Allow);
    /// ```
    pub fn check_element(&self, tag_name: &str) -> SanitizeAction {
        if DANGEROUS_ELEMENTS.contains(&tag_name) {
            SanitizeAction::Remove
        } else {
            SanitizeAction::Allow
        }
    }

    /// Check if a URL uses a dangerous scheme
    ///
    /// The URL is first read the way a browser's URL parser reads it: leading
    /// C0 controls and spaces are dropped, ASCII tab and newline characters are
    /// removed wherever they occur, and case is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use lonko_content::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert!(validator.is_dangerous_url("javascript:alert('xss')"));
    /// assert!(validator.is_dangerous_url("  DATA:text/html,<b>x</b>"));
    /// assert!(validator.is_dangerous_url("java\tscript:alert(1)"));
    /// assert!(!validator.is_dangerous_url("https://nkonilonko.com"));
    /// assert!(!validator.is_dangerous_url("/article/mars"));
    /// ```
    pub fn is_dangerous_url(&self, url: &str) -> bool {
        let url_lower = normalize_for_scheme(url);
        DANGEROUS_URL_SCHEMES
            .iter()
            .any(|scheme| url_lower.starts_with(scheme))
    }

    /// Sanitize a link URL
    ///
    /// Returns `None` if the URL is empty or dangerous, the trimmed URL otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use lonko_content::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert_eq!(validator.sanitize_url("javascript:alert('xss')"), None);
    /// assert_eq!(validator.sanitize_url(" https://x.com/lonko "), Some("https://x.com/lonko"));
    /// ```
    pub fn sanitize_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let trimmed = url.trim();
        if trimmed.is_empty() || self.is_dangerous_url(trimmed) {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Sanitize a direct image URL
    ///
    /// Image sources given as plain strings are only kept when they are
    /// absolute `http` or `https` URLs.
    ///
    /// # Examples
    ///
    /// ```
    /// use lonko_content::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert_eq!(
    ///     validator.sanitize_image_url("https://cdn.example.com/a.jpg"),
    ///     Some("https://cdn.example.com/a.jpg")
    /// );
    /// assert_eq!(validator.sanitize_image_url("/local/a.jpg"), None);
    /// ```
    pub fn sanitize_image_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let url = self.sanitize_url(url)?;
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(url)
        } else {
            None
        }
    }
}

/// Lowercased URL with leading C0 controls, spaces and all tab/newline characters removed
fn normalize_for_scheme(url: &str) -> String {
    url.trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .to_lowercase()
}
