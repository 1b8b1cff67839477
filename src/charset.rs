//! Character encoding detection and decoding for provider payloads
//!
//! # Detection Cascade
//!
//! 1. **Content-Type Header**: `charset` parameter of the response Content-Type
//! 2. **Byte-Order Mark**: UTF-8 / UTF-16LE / UTF-16BE BOM at the start of the payload
//! 3. **Default to UTF-8**: JSON payloads are UTF-8 unless told otherwise
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::charset::{decode_payload, detect_charset};
//!
//! assert_eq!(detect_charset(Some("application/json; charset=ISO-8859-1"), b"[]"), "ISO-8859-1");
//! assert_eq!(detect_charset(None, b"[]"), "UTF-8");
//!
//! let text = decode_payload(b"[\"caf\xE9\"]", Some("application/json; charset=latin1")).unwrap();
//! assert_eq!(text, "[\"café\"]");
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::error::ProviderError;

/// Default charset when detection fails
const DEFAULT_CHARSET: &str = "UTF-8";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Detect character encoding using the three-level cascade
///
/// Always returns a charset name, normalized to uppercase.
pub fn detect_charset(content_type: Option<&str>, payload: &[u8]) -> String {
    if let Some(ct) = content_type
        && let Some(charset) = extract_charset_from_content_type(ct)
    {
        return normalize_charset(&charset);
    }

    if let Some(charset) = charset_from_bom(payload) {
        return charset.to_string();
    }

    DEFAULT_CHARSET.to_string()
}

/// Extract charset from a Content-Type header
///
/// # Examples
///
/// ```rust
/// use lonko_content::charset::extract_charset_from_content_type;
///
/// assert_eq!(
///     extract_charset_from_content_type("application/json; charset=\"UTF-8\""),
///     Some("UTF-8".to_string())
/// );
/// assert_eq!(extract_charset_from_content_type("application/json"), None);
/// ```
pub fn extract_charset_from_content_type(content_type: &str) -> Option<String> {
    static CHARSET_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex =
        CHARSET_REGEX.get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok());
    let regex = regex.as_ref()?;

    regex
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn charset_from_bom(payload: &[u8]) -> Option<&'static str> {
    if payload.starts_with(UTF8_BOM) {
        Some("UTF-8")
    } else if payload.starts_with(UTF16LE_BOM) {
        Some("UTF-16LE")
    } else if payload.starts_with(UTF16BE_BOM) {
        Some("UTF-16BE")
    } else {
        None
    }
}

/// Normalize charset name to uppercase
pub fn normalize_charset(charset: &str) -> String {
    charset.to_uppercase()
}

/// Decode payload bytes to UTF-8 text using the detected charset
///
/// A byte-order mark matching the charset is stripped. Invalid byte
/// sequences are an error rather than being replaced.
pub fn decode_payload<'a>(
    payload: &'a [u8],
    content_type: Option<&str>,
) -> Result<Cow<'a, str>, ProviderError> {
    let detected_charset = detect_charset(content_type, payload);

    if detected_charset.eq_ignore_ascii_case("UTF-8") {
        let body = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
        return std::str::from_utf8(body).map(Cow::Borrowed).map_err(|e| {
            ProviderError::Encoding(format!(
                "Invalid UTF-8 at byte position {}: {} (detected charset: {})",
                e.valid_up_to(),
                e,
                detected_charset
            ))
        });
    }

    let encoding = encoding_rs::Encoding::for_label(detected_charset.as_bytes()).ok_or_else(|| {
        ProviderError::Encoding(format!("Unsupported charset '{}'", detected_charset))
    })?;

    let body = match charset_from_bom(payload) {
        Some(bom_charset) if bom_charset.eq_ignore_ascii_case(encoding.name()) => {
            let bom_len = if bom_charset == "UTF-8" { 3 } else { 2 };
            &payload[bom_len..]
        }
        _ => payload,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            ProviderError::Encoding(format!(
                "Invalid byte sequence for charset '{}'",
                detected_charset
            ))
        })
}
