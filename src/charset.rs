//! Charset detection for fetched article bytes
//!
//! Upstream responses usually announce UTF-8, but mirrors and saved pages do
//! not always. The charset is picked from, in order:
//!
//! 1. the `charset` parameter of the Content-Type header,
//! 2. a `<meta charset>` or `<meta http-equiv="Content-Type">` declaration
//!    in the first kilobyte of the document,
//! 3. UTF-8.
//!
//! ```rust
//! use gemini_wiki_converter::charset::detect_charset;
//!
//! assert_eq!(detect_charset(Some("text/html; charset=iso-8859-1"), b""), "ISO-8859-1");
//! assert_eq!(detect_charset(None, b"<meta charset=\"koi8-r\">"), "KOI8-R");
//! assert_eq!(detect_charset(None, b"<p>plain</p>"), "UTF-8");
//! ```

use regex::Regex;
use std::sync::OnceLock;

const DEFAULT_CHARSET: &str = "UTF-8";

/// Only the head of a document is scanned for meta declarations
const META_SCAN_LIMIT: usize = 1024;

/// Detect the charset of `bytes`, upper-cased
pub fn detect_charset(content_type: Option<&str>, bytes: &[u8]) -> String {
    content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(bytes))
        .map(|charset| charset.to_uppercase())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    static PARAM: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = PARAM
        .get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok())
        .as_ref()?;

    regex
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn charset_from_meta(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SCAN_LIMIT)]);

    static META_CHARSET: OnceLock<Option<Regex>> = OnceLock::new();
    static META_HTTP_EQUIV: OnceLock<Option<Regex>> = OnceLock::new();

    let patterns = [
        META_CHARSET.get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*"?([^";>\s]+)"?"#).ok()),
        META_HTTP_EQUIV.get_or_init(|| {
            Regex::new(
                r#"(?i)<meta\s+http-equiv\s*=\s*"?Content-Type"?\s+content\s*=\s*"?[^">]*charset\s*=\s*([^";>\s]+)"?"#,
            )
            .ok()
        }),
    ];

    patterns.into_iter().flatten().find_map(|regex| {
        regex
            .captures(&head)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}
