//! Supported article languages

use std::fmt;

use super::GatewayError;

/// Languages served when no explicit list is configured
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "en", "ar", "de", "es", "fr", "it", "nl", "ja", "pl", "pt", "ru", "sv", "uk", "vi", "zh",
    "id", "ms", "bg", "ca", "cs", "da", "eo", "eu", "fa", "he", "ko", "hu", "no", "ro", "sr",
    "sh", "fi", "tr", "ast", "bs", "et", "el", "simple", "gl", "hr", "lv", "lt", "ml", "nn", "sk",
    "sl", "th",
];

/// A validated language code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    /// Validate `code` against `supported`
    ///
    /// Matching is exact; codes are lower-case in every upstream URL.
    pub fn parse<S: AsRef<str>>(code: &str, supported: &[S]) -> Result<Self, GatewayError> {
        if supported.iter().any(|lang| lang.as_ref() == code) {
            Ok(Self(code.to_string()))
        } else {
            Err(GatewayError::UnsupportedLanguage(code.to_string()))
        }
    }

    /// The language code
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Human-facing article URL on this language's wiki
    pub fn article_url(&self, path: &str) -> String {
        format!("https://{}.wikipedia.org/wiki/{}", self.0, path)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported() {
        let lang = Language::parse("de", DEFAULT_LANGUAGES).expect("de is supported");
        assert_eq!(lang.code(), "de");
        assert_eq!(lang.article_url("Rom"), "https://de.wikipedia.org/wiki/Rom");
        assert_eq!(lang.to_string(), "de");
    }

    #[test]
    fn test_parse_longer_codes() {
        assert!(Language::parse("simple", DEFAULT_LANGUAGES).is_ok());
        assert!(Language::parse("ast", DEFAULT_LANGUAGES).is_ok());
    }

    #[test]
    fn test_parse_rejects_unknown_and_case_variants() {
        for code in ["xx", "EN", "", "en/", "english"] {
            match Language::parse(code, DEFAULT_LANGUAGES) {
                Err(GatewayError::UnsupportedLanguage(got)) => assert_eq!(got, code),
                other => panic!("Expected UnsupportedLanguage for {code:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_default_list_has_no_duplicates() {
        let mut codes = DEFAULT_LANGUAGES.to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), DEFAULT_LANGUAGES.len());
    }
}
