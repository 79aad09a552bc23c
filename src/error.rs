//! Error types for conversion operations

use thiserror::Error;

use crate::parser::ParseError;

/// Errors that can occur while turning article source into gemtext
///
/// None of these escape [`GemtextConverter::convert`](crate::GemtextConverter::convert):
/// their display strings double as the fallback documents sent to clients.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The source parser rejected the input
    #[error("could not parse: {0}")]
    Parse(#[from] ParseError),
    /// The parser succeeded but produced no tree to render
    #[error("Could not render page")]
    NoRenderableRoot,
    /// Character encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_message() {
        let err = ConversionError::from(ParseError::new("unexpected token"));
        assert_eq!(err.to_string(), "could not parse: unexpected token");
    }

    #[test]
    fn test_no_root_message() {
        assert_eq!(
            ConversionError::NoRenderableRoot.to_string(),
            "Could not render page"
        );
    }
}
