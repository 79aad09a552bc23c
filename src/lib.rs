//! Gemini Wiki Converter
//!
//! Renders encyclopedia articles as gemtext: headings, bullet lines,
//! paragraphs with inline link labels, and link lines collected below each
//! paragraph.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `converter`: tree walk and per-tag rendering policy
//! - `footer`: deferred link lines
//! - `text`: flattened text for headings and link labels
//! - `parser`: the `SourceParser` seam and the html5ever-backed parser
//! - `charset`: charset detection for fetched bytes
//! - `tree`: constructors and accessors for document trees
//! - `gateway`: article, search, home and robots pages over a cached
//!   per-language client
//!
//! # Example
//!
//! ```rust
//! use gemini_wiki_converter::{GemtextConverter, HtmlSourceParser};
//!
//! let gemtext = GemtextConverter::new().convert(
//!     &HtmlSourceParser::new(),
//!     "<h1>Intro</h1><p>See <a href=\"/Wiki\">Wiki</a>.</p>",
//! );
//! assert_eq!(gemtext, "\n# Intro\n\n\nSee Wiki.\n\n=> /Wiki Wiki\n\n");
//! ```

pub mod charset;
pub mod converter;
pub mod error;
pub mod footer;
pub mod gateway;
pub mod parser;
pub mod text;
pub mod tree;

pub use converter::{ConversionOptions, GemtextConverter};
pub use error::ConversionError;
pub use footer::Footer;
pub use parser::{HtmlSourceParser, ParseError, SourceParser};
pub use text::flatten_text;
