//! Source parsing seam
//!
//! Article source is turned into a tree by an external parser. The converter
//! only sees the [`SourceParser`] trait: given source text, a parser returns
//! a root node, no root at all, or a [`ParseError`] whose reason ends up in
//! the fallback document.
//!
//! [`HtmlSourceParser`] is the bundled implementation. It runs html5ever over
//! already rendered article HTML and hands back a document whose children are
//! the `<body>` children, since the converter drops every element it has no
//! rule for (`html` and `body` included). Each `<ref>cite</ref>` element is
//! rewritten into an empty `ref` marker, the citation, and a second marker,
//! the sibling pair the converter skips between.
//!
//! # Examples
//!
//! ```rust
//! use gemini_wiki_converter::parser::{HtmlSourceParser, SourceParser};
//!
//! let root = HtmlSourceParser::new()
//!     .parse("<h1>Hello</h1>\n")
//!     .expect("html5ever accepts any input")
//!     .expect("body is always present");
//! assert_eq!(root.children.borrow().len(), 2);
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, RcDom};
use std::borrow::Cow;
use std::mem;
use thiserror::Error;

use crate::charset::detect_charset;
use crate::error::ConversionError;
use crate::tree::{append_children, document, element, is_element};

/// Reason a parser gave up on its input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    /// Wrap a parser's failure reason
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure reason
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Turns raw article source into a document tree
///
/// `source` always ends with a newline; the converter appends one before
/// calling the parser. `Ok(None)` means the parser ran but found nothing
/// renderable.
pub trait SourceParser {
    /// Parse `source` into a tree
    fn parse(&self, source: &str) -> Result<Option<Handle>, ParseError>;
}

impl<F> SourceParser for F
where
    F: Fn(&str) -> Result<Option<Handle>, ParseError>,
{
    fn parse(&self, source: &str) -> Result<Option<Handle>, ParseError> {
        self(source)
    }
}

/// html5ever-backed parser for rendered article HTML
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSourceParser;

impl HtmlSourceParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    /// Parse into a full html5ever DOM, `html`/`head`/`body` wrappers included
    pub fn parse_dom(&self, source: &str) -> RcDom {
        parse_document(RcDom::default(), Default::default()).one(source)
    }
}

impl SourceParser for HtmlSourceParser {
    fn parse(&self, source: &str) -> Result<Option<Handle>, ParseError> {
        let dom = self.parse_dom(source);
        Ok(find_body(&dom.document).map(|body| {
            // Dropping the DOM empties every node still attached to it.
            let root = document(mem::take(&mut *body.children.borrow_mut()));
            pair_citations(&root);
            root
        }))
    }
}

/// Replace every `ref` element by an empty marker, its children, and a
/// closing marker
///
/// Iterative so that deeply nested markup cannot exhaust the stack. Children
/// lifted out of a `ref` are walked like any other node.
fn pair_citations(root: &Handle) {
    let mut pending = vec![root.clone()];

    while let Some(parent) = pending.pop() {
        let children = mem::take(&mut *parent.children.borrow_mut());
        let mut paired = Vec::with_capacity(children.len());

        for child in children {
            if is_element(&child, "ref") {
                paired.push(element("ref", &[], Vec::new()));
                paired.append(&mut *child.children.borrow_mut());
                paired.push(element("ref", &[], Vec::new()));
            } else {
                paired.push(child);
            }
        }

        pending.extend(
            paired
                .iter()
                .filter(|node| !is_element(node, "ref"))
                .cloned(),
        );
        append_children(&parent, paired);
    }
}

fn find_body(root: &Handle) -> Option<Handle> {
    let html = root
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, "html"))
        .cloned()?;

    html.children
        .borrow()
        .iter()
        .find(|child| is_element(child, "body"))
        .cloned()
}

/// Decode fetched bytes into source text
///
/// The charset comes from the Content-Type header when it names one, then
/// from a `<meta>` declaration near the top of the document, and defaults to
/// UTF-8.
///
/// # Errors
///
/// - `ConversionError::InvalidInput`: the input is empty
/// - `ConversionError::Encoding`: the bytes are invalid for the detected
///   charset, or the charset is unsupported
pub fn decode_source<'a>(
    bytes: &'a [u8],
    content_type: Option<&str>,
) -> Result<Cow<'a, str>, ConversionError> {
    if bytes.is_empty() {
        return Err(ConversionError::InvalidInput(
            "source input is empty".to_string(),
        ));
    }

    let charset = detect_charset(content_type, bytes);
    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes())
        .ok_or_else(|| ConversionError::Encoding(format!("Unsupported charset '{charset}'")))?;

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| {
            ConversionError::Encoding(format!("Invalid byte sequence for charset '{charset}'"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::flatten_text;
    use crate::tree::{attribute, tag_name};
    use proptest::prelude::*;
    use std::rc::Rc;

    fn top_level_tags(source: &str) -> Vec<String> {
        let root = HtmlSourceParser::new()
            .parse(source)
            .expect("Parse failed")
            .expect("Missing root");
        let children = root.children.borrow();
        children
            .iter()
            .filter_map(|child| tag_name(child).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_parse_unwraps_body() {
        let tags = top_level_tags("<html><body><h1>Hello</h1><p>Text</p></body></html>\n");
        assert_eq!(tags, vec!["h1", "p"]);
    }

    #[test]
    fn test_parse_fragment_without_wrappers() {
        let tags = top_level_tags("<h2>Title</h2><ul><li>One</li></ul>\n");
        assert_eq!(tags, vec!["h2", "ul"]);
    }

    #[test]
    fn test_parse_keeps_unknown_elements() {
        let tags = top_level_tags("text<span>x</span>more\n");
        assert_eq!(tags, vec!["span"]);
    }

    #[test]
    fn test_parse_keeps_descendants() {
        let root = HtmlSourceParser::new()
            .parse("<h1>Intro</h1><p>See <a href=\"/Wiki\">Wiki</a>.</p>\n")
            .expect("Parse failed")
            .expect("Missing root");
        let children = root.children.borrow();

        assert_eq!(flatten_text(&children[0]), "Intro");
        assert_eq!(flatten_text(&children[1]), "See Wiki.");
        let paragraph = children[1].children.borrow();
        assert_eq!(paragraph.len(), 3);
        assert_eq!(attribute(&paragraph[1], "href").as_deref(), Some("/Wiki"));
    }

    #[test]
    fn test_parse_pairs_citations() {
        let root = HtmlSourceParser::new()
            .parse("<p>Rome<ref>Livy</ref> was founded</p>\n")
            .expect("Parse failed")
            .expect("Missing root");
        let children = root.children.borrow();
        let paragraph = children[0].children.borrow();

        let shape: Vec<String> = paragraph
            .iter()
            .map(|node| match tag_name(node) {
                Some(tag) => format!("<{tag}:{}>", node.children.borrow().len()),
                None => flatten_text(node),
            })
            .collect();
        assert_eq!(shape, vec!["Rome", "<ref:0>", "Livy", "<ref:0>", " was founded"]);
        for node in paragraph.iter() {
            let parent = node.parent.take().and_then(|weak| weak.upgrade());
            assert!(parent.is_some_and(|parent| Rc::ptr_eq(&parent, &children[0])));
        }
    }

    #[test]
    fn test_parse_pairs_each_citation() {
        let tags = top_level_tags("<ref>a</ref>between<ref>b</ref>\n");
        assert_eq!(tags, vec!["ref", "ref", "ref", "ref"]);
    }

    #[test]
    fn test_parse_empty_source_yields_empty_root() {
        let root = HtmlSourceParser::new()
            .parse("\n")
            .expect("Parse failed")
            .expect("Missing root");
        assert!(root.children.borrow().is_empty());
    }

    #[test]
    fn test_closure_parser() {
        let failing = |_: &str| -> Result<Option<Handle>, ParseError> {
            Err(ParseError::new("unexpected token"))
        };
        let err = failing.parse("x\n").expect_err("closure should fail");
        assert_eq!(err.message(), "unexpected token");
        assert_eq!(err.to_string(), "unexpected token");
    }

    #[test]
    fn test_decode_empty_input() {
        match decode_source(b"", None) {
            Err(ConversionError::InvalidInput(_)) => (),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_invalid_utf8() {
        match decode_source(b"\xFF\xFE<p>Invalid</p>", None) {
            Err(ConversionError::Encoding(_)) => (),
            other => panic!("Expected Encoding error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_utf8_is_borrowed() {
        let decoded = decode_source("<p>\u{2713} Check</p>".as_bytes(), None).expect("decode");
        assert!(matches!(decoded, Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_iso_8859_1_from_content_type() {
        let decoded = decode_source(b"<p>Caf\xE9</p>", Some("text/html; charset=ISO-8859-1"))
            .expect("Should transcode ISO-8859-1 input");
        assert_eq!(decoded, "<p>Café</p>");
    }

    #[test]
    fn test_decode_windows_1252_from_meta() {
        let decoded = decode_source(
            b"<meta charset=\"windows-1252\"><p>Price \x80 10</p>",
            None,
        )
        .expect("Should use meta charset");
        assert!(decoded.contains('€'));
    }

    #[test]
    fn test_decode_unknown_charset() {
        match decode_source(b"<p>Hello</p>", Some("text/html; charset=x-unknown-test")) {
            Err(ConversionError::Encoding(message)) => {
                assert!(message.contains("Unsupported charset"));
            }
            other => panic!("Expected Encoding error, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_malformed_html_always_has_root(
            tag in prop::sample::select(vec!["div", "p", "span", "h1", "ul", "li", "table", "ref", "b"]),
            content in "[a-zA-Z0-9 ]{0,100}",
            close_tag in prop::bool::ANY,
        ) {
            let mut html = format!("<{tag}>{content}");
            if close_tag {
                html.push_str(&format!("</{tag}>"));
            }
            html.push('\n');

            let result = HtmlSourceParser::new().parse(&html);
            prop_assert!(matches!(result, Ok(Some(_))), "Parser should accept: {}", html);
        }
    }
}
