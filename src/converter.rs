//! Gemtext converter - renders a document tree as line-oriented text
//!
//! The converter walks the tree in document order and writes gemtext-style
//! lines: `#`/`##`/`###` headings, `* ` bullets, blank-line separated
//! paragraphs and `=> target label` link lines. Links never interrupt prose;
//! their label is written inline and the link line is queued in a
//! [`Footer`] that is drained at the end of each paragraph, before each
//! heading, and once more at the end of the document.
//!
//! # Element Policy
//!
//! Only a handful of tags have a rendering rule:
//!
//! - **`h1`-`h6`**: flush pending links, then a heading line from the
//!   flattened heading text. Levels 4 to 6 share the level 3 marker.
//! - **`p`**: blank-line separated block, followed by its links.
//! - **`li`**: one bullet line; empty and `.` items are dropped.
//! - **`a`**: label inline, link line deferred. Without `href` the anchor is
//!   transparent.
//! - **`b`**: a lone `*` marker. The bold content itself is not rendered.
//! - **`ref`**: everything up to and including the next sibling `ref` is
//!   discarded, which strips citation markers.
//!
//! Every other element is dropped together with its subtree. Tables,
//! infoboxes, images and styling wrappers therefore vanish instead of being
//! half rendered.
//!
//! # Example
//!
//! Input HTML:
//! ```html
//! <h1>Intro</h1>
//! <p>See <a href="/Wiki">Wiki</a>.</p>
//! ```
//!
//! Output:
//! ```text
//!
//! # Intro
//!
//!
//! See Wiki.
//!
//! => /Wiki Wiki
//!
//! ```

use markup5ever_rcdom::{Handle, NodeData};
use tracing::{debug, trace, warn};

use crate::error::ConversionError;
use crate::footer::Footer;
use crate::parser::SourceParser;
use crate::text::{flatten_text, push_without_newlines};
use crate::tree::{attribute, is_element};

/// Deepest element nesting rendered by default
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Marker written for the deepest heading levels
const MAX_HEADING_MARKER: usize = 3;

/// Diagnostic line for node kinds without a rendering rule
const UNKNOWN_NODE_LINE: &str = "unknown\n";

/// Conversion options
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Elements nested deeper than this are dropped with their subtree
    pub max_depth: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Renders article trees as gemtext
///
/// The converter holds configuration only. Every call allocates its own
/// output and footer buffers, so one converter can serve concurrent requests.
///
/// # Usage
///
/// ```rust
/// use gemini_wiki_converter::converter::GemtextConverter;
/// use gemini_wiki_converter::parser::HtmlSourceParser;
///
/// let converter = GemtextConverter::new();
/// let gemtext = converter.convert(
///     &HtmlSourceParser::new(),
///     "<h2>History</h2><p>Founded by <a href=\"/Romulus\">Romulus</a>.</p>",
/// );
/// assert!(gemtext.contains("## History\n"));
/// assert!(gemtext.contains("Founded by Romulus."));
/// assert!(gemtext.contains("=> /Romulus Romulus\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GemtextConverter {
    options: ConversionOptions,
}

impl GemtextConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom options
    pub fn with_options(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Parse and render article source, falling back to a diagnostic text
    ///
    /// Never fails: a parser error yields `could not parse: <reason>` and a
    /// parser that finds nothing yields `Could not render page`. Both are
    /// served to clients like any other document.
    pub fn convert<P>(&self, parser: &P, source: &str) -> String
    where
        P: SourceParser + ?Sized,
    {
        self.try_convert(parser, source).unwrap_or_else(|err| {
            warn!(error = %err, "article conversion fell back to diagnostic text");
            err.to_string()
        })
    }

    /// Parse and render article source
    ///
    /// The parser receives the source with a trailing newline appended.
    ///
    /// # Errors
    ///
    /// - `ConversionError::Parse` when the parser rejects the source
    /// - `ConversionError::NoRenderableRoot` when it returns no tree
    pub fn try_convert<P>(&self, parser: &P, source: &str) -> Result<String, ConversionError>
    where
        P: SourceParser + ?Sized,
    {
        let mut input = String::with_capacity(source.len() + 1);
        input.push_str(source);
        input.push('\n');

        let root = parser
            .parse(&input)?
            .ok_or(ConversionError::NoRenderableRoot)?;
        Ok(self.convert_dom(&root))
    }

    /// Render an already parsed tree
    ///
    /// Returns the body followed by the final footer flush, which always adds
    /// at least one trailing blank line.
    pub fn convert_dom(&self, root: &Handle) -> String {
        let mut output = String::new();
        let mut footer = Footer::new();

        self.render(std::slice::from_ref(root), &mut output, &mut footer, 0);
        output.push_str(&footer.flush());
        output
    }

    /// Render a sibling chain
    ///
    /// `chain` is consumed left to right; `ref` handling may skip ahead or end
    /// the chain early. Children are rendered through recursive calls on the
    /// child slice.
    fn render(&self, chain: &[Handle], output: &mut String, footer: &mut Footer, depth: usize) {
        let mut index = 0;

        while let Some(node) = chain.get(index) {
            match node.data {
                NodeData::Document => {
                    self.render(&node.children.borrow(), output, footer, depth);
                }
                NodeData::Text { ref contents } => {
                    push_without_newlines(output, &contents.borrow());
                }
                NodeData::Comment { .. } | NodeData::Doctype { .. } => {}
                NodeData::Element { ref name, .. } if name.local.as_ref() == "ref" => {
                    match closing_ref(chain, index) {
                        Some(close) => index = close,
                        None => return,
                    }
                }
                NodeData::Element { ref name, .. } => {
                    self.handle_element(node, name.local.as_ref(), output, footer, depth);
                }
                NodeData::ProcessingInstruction { .. } => {
                    output.push_str(UNKNOWN_NODE_LINE);
                }
            }
            index += 1;
        }
    }

    fn handle_element(
        &self,
        node: &Handle,
        tag_name: &str,
        output: &mut String,
        footer: &mut Footer,
        depth: usize,
    ) {
        if depth >= self.options.max_depth {
            debug!(tag = tag_name, depth, "nesting limit reached, dropping subtree");
            return;
        }

        match tag_name {
            "h1" => self.handle_heading(node, 1, output, footer),
            "h2" => self.handle_heading(node, 2, output, footer),
            "h3" => self.handle_heading(node, 3, output, footer),
            "h4" => self.handle_heading(node, 4, output, footer),
            "h5" => self.handle_heading(node, 5, output, footer),
            "h6" => self.handle_heading(node, 6, output, footer),
            "li" => self.handle_list_item(node, output, footer, depth),
            "p" => self.handle_paragraph(node, output, footer, depth),
            "a" => self.handle_link(node, output, footer, depth),
            "b" => output.push('*'),
            _ => trace!(tag = tag_name, "dropping element without rendering rule"),
        }
    }

    /// Heading line; pending links are flushed above it
    fn handle_heading(&self, node: &Handle, level: usize, output: &mut String, footer: &mut Footer) {
        output.push_str(&footer.flush());

        for _ in 0..level.min(MAX_HEADING_MARKER) {
            output.push('#');
        }
        output.push(' ');
        output.push_str(&flatten_text(node));
        output.push('\n');
    }

    /// Bullet line
    ///
    /// The item shares the caller's footer: links inside list items are
    /// emitted at the next paragraph end or heading, not after the item.
    fn handle_list_item(&self, node: &Handle, output: &mut String, footer: &mut Footer, depth: usize) {
        let mut item = String::new();
        self.render(&node.children.borrow(), &mut item, footer, depth + 1);

        let item = item.trim();
        if !item.is_empty() && item != "." {
            output.push_str("* ");
            output.push_str(item);
            output.push('\n');
        }
    }

    fn handle_paragraph(&self, node: &Handle, output: &mut String, footer: &mut Footer, depth: usize) {
        let children = node.children.borrow();
        let renders = match children.first() {
            None => false,
            Some(first) => !matches!(
                first.data,
                NodeData::Text { ref contents } if contents.borrow().is_empty()
            ),
        };
        if !renders {
            return;
        }

        output.push_str("\n\n");
        self.render(&children, output, footer, depth + 1);
        output.push('\n');
        output.push_str(&footer.flush());
    }

    fn handle_link(&self, node: &Handle, output: &mut String, footer: &mut Footer, depth: usize) {
        match attribute(node, "href").filter(|href| !href.is_empty()) {
            Some(href) => {
                let label = flatten_text(node);
                output.push_str(&label);
                footer.add_link(label, href);
            }
            None => self.render(&node.children.borrow(), output, footer, depth + 1),
        }
    }
}

/// Index of the next `ref` element after `open`, if any
fn closing_ref(chain: &[Handle], open: usize) -> Option<usize> {
    chain
        .iter()
        .enumerate()
        .skip(open + 1)
        .find(|(_, node)| is_element(node, "ref"))
        .map(|(index, _)| index)
}
