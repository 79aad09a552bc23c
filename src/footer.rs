//! Deferred link lines
//!
//! Links found in body text are written inline as plain words and queued
//! here. The converter drains the queue at paragraph ends, before headings
//! and once more at the end of the document, turning each pending pair into
//! a gemtext link line:
//!
//! ```text
//! => /Rome_%28city%29 Rome
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left literal in a link target: unreserved characters plus the
/// sub-delimiters a URI path may carry. Everything else, non-ASCII included,
/// is percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Link line marker
const LINK_MARKER: &str = "=>";

/// Queue of `(display text, target)` pairs awaiting emission
#[derive(Debug, Default, Clone)]
pub struct Footer {
    links: Vec<(String, String)>,
}

impl Footer {
    /// Create an empty footer
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a link; duplicates are kept and each gets its own line
    pub fn add_link(&mut self, text: impl Into<String>, target: impl Into<String>) {
        self.links.push((text.into(), target.into()));
    }

    /// Render pending links and clear the queue
    ///
    /// The block always starts with one blank line, so flushing an empty
    /// footer yields `"\n"`.
    pub fn flush(&mut self) -> String {
        let mut block = String::from("\n");
        for (text, target) in self.links.drain(..) {
            block.push_str(LINK_MARKER);
            block.push(' ');
            block.push_str(&escape_target(&target));
            block.push(' ');
            block.push_str(&text);
            block.push('\n');
        }
        block
    }

    /// Drop pending links without rendering them
    pub fn reset(&mut self) {
        self.links.clear();
    }

    /// Number of pending links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no links are pending
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Percent-encode a link target as a URI path
pub fn escape_target(target: &str) -> String {
    utf8_percent_encode(target, PATH_SEGMENT).to_string()
}
