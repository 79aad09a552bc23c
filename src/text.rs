//! Flattened text extraction
//!
//! Concatenates the text of every descendant of a node, ignoring tag
//! identity and attributes entirely. Used for heading titles and link labels,
//! never for body rendering: no emphasis markers, no link registration and no
//! `ref` skipping happen here.

use markup5ever_rcdom::{Handle, NodeData};

/// Append the flattened text of `node` to `output`
///
/// Newlines inside text nodes are removed outright, not replaced with a
/// space, matching how body text is rendered.
pub fn extract_text(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => {
            push_without_newlines(output, &contents.borrow());
        }
        NodeData::Element { .. } => {
            for child in node.children.borrow().iter() {
                extract_text(child, output);
            }
        }
        _ => {}
    }
}

/// Flattened text of `node` as a new string
pub fn flatten_text(node: &Handle) -> String {
    let mut output = String::new();
    extract_text(node, &mut output);
    output
}

pub(crate) fn push_without_newlines(output: &mut String, text: &str) {
    output.extend(text.chars().filter(|&c| c != '\n'));
}
