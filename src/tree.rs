//! Document tree helpers
//!
//! The converter walks `markup5ever_rcdom` trees. Parser adaptors that do not
//! go through html5ever (a wikitext front end, for instance) build their
//! trees with the constructors below; the same constructors keep the tests
//! readable.
//!
//! ```rust
//! use gemini_wiki_converter::tree::{document, element, text};
//!
//! let root = document(vec![element("p", &[], vec![text("Hello")])]);
//! assert_eq!(root.children.borrow().len(), 1);
//! ```

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};
use std::cell::RefCell;
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub(crate) fn append_children(parent: &Handle, children: Vec<Handle>) {
    for child in &children {
        child.parent.set(Some(Rc::downgrade(parent)));
    }
    parent.children.borrow_mut().extend(children);
}

/// Build a document node owning `children`
pub fn document(children: Vec<Handle>) -> Handle {
    let node = Node::new(NodeData::Document);
    append_children(&node, children);
    node
}

/// Build an element in the HTML namespace
///
/// Attribute names are stored exactly as given; lookups through
/// [`attribute`] are case-sensitive.
pub fn element(tag: &str, attrs: &[(&str, &str)], children: Vec<Handle>) -> Handle {
    let attrs = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(*name)),
            value: StrTendril::from_slice(value),
        })
        .collect();

    let node = Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    });
    append_children(&node, children);
    node
}

/// Build a text node
pub fn text(contents: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(contents)),
    })
}

/// Build a comment node
pub fn comment(contents: &str) -> Handle {
    Node::new(NodeData::Comment {
        contents: StrTendril::from_slice(contents),
    })
}

/// Build a doctype node
pub fn doctype(name: &str) -> Handle {
    Node::new(NodeData::Doctype {
        name: StrTendril::from_slice(name),
        public_id: StrTendril::new(),
        system_id: StrTendril::new(),
    })
}

/// Build a processing instruction node
///
/// The converter has no rendering rule for these; they come out as the
/// `unknown` diagnostic line.
pub fn processing_instruction(target: &str, contents: &str) -> Handle {
    Node::new(NodeData::ProcessingInstruction {
        target: StrTendril::from_slice(target),
        contents: StrTendril::from_slice(contents),
    })
}

/// Local tag name of an element node, `None` for every other kind
pub fn tag_name(node: &Node) -> Option<&str> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Whether `node` is an element named `tag`
pub fn is_element(node: &Node, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

/// Value of the attribute named exactly `name`
pub fn attribute(node: &Node, name: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_attributes_are_case_sensitive() {
        let node = element("a", &[("href", "/Wiki")], vec![]);
        assert_eq!(attribute(&node, "href").as_deref(), Some("/Wiki"));
        assert_eq!(attribute(&node, "HREF"), None);
    }

    #[test]
    fn test_children_keep_order_and_parent() {
        let root = document(vec![text("a"), text("b")]);
        let children = root.children.borrow();
        assert_eq!(children.len(), 2);

        let parent = children[0].parent.take().and_then(|weak| weak.upgrade());
        assert!(parent.is_some_and(|p| Rc::ptr_eq(&p, &root)));
    }

    #[test]
    fn test_tag_name_only_for_elements() {
        assert_eq!(tag_name(&element("li", &[], vec![])), Some("li"));
        assert_eq!(tag_name(&text("li")), None);
        assert_eq!(tag_name(&comment("li")), None);
        assert!(is_element(&element("ref", &[], vec![]), "ref"));
        assert!(!is_element(&doctype("html"), "html"));
    }
}
