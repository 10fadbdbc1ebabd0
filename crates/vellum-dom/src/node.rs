//! Tree node representation for article HTML.

use crate::parser::{parse_html, parse_inner_html};
use crate::serializer::serialize_nodes;

/// Node in a parsed HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with tag, attributes and children.
    Element(Element),
    /// Text content (unescaped).
    Text(String),
    /// Comment body, without the `<!--`/`-->` delimiters.
    Comment(String),
    /// Document type name (`html` for `<!DOCTYPE html>`).
    Doctype(String),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a comment node.
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    /// Element view of this node.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable element view of this node.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Text of a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants (`textContent`).
    ///
    /// Comments and doctypes do not contribute.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Self::Text(text) => out.push_str(text),
            Self::Comment(_) | Self::Doctype(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// Namespace an element was parsed into.
///
/// Inline `<svg>` and `<math>` subtrees keep their namespace so that they
/// serialize with foreign-content rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

/// HTML element.
///
/// Attributes keep their source order so that untouched elements serialize
/// back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercase for HTML elements.
    pub tag: String,
    /// Element namespace.
    pub namespace: Namespace,
    /// Attributes in source order. Foreign attributes keep their prefix
    /// (`xlink:href`).
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new HTML element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set the `class` attribute.
    #[must_use]
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Whether this element has the given tag name.
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, overwriting any existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    /// Element `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whether the class list contains `class` as a whole token.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Whether the raw `class` attribute contains `needle` anywhere
    /// (CSS `[class*="..."]`).
    #[must_use]
    pub fn class_contains(&self, needle: &str) -> bool {
        self.attr("class").is_some_and(|classes| classes.contains(needle))
    }

    /// Heading rank for `h1`..`h6`.
    #[must_use]
    pub fn heading_rank(&self) -> Option<u8> {
        if self.namespace != Namespace::Html {
            return None;
        }
        match self.tag.as_bytes() {
            [b'h' | b'H', digit @ b'1'..=b'6'] => Some(digit - b'0'),
            _ => None,
        }
    }

    /// Concatenated descendant text (`textContent`).
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Serialized children (`innerHTML`).
    #[must_use]
    pub fn inner_html(&self) -> String {
        serialize_nodes(&self.children)
    }

    /// Replace all children with a single text node (`textContent = ...`).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Replace all children with parsed `markup` (`innerHTML = ...`).
    pub fn set_inner_html(&mut self, markup: &str) {
        self.children = parse_inner_html(markup);
    }
}

/// Parsed HTML document or fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level nodes.
    pub children: Vec<Node>,
}

impl Document {
    /// Parse HTML into a document.
    ///
    /// Parsing follows the HTML5 tree construction rules and never fails.
    /// Input that starts with a doctype or `<html>` is kept as a full
    /// document; anything else is treated as a body fragment and comes back
    /// without the `html`, `head` and `body` wrappers the parser implies.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            children: parse_html(html),
        }
    }

    /// Serialize the document back to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        serialize_nodes(&self.children)
    }

    /// Concatenated text of all nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}
