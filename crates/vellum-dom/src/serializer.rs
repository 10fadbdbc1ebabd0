//! HTML serialization through the `html5ever` serializer.
//!
//! Output follows the HTML fragment serialization algorithm, the same rules
//! browsers use for `innerHTML`.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::{LocalName, QualName, ns};

use crate::node::{Element, Namespace, Node};

/// Node list adapter for the `html5ever` serializer.
struct Nodes<'a>(&'a [Node]);

impl Serialize for Nodes<'_> {
    fn serialize<S>(&self, serializer: &mut S, _traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        self.0.iter().try_for_each(|node| write_node(node, serializer))
    }
}

fn write_node<S: Serializer>(node: &Node, serializer: &mut S) -> io::Result<()> {
    match node {
        Node::Element(el) => write_element(el, serializer),
        Node::Text(text) => serializer.write_text(text),
        Node::Comment(text) => serializer.write_comment(text),
        Node::Doctype(name) => serializer.write_doctype(name),
    }
}

fn write_element<S: Serializer>(el: &Element, serializer: &mut S) -> io::Result<()> {
    let name = element_name(el);
    let attrs: Vec<(QualName, &str)> = el
        .attrs
        .iter()
        .map(|(key, value)| (attr_qual_name(key), value.as_str()))
        .collect();

    serializer.start_elem(name.clone(), attrs.iter().map(|(key, value)| (key, *value)))?;
    for child in &el.children {
        write_node(child, serializer)?;
    }
    serializer.end_elem(name)
}

fn element_name(el: &Element) -> QualName {
    let ns = match el.namespace {
        Namespace::Html => ns!(html),
        Namespace::Svg => ns!(svg),
        Namespace::MathMl => ns!(mathml),
    };
    QualName::new(None, ns, LocalName::from(el.tag.as_str()))
}

/// Attribute name back to the qualified form the serializer expects.
fn attr_qual_name(name: &str) -> QualName {
    let (ns, local) = match name.split_once(':') {
        Some(("xlink", local)) => (ns!(xlink), local),
        Some(("xml", local)) => (ns!(xml), local),
        Some(("xmlns", local)) => (ns!(xmlns), local),
        _ if name == "xmlns" => (ns!(xmlns), name),
        _ => (ns!(), name),
    };
    QualName::new(None, ns, LocalName::from(local))
}

/// Serialize a node list to HTML.
pub(crate) fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = Vec::with_capacity(4096);
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..SerializeOpts::default()
    };
    // Writes go to memory and cannot fail.
    let _ = serialize(&mut out, &Nodes(nodes), opts);
    String::from_utf8_lossy(&out).into_owned()
}

/// Escape text content the way `innerHTML` does.
///
/// `&`, `<`, `>` and U+00A0 are escaped; quotes are left alone.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_simple_element() {
        let nodes = vec![Element::new("p").with_text("Hello").into()];
        assert_eq!(serialize_nodes(&nodes), "<p>Hello</p>");
    }

    #[test]
    fn test_serialize_escapes_text() {
        let nodes = vec![Element::new("pre").with_text("A-->B & \"c\"\u{a0}").into()];
        assert_eq!(
            serialize_nodes(&nodes),
            "<pre>A--&gt;B &amp; \"c\"&nbsp;</pre>"
        );
    }

    #[test]
    fn test_serialize_escapes_attr() {
        let el = Element::new("button").with_attr("onclick", r#"f("a") && g()"#);
        assert_eq!(
            serialize_nodes(&[el.into()]),
            r#"<button onclick="f(&quot;a&quot;) &amp;&amp; g()"></button>"#
        );
    }

    #[test]
    fn test_serialize_void_element() {
        let el = Element::new("p")
            .with_text("a")
            .with_child(Element::new("br"))
            .with_text("b");
        assert_eq!(serialize_nodes(&[el.into()]), "<p>a<br>b</p>");
    }

    #[test]
    fn test_serialize_script_text_unescaped() {
        let el = Element::new("script").with_text("if (a < b && c) {}");
        assert_eq!(
            serialize_nodes(&[el.into()]),
            "<script>if (a < b && c) {}</script>"
        );
    }

    #[test]
    fn test_serialize_comment_and_doctype() {
        let nodes = vec![Node::Doctype("html".to_owned()), Node::comment(" c ")];
        assert_eq!(serialize_nodes(&nodes), "<!DOCTYPE html><!-- c -->");
    }

    #[test]
    fn test_escape_text_matches_serializer() {
        let text = "a < b && c > d\u{a0}";
        let nodes = vec![Node::text(text)];
        assert_eq!(serialize_nodes(&nodes), escape_text(text));
    }

    #[test]
    fn test_round_trip_preserves_markup() {
        let html = concat!(
            "<!DOCTYPE html><html><head><script>if (a < b) {}</script></head>",
            "<body><div class=\"article-content\"><p>Tom &amp; Jerry&nbsp;</p>",
            "<pre>x<br>y</pre><svg viewBox=\"0 0 10 10\"><path d=\"M0 0\"></path></svg>",
            "</div></body></html>"
        );
        let doc = Document::parse(html);
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_bare_less_than_round_trips_escaped() {
        let doc = Document::parse("<pre>if a < b:\n    pass</pre><p>after</p>");
        assert_eq!(
            doc.to_html(),
            "<pre>if a &lt; b:\n    pass</pre><p>after</p>"
        );
    }
}
