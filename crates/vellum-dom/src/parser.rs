//! HTML parsing through the `html5ever` tree builder.
//!
//! The parser builds an `RcDom`, which is then copied into the owned
//! [`Node`] tree that the rest of the pipeline mutates by path.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, ns, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::node::{Element, Namespace, Node};

/// Parse a page or a body fragment.
pub(crate) fn parse_html(html: &str) -> Vec<Node> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    if is_full_document(html) {
        convert_children(&dom.document)
    } else {
        unwrap_implied(&dom.document)
    }
}

/// Parse markup assigned as the content of an element.
pub(crate) fn parse_inner_html(markup: &str) -> Vec<Node> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    unwrap_implied(&dom.document)
}

/// Whether `html` opens with a doctype or `<html>`, ignoring leading
/// whitespace and comments.
fn is_full_document(html: &str) -> bool {
    let mut rest = html.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    while let Some(comment) = rest.strip_prefix("<!--") {
        let Some(end) = comment.find("-->") else {
            return false;
        };
        rest = comment[end + 3..].trim_start();
    }
    starts_with_ignore_case(rest, "<!doctype") || starts_with_ignore_case(rest, "<html")
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Top-level nodes of a fragment: the children of the implied `html`,
/// `head` and `body` elements, in order.
fn unwrap_implied(document: &Handle) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in document.children.borrow().iter() {
        if !is_html_element(child, "html") {
            nodes.extend(convert_node(child));
            continue;
        }
        for section in child.children.borrow().iter() {
            if is_html_element(section, "head") || is_html_element(section, "body") {
                nodes.extend(convert_children(section));
            } else {
                nodes.extend(convert_node(section));
            }
        }
    }
    nodes
}

fn is_html_element(handle: &Handle, tag: &str) -> bool {
    match &handle.data {
        NodeData::Element { name, .. } => name.ns == ns!(html) && &*name.local == tag,
        _ => false,
    }
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let mut element = Element::new(&*name.local);
            element.namespace = namespace_of(name);
            element.attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr_name(&attr.name), String::from(&*attr.value)))
                .collect();
            // Template content lives in a separate fragment.
            element.children = match template_contents.borrow().as_ref() {
                Some(contents) => convert_children(contents),
                None => convert_children(handle),
            };
            Some(element.into())
        }
        NodeData::Text { contents } => Some(Node::Text(String::from(&**contents.borrow()))),
        NodeData::Comment { contents } => Some(Node::Comment(String::from(&**contents))),
        NodeData::Doctype { name, .. } => Some(Node::Doctype(String::from(&**name))),
        NodeData::Document | NodeData::ProcessingInstruction { .. } => None,
    }
}

fn namespace_of(name: &QualName) -> Namespace {
    if name.ns == ns!(svg) {
        Namespace::Svg
    } else if name.ns == ns!(mathml) {
        Namespace::MathMl
    } else {
        Namespace::Html
    }
}

/// Attribute name as written, with the prefix of adjusted foreign attributes.
fn attr_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => String::from(&*name.local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first_element(nodes: &[Node]) -> &Element {
        nodes[0].as_element().unwrap()
    }

    #[test]
    fn test_parse_simple_element() {
        let nodes = parse_html("<p>Hello</p>");
        let p = first_element(&nodes);
        assert_eq!(p.tag, "p");
        assert_eq!(p.children, vec![Node::text("Hello")]);
    }

    #[test]
    fn test_parse_nested_elements_with_tail() {
        let nodes = parse_html("<p><strong>Bold</strong> text</p>");
        let p = first_element(&nodes);
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.children[0].as_element().unwrap().tag, "strong");
        assert_eq!(p.children[1], Node::text(" text"));
    }

    #[test]
    fn test_parse_void_element_without_slash() {
        let nodes = parse_html("<pre>a<br>b</pre>");
        let pre = first_element(&nodes);
        assert_eq!(pre.children.len(), 3);
        assert_eq!(pre.children[1].as_element().unwrap().tag, "br");
        assert_eq!(pre.children[2], Node::text("b"));
    }

    #[test]
    fn test_parse_entities_into_text() {
        let nodes = parse_html("<pre>A--&gt;B &amp; &#39;c&#39;&nbsp;&hellip;</pre>");
        assert_eq!(first_element(&nodes).text_content(), "A-->B & 'c'\u{a0}\u{2026}");
    }

    #[test]
    fn test_parse_bare_ampersand() {
        let nodes = parse_html("<p>Tom & Jerry &unknown;</p>");
        assert_eq!(first_element(&nodes).text_content(), "Tom & Jerry &unknown;");
    }

    #[test]
    fn test_parse_bare_less_than_in_code() {
        let nodes = parse_html("<pre>if a < b:\n    pass</pre><p>after</p>");
        assert_eq!(nodes.len(), 2);
        assert_eq!(first_element(&nodes).text_content(), "if a < b:\n    pass");
        assert_eq!(nodes[1].as_element().unwrap().text_content(), "after");
    }

    #[test]
    fn test_parse_bare_greater_than_in_code() {
        let nodes = parse_html("<pre>A --> B > C</pre>");
        assert_eq!(first_element(&nodes).text_content(), "A --> B > C");
    }

    #[test]
    fn test_parse_paragraph_closed_by_heading() {
        let nodes = parse_html("<div><p>[TOC]<h2>A</h2></div>");
        let div = first_element(&nodes);
        assert_eq!(div.children.len(), 2);
        let p = div.children[0].as_element().unwrap();
        assert_eq!(p.tag, "p");
        assert_eq!(p.text_content(), "[TOC]");
        assert_eq!(div.children[1].as_element().unwrap().tag, "h2");
    }

    #[test]
    fn test_parse_list_items_closed_implicitly() {
        let nodes = parse_html("<ul><li>one<li>two</ul>");
        let ul = first_element(&nodes);
        let items: Vec<String> = ul.children.iter().map(Node::text_content).collect();
        assert_eq!(items, vec!["one", "two"]);
    }

    #[test]
    fn test_parse_unquoted_attributes() {
        let nodes = parse_html("<div class=article-content id=main hidden></div>");
        let div = first_element(&nodes);
        assert_eq!(
            div.attrs,
            vec![
                ("class".to_owned(), "article-content".to_owned()),
                ("id".to_owned(), "main".to_owned()),
                ("hidden".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_rcdata_elements() {
        let nodes = parse_html("<textarea><b>x</b> &amp; y</textarea>");
        let textarea = first_element(&nodes);
        assert_eq!(textarea.children, vec![Node::text("<b>x</b> & y")]);

        let nodes = parse_html("<!DOCTYPE html><html><head><title>a < b</title></head></html>");
        let html = nodes[1].as_element().unwrap();
        let head = html.children[0].as_element().unwrap();
        assert_eq!(head.children[0].as_element().unwrap().text_content(), "a < b");
    }

    #[test]
    fn test_parse_script_body_is_text() {
        let nodes = parse_html("<script>if (a < b && c) {}</script>");
        let script = first_element(&nodes);
        assert_eq!(script.children, vec![Node::text("if (a < b && c) {}")]);
    }

    #[test]
    fn test_parse_stray_end_tag_ignored() {
        let nodes = parse_html("<div>text</span></div>");
        let div = first_element(&nodes);
        assert_eq!(div.children, vec![Node::text("text")]);
    }

    #[test]
    fn test_parse_unclosed_elements_closed_at_end() {
        let nodes = parse_html("<div><p>open");
        let div = first_element(&nodes);
        let p = div.children[0].as_element().unwrap();
        assert_eq!(p.text_content(), "open");
    }

    #[test]
    fn test_parse_document_keeps_doctype_and_comments() {
        let nodes = parse_html("<!DOCTYPE html><!-- note --><html><body><p>x</p></body></html>");
        assert_eq!(nodes[0], Node::Doctype("html".to_owned()));
        assert_eq!(nodes[1], Node::comment(" note "));
        assert_eq!(nodes[2].as_element().unwrap().tag, "html");
    }

    #[test]
    fn test_parse_fragment_has_no_implied_wrappers() {
        let nodes = parse_html("<!-- a --><p>x</p>\n");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Node::comment(" a "));
        assert_eq!(first_element(&nodes[1..]).tag, "p");
        assert_eq!(nodes[2], Node::text("\n"));
    }

    #[test]
    fn test_full_document_detection() {
        assert!(is_full_document("<!doctype html><p>x"));
        assert!(is_full_document("\n  <!-- c --> <HTML lang=en>"));
        assert!(!is_full_document("<div>x</div>"));
        assert!(!is_full_document("<!-- unterminated"));
    }

    #[test]
    fn test_parse_svg_foreign_attributes() {
        let nodes = parse_inner_html(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a"/></svg>"##,
        );
        let svg = first_element(&nodes);
        assert_eq!(svg.namespace, Namespace::Svg);
        assert_eq!(svg.attr("xmlns:xlink"), Some("http://www.w3.org/1999/xlink"));
        let link = svg.children[0].as_element().unwrap();
        assert_eq!(link.attr("xlink:href"), Some("#a"));
    }
}
