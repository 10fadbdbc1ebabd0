//! Preformatted block classification and rendering.
//!
//! Every `pre` inside an article region is decoded and classified:
//! - diagram notation is replaced with a diagram container whose placeholder
//!   is rendered later, once all blocks have been classified
//! - blocks that already hold a `language-*` code element are left alone
//! - anything else becomes `<pre><code class="language-<default>">` and is
//!   highlighted immediately

use vellum_diagrams::{MermaidGrammar, decode_block, diagram_container};
use vellum_dom::{Document, Element, Node, NodePath, Walk};

use crate::highlight::CodeHighlighter;

/// How a preformatted block is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Diagram notation in the given grammar.
    Diagram(MermaidGrammar),
    /// Source code to highlight.
    Code,
    /// Already carries a `language-*` code element.
    Formatted,
}

/// Preformatted block read from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    /// Inner markup as found in the document.
    pub markup: String,
    /// Decoded plain text.
    pub text: String,
    /// Classification.
    pub kind: BlockKind,
}

impl ContentBlock {
    /// Read and classify a `pre` element.
    #[must_use]
    pub fn read(pre: &Element) -> Self {
        let markup = pre.inner_html();
        let text = decode_block(&markup);
        let kind = if let Some(grammar) = MermaidGrammar::detect(&text) {
            BlockKind::Diagram(grammar)
        } else if has_language_code(pre) {
            BlockKind::Formatted
        } else {
            BlockKind::Code
        };
        Self { markup, text, kind }
    }
}

/// Counts from a block pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockSummary {
    /// Blocks replaced with diagram containers.
    pub diagrams: usize,
    /// Blocks wrapped in a code element and highlighted.
    pub highlighted: usize,
    /// Blocks left untouched.
    pub formatted: usize,
}

/// Whether any descendant `code` element has a `language-*` class.
fn has_language_code(el: &Element) -> bool {
    el.children.iter().any(|child| match child {
        Node::Element(child) => {
            (child.is("code") && child.class_contains("language-")) || has_language_code(child)
        }
        Node::Text(_) | Node::Comment(_) | Node::Doctype(_) => false,
    })
}

/// Paths of `pre` blocks inside `region`, in document order.
///
/// Blocks nested in another `pre` and the inline errors of existing diagram
/// containers are not candidates.
fn collect_blocks(doc: &Document, region: &NodePath) -> Vec<NodePath> {
    let mut found = Vec::new();
    doc.walk_within(region, |path, node| match node {
        Node::Element(el) if el.is("pre") => {
            found.push(NodePath::from_indices(path));
            Walk::SkipChildren
        }
        Node::Element(el) if el.has_class("mermaid-container") => Walk::SkipChildren,
        _ => Walk::Continue,
    });
    found
}

/// Classify and process every `pre` block inside `region`.
///
/// Diagram containers are left with unrendered placeholders.
pub fn process_blocks(
    doc: &mut Document,
    region: &NodePath,
    default_language: &str,
    highlighter: &dyn CodeHighlighter,
) -> BlockSummary {
    let mut summary = BlockSummary::default();

    for path in collect_blocks(doc, region) {
        let Some(pre) = doc.element_mut(&path) else {
            continue;
        };
        let block = ContentBlock::read(pre);

        match block.kind {
            BlockKind::Diagram(grammar) => {
                tracing::debug!(?grammar, "Found diagram block");
                doc.replace(&path, diagram_container(&block.text).into());
                summary.diagrams += 1;
            }
            BlockKind::Formatted => summary.formatted += 1,
            BlockKind::Code => {
                let text = pre.text_content();
                let mut code =
                    Element::new("code").with_class(format!("language-{default_language}"));
                match highlighter.highlight(default_language, &text) {
                    Some(markup) => code.set_inner_html(&markup),
                    None => code.set_text(text),
                }
                pre.children = vec![code.into()];
                summary.highlighted += 1;
            }
        }
    }

    summary
}
