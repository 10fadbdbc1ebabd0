//! Whole-page enhancement pass.

use vellum_diagrams::{DiagramEngine, RenderSummary, render_diagrams};
use vellum_dom::{Document, Node, NodePath, Walk};

use crate::blocks::{BlockSummary, process_blocks};
use crate::highlight::{CodeHighlighter, SyntectHighlighter};
use crate::toc::{DEFAULT_TOC_TITLE, synthesize_toc};

/// Class marking article content regions.
pub const DEFAULT_ARTICLE_CLASS: &str = "article-content";

/// Language assumed for code blocks without a `language-*` class.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Counts from one enhancement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceSummary {
    /// Article regions found.
    pub regions: usize,
    /// Block classification counts.
    pub blocks: BlockSummary,
    /// Diagram rendering counts (zero when no engine is configured).
    pub diagrams: RenderSummary,
    /// Tables of contents inserted.
    pub tocs: usize,
}

/// Post-processes article HTML: diagrams, code highlighting and table of
/// contents.
///
/// # Example
///
/// ```
/// use vellum_renderer::PageEnhancer;
///
/// let enhancer = PageEnhancer::new();
/// let html = enhancer
///     .enhance(r#"<div class="article-content"><p>[TOC]</p><h2>Intro</h2></div>"#);
/// assert!(html.contains(r##"<a href="#intro">Intro</a>"##));
/// ```
pub struct PageEnhancer {
    article_class: String,
    default_language: String,
    toc_title: String,
    highlighter: Box<dyn CodeHighlighter>,
    engine: Option<Box<dyn DiagramEngine>>,
}

impl Default for PageEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageEnhancer {
    /// Create an enhancer with default settings and no diagram engine.
    ///
    /// Without an engine, diagram placeholders are left for a client-side
    /// renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            article_class: DEFAULT_ARTICLE_CLASS.to_owned(),
            default_language: DEFAULT_LANGUAGE.to_owned(),
            toc_title: DEFAULT_TOC_TITLE.to_owned(),
            highlighter: Box::new(SyntectHighlighter),
            engine: None,
        }
    }

    /// Set the class marking article content regions.
    #[must_use]
    pub fn with_article_class(mut self, class: impl Into<String>) -> Self {
        self.article_class = class.into();
        self
    }

    /// Set the language assumed for unmarked code blocks.
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Set the table of contents title.
    #[must_use]
    pub fn with_toc_title(mut self, title: impl Into<String>) -> Self {
        self.toc_title = title.into();
        self
    }

    /// Replace the code highlighter.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: impl CodeHighlighter + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Render diagrams with `engine`.
    #[must_use]
    pub fn with_diagram_engine(mut self, engine: impl DiagramEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Enhance an HTML page or fragment.
    pub fn enhance(&self, html: &str) -> String {
        let mut doc = Document::parse(html);
        self.enhance_document(&mut doc);
        doc.to_html()
    }

    /// Enhance a parsed document in place.
    ///
    /// Blocks are classified first, then all diagrams are rendered, then each
    /// region gets its table of contents.
    pub fn enhance_document(&self, doc: &mut Document) -> EnhanceSummary {
        let regions = self.article_regions(doc);
        let mut summary = EnhanceSummary {
            regions: regions.len(),
            ..EnhanceSummary::default()
        };

        for region in &regions {
            let blocks = process_blocks(
                doc,
                region,
                &self.default_language,
                self.highlighter.as_ref(),
            );
            summary.blocks.diagrams += blocks.diagrams;
            summary.blocks.highlighted += blocks.highlighted;
            summary.blocks.formatted += blocks.formatted;
        }

        if let Some(engine) = &self.engine {
            summary.diagrams = render_diagrams(doc, engine.as_ref());
        }

        for region in &regions {
            if synthesize_toc(doc, region, &self.toc_title).is_some() {
                summary.tocs += 1;
            }
        }

        summary
    }

    /// Paths of article regions in document order.
    ///
    /// A region nested inside another is processed as part of the outer one.
    fn article_regions(&self, doc: &Document) -> Vec<NodePath> {
        let mut found = Vec::new();
        doc.walk(|path, node| match node {
            Node::Element(el) if el.has_class(&self.article_class) => {
                found.push(NodePath::from_indices(path));
                Walk::SkipChildren
            }
            _ => Walk::Continue,
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vellum_diagrams::DiagramError;

    /// Engine that rejects `flowchart X` and renders everything else.
    struct StubEngine;

    impl DiagramEngine for StubEngine {
        fn render(&self, id: &str, source: &str) -> Result<String, DiagramError> {
            if source.starts_with("flowchart X") {
                return Err(DiagramError::Engine("Syntax error in graph".to_owned()));
            }
            Ok(format!(r#"<svg id="{id}"></svg>"#))
        }
    }

    /// Highlighter that leaves text plain.
    struct Plain;

    impl CodeHighlighter for Plain {
        fn highlight(&self, _language: &str, _code: &str) -> Option<String> {
            None
        }
    }

    fn article(body: &str) -> String {
        format!(r#"<html><body><div class="article-content">{body}</div></body></html>"#)
    }

    #[test]
    fn test_diagram_end_to_end() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let html = enhancer.enhance(&article("<pre>graph TD\nA--&gt;B</pre>"));

        let doc = Document::parse(&html);
        let buttons = doc.find_elements(|el| el.is("button"));
        assert_eq!(buttons.len(), 3);
        let controls = doc.find_elements(|el| el.has_class("mermaid-controls"));
        assert_eq!(controls.len(), 1);
        for button in &buttons {
            assert!(controls[0].is_ancestor_of(button));
        }

        let placeholders = doc.find_elements(|el| el.has_class("mermaid"));
        assert_eq!(placeholders.len(), 1);
        assert_eq!(
            doc.element(&placeholders[0]).unwrap().text_content(),
            "graph TD\nA-->B"
        );
    }

    #[test]
    fn test_failing_diagram_does_not_block_next() {
        let enhancer = PageEnhancer::new()
            .with_highlighter(Plain)
            .with_diagram_engine(StubEngine);
        let mut doc = Document::parse(&article(
            "<pre>flowchart X</pre><p>text</p><pre>graph TD\nA--&gt;B</pre>",
        ));
        let summary = enhancer.enhance_document(&mut doc);

        assert_eq!(summary.diagrams, RenderSummary { rendered: 1, failed: 1 });
        let html = doc.to_html();
        assert!(html.contains(
            r#"<pre style="color: red;">Mermaid Error: Syntax error in graph</pre>"#
        ));
        assert!(html.contains(r#"<svg id="mermaid-1"></svg>"#));
    }

    #[test]
    fn test_code_and_toc_end_to_end() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let html = enhancer
            .enhance(&article("<p>[TOC]</p><h2>Setup</h2><pre>pip install x</pre><h3>Setup</h3>"));

        assert!(html.contains(r#"<pre><code class="language-python">pip install x</code></pre>"#));
        assert!(html.contains(r##"<a href="#setup">Setup</a>"##));
        assert!(html.contains(r##"<a href="#setup-1">Setup</a>"##));
        assert!(html.contains(r#"<h3 id="setup-1">Setup</h3>"#));
    }

    #[test]
    fn test_content_outside_articles_untouched() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let input = "<div class=\"sidebar\"><p>[TOC]</p><h2>A</h2><pre>graph TD\nA</pre></div>";
        let html = enhancer.enhance(input);
        assert_eq!(html, input);
    }

    #[test]
    fn test_toc_per_region() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let mut doc = Document::parse(concat!(
            r#"<div class="article-content"><p>[TOC]</p><h2>One</h2></div>"#,
            r#"<div class="article-content"><p>[TOC]</p><h2>Two</h2></div>"#,
        ));
        let summary = enhancer.enhance_document(&mut doc);
        assert_eq!(summary.regions, 2);
        assert_eq!(summary.tocs, 2);
    }

    #[test]
    fn test_custom_article_class_and_title() {
        let enhancer = PageEnhancer::new()
            .with_highlighter(Plain)
            .with_article_class("post")
            .with_toc_title("Contents");
        let html = enhancer
            .enhance(r#"<main class="post">[TOC]<h2>A</h2></main>"#);
        assert!(html.contains(r#"<h4 class="toc-title">Contents</h4>"#));
    }

    #[test]
    fn test_enhance_is_idempotent_without_engine() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let once = enhancer
            .enhance(&article("<p>[TOC]</p><h2>A</h2><pre>x = 1</pre><pre>pie title P</pre>"));
        let twice = enhancer.enhance(&once);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_bare_less_than_in_code_keeps_following_content() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let html = enhancer.enhance(concat!(
            "<div class=\"article-content\"><pre>if a < b:\n    pass</pre>",
            "<p>[TOC]</p><h2>Next</h2><p>More prose</p></div><footer>f</footer>"
        ));

        assert!(html.contains(
            "<pre><code class=\"language-python\">if a &lt; b:\n    pass</code></pre><nav class=\"toc\">"
        ));
        assert!(html.contains(r#"<h2 id="next">Next</h2><p>More prose</p></div><footer>f</footer>"#));
    }

    #[test]
    fn test_unclosed_marker_paragraph_replaced_whole() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let html = enhancer.enhance(r#"<div class="article-content"><p>[TOC]<h2>A</h2></div>"#);
        assert!(html.starts_with(r#"<div class="article-content"><nav class="toc">"#));
        assert!(html.ends_with(r#"</nav><h2 id="a">A</h2></div>"#));
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_doctype_and_scripts_preserved() {
        let enhancer = PageEnhancer::new().with_highlighter(Plain);
        let input = concat!(
            "<!DOCTYPE html><html><head><script>if (a < b && c) {}</script></head>",
            r#"<body><div class="article-content"><p>Hi</p></div></body></html>"#
        );
        assert_eq!(enhancer.enhance(input), input);
    }
}
