//! Diagram rendering pass.
//!
//! Placeholders are collected in document order and numbered from zero.
//! Requests are rendered in parallel on the rayon pool; each request has its
//! own `Result`, so one failure never affects another diagram. Results are
//! written back on the calling thread once every request has completed.

use rayon::prelude::*;
use vellum_dom::{Document, Node, NodePath, Walk};

use crate::consts::DIAGRAM_ID_PREFIX;
use crate::container::{error_element, is_placeholder};
use crate::engine::{DiagramEngine, DiagramError};

/// Attribute marking a placeholder whose content has been produced.
const PROCESSED_ATTR: &str = "data-processed";

/// Diagram to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    /// Zero-based position among the document's placeholders.
    pub index: usize,
    /// Render identifier (`mermaid-<index>`).
    pub id: String,
    /// Diagram source text.
    pub source: String,
}

impl DiagramRequest {
    /// Create a request with the identifier derived from `index`.
    #[must_use]
    pub fn new(index: usize, source: impl Into<String>) -> Self {
        Self {
            index,
            id: format!("{DIAGRAM_ID_PREFIX}-{index}"),
            source: source.into(),
        }
    }
}

/// Outcome of one render request.
#[derive(Debug)]
pub struct RenderedDiagram {
    /// Position of the originating request.
    pub index: usize,
    /// Render identifier.
    pub id: String,
    /// Produced markup or the failure.
    pub result: Result<String, DiagramError>,
}

/// Counts from a rendering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Diagrams replaced with rendered markup.
    pub rendered: usize,
    /// Diagrams replaced with an inline error.
    pub failed: usize,
}

/// Render all requests in parallel.
///
/// Outcomes are returned in request order regardless of completion order.
pub fn render_all(requests: &[DiagramRequest], engine: &dyn DiagramEngine) -> Vec<RenderedDiagram> {
    requests
        .par_iter()
        .map(|request| RenderedDiagram {
            index: request.index,
            id: request.id.clone(),
            result: engine.render(&request.id, &request.source),
        })
        .collect()
}

/// Paths of all placeholders in document order.
///
/// Placeholders nested inside another placeholder belong to its source and
/// are not collected.
fn collect_placeholders(doc: &Document) -> Vec<NodePath> {
    let mut found = Vec::new();
    doc.walk(|path, node| match node {
        Node::Element(el) if is_placeholder(el) => {
            found.push(NodePath::from_indices(path));
            Walk::SkipChildren
        }
        _ => Walk::Continue,
    });
    found
}

/// Render every diagram placeholder in `doc` through `engine`.
///
/// Successful renders replace the placeholder content with the produced
/// markup. Failures replace it with an inline error and are logged with the
/// diagram source. Placeholders rendered by an earlier pass keep their index
/// but are not rendered again.
pub fn render_diagrams(doc: &mut Document, engine: &dyn DiagramEngine) -> RenderSummary {
    let paths = collect_placeholders(doc);

    let mut requests = Vec::new();
    let mut targets = Vec::new();
    for (index, path) in paths.into_iter().enumerate() {
        let Some(el) = doc.element(&path) else {
            continue;
        };
        if el.attr(PROCESSED_ATTR).is_some() {
            continue;
        }
        requests.push(DiagramRequest::new(index, el.text_content()));
        targets.push(path);
    }

    if requests.is_empty() {
        return RenderSummary::default();
    }

    tracing::debug!(count = requests.len(), "Rendering diagrams");
    let outcomes = render_all(&requests, engine);

    let mut summary = RenderSummary::default();
    for ((request, outcome), path) in requests.iter().zip(outcomes).zip(&targets) {
        let Some(el) = doc.element_mut(path) else {
            continue;
        };
        match outcome.result {
            Ok(svg) => {
                el.set_inner_html(&svg);
                summary.rendered += 1;
            }
            Err(e) => {
                tracing::error!(id = %outcome.id, error = %e, "Mermaid render failed");
                tracing::error!(id = %outcome.id, source = %request.source, "Diagram content");
                el.children = vec![error_element(&e.display_message()).into()];
                summary.failed += 1;
            }
        }
        el.set_attr(PROCESSED_ATTR, "true");
    }

    summary
}
