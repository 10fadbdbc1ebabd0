//! Diagram detection and rendering for Vellum.
//!
//! This crate turns preformatted article blocks that contain Mermaid
//! notation into interactive diagram containers:
//! - [`decode_block`] reconstructs plain text from a block's inner markup
//! - [`MermaidGrammar::detect`] classifies decoded text by its leading keyword
//! - [`diagram_container`] builds the zoom control strip and placeholder
//! - [`render_diagrams`] renders every placeholder concurrently through a
//!   [`DiagramEngine`], isolating failures per diagram
//!
//! # Architecture
//!
//! - `grammar`: Mermaid keyword table and classification
//! - `decode`: block text decoding
//! - `container`: container, control strip and inline error markup
//! - `engine`: `DiagramEngine` trait and error type
//! - `kroki`: HTTP engine backed by a Kroki server
//! - `mermaid`: engine initialization (`%%{init}%%` directive)
//! - `render`: parallel rendering pass over a document
//!
//! # Example
//!
//! ```ignore
//! use vellum_diagrams::{KrokiEngine, MermaidConfig, render_diagrams};
//! use vellum_dom::Document;
//!
//! let mut doc = Document::parse(html);
//! let engine = KrokiEngine::new("https://kroki.io", MermaidConfig::default());
//! let summary = render_diagrams(&mut doc, &engine);
//! ```

mod consts;
mod container;
mod decode;
mod engine;
mod grammar;
mod kroki;
mod mermaid;
mod render;

pub use consts::DEFAULT_TIMEOUT;
pub use container::{ZoomAction, diagram_container, error_element, is_placeholder};
pub use decode::decode_block;
pub use engine::{DiagramEngine, DiagramError};
pub use grammar::MermaidGrammar;
pub use kroki::KrokiEngine;
pub use mermaid::{FlowchartConfig, MermaidConfig};
pub use render::{DiagramRequest, RenderSummary, RenderedDiagram, render_all, render_diagrams};
