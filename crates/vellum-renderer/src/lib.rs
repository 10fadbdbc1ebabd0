//! Article HTML enhancement.
//!
//! [`PageEnhancer`] runs one pass over a rendered page:
//!
//! 1. Every `pre` block inside an article region is classified. Mermaid
//!    notation becomes a diagram container with zoom controls; other blocks
//!    are wrapped in `<code class="language-*">` and highlighted.
//! 2. Diagram placeholders are rendered concurrently through a
//!    [`DiagramEngine`](vellum_diagrams::DiagramEngine), when one is set.
//! 3. A `[TOC]` placeholder in each region is replaced with a table of
//!    contents linking the region's `h2`-`h4` headings.
//!
//! # Architecture
//!
//! - `blocks`: block decoding, classification and the code path
//! - `highlight`: `CodeHighlighter` trait and the syntect implementation
//! - `toc`: slug generation and table of contents synthesis
//! - `page`: `PageEnhancer` orchestrating the passes

mod blocks;
mod highlight;
mod page;
mod toc;

pub use blocks::{BlockKind, BlockSummary, ContentBlock, process_blocks};
pub use highlight::{CodeHighlighter, SyntectHighlighter};
pub use page::{DEFAULT_ARTICLE_CLASS, DEFAULT_LANGUAGE, EnhanceSummary, PageEnhancer};
pub use toc::{DEFAULT_TOC_TITLE, TOC_MARKER, TocEntry, slugify, synthesize_toc, toc_element};
