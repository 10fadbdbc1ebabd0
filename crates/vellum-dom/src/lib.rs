//! HTML tree model for Vellum.
//!
//! Article HTML is parsed into a [`Document`] of [`Node`]s, mutated in place,
//! and serialized back the way a browser serializes `innerHTML`.
//!
//! # Architecture
//!
//! - `node`: `Node`, `Element`, `Document` and text helpers
//! - `parser`: HTML5 parsing with `html5ever` into the owned tree
//! - `serializer`: HTML serialization through the `html5ever` serializer
//! - `traverse`: depth-first, document-order traversal addressed by [`NodePath`]
//!
//! # Example
//!
//! ```
//! use vellum_dom::Document;
//!
//! let doc = Document::parse("<p>Hello&nbsp;<b>world</b><p>a < b");
//! assert_eq!(doc.text_content(), "Hello\u{a0}worlda < b");
//! assert_eq!(doc.to_html(), "<p>Hello&nbsp;<b>world</b></p><p>a &lt; b</p>");
//! ```

mod node;
mod parser;
mod serializer;
mod traverse;

pub use node::{Document, Element, Namespace, Node};
pub use serializer::escape_text;
pub use traverse::{NodePath, Walk};
