//! Table of contents synthesis from a `[TOC]` placeholder.
//!
//! The first text node of a region whose trimmed text is `[TOC]` is replaced
//! with a navigation list of the region's `h2`-`h4` headings. Headings get
//! slug identifiers so the links resolve.

use vellum_dom::{Document, Element, Node, NodePath};

/// Placeholder text marking where the table of contents goes.
pub const TOC_MARKER: &str = "[TOC]";

/// Default title shown above the list.
pub const DEFAULT_TOC_TITLE: &str = "Table of Contents";

/// Maximum slug length in characters.
const SLUG_MAX_LEN: usize = 50;

/// Left indent per nesting level, in `rem`.
const INDENT_REM: f64 = 1.25;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Nesting level (`h2` is 0).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

impl TocEntry {
    /// Inline style indenting nested entries.
    #[must_use]
    pub fn indent_style(&self) -> Option<String> {
        (self.level > 0).then(|| format!("margin-left: {}rem;", f64::from(self.level) * INDENT_REM))
    }

    fn to_element(&self) -> Element {
        let mut item = Element::new("li");
        if let Some(style) = self.indent_style() {
            item.set_attr("style", style);
        }
        item.with_child(
            Element::new("a")
                .with_attr("href", format!("#{}", self.id))
                .with_text(self.title.clone()),
        )
    }
}

/// Convert heading text to an anchor slug.
///
/// Lowercases, drops characters outside `[a-z0-9]`, whitespace and `-`, turns
/// runs of whitespace and hyphens into a single `-` and truncates to 50
/// characters. The result may be empty.
///
/// # Examples
///
/// ```
/// use vellum_renderer::slugify;
///
/// assert_eq!(slugify("Hello, World! 2024"), "hello-world-2024");
/// assert_eq!(slugify("!!!"), "");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();

    for c in text.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    // Only ASCII is pushed, so byte and char lengths agree.
    slug.truncate(SLUG_MAX_LEN);
    slug
}

/// Build the navigation fragment for `entries`.
#[must_use]
pub fn toc_element(entries: &[TocEntry], title: &str) -> Element {
    let list = entries
        .iter()
        .fold(Element::new("ul").with_class("toc-list"), |list, entry| {
            list.with_child(entry.to_element())
        });

    Element::new("nav")
        .with_class("toc")
        .with_child(Element::new("h4").with_class("toc-title").with_text(title))
        .with_child(list)
}

/// Unique identifier for the heading at positional `index`.
fn heading_id(doc: &Document, text: &str, index: usize) -> String {
    let mut id = slugify(text);
    if id.is_empty() {
        id = format!("section-{index}");
    }
    if doc.contains_id(&id) {
        id = format!("{id}-{index}");
    }
    id
}

/// Replace the `[TOC]` placeholder inside `region` with a table of contents.
///
/// Returns the generated entries, or `None` when the region has no
/// placeholder or no `h2`-`h4` headings (the region is then unchanged).
/// Identifiers are unique against the whole document, not just the region.
pub fn synthesize_toc(doc: &mut Document, region: &NodePath, title: &str) -> Option<Vec<TocEntry>> {
    let marker = doc.find_text_within(region, |text| text.trim() == TOC_MARKER)?;

    let headings =
        doc.find_elements_within(region, |el| matches!(el.heading_rank(), Some(2..=4)));
    if headings.is_empty() {
        return None;
    }

    let mut entries = Vec::with_capacity(headings.len());
    for (index, path) in headings.iter().enumerate() {
        let Some(heading) = doc.element(path) else {
            continue;
        };
        let text = heading.text_content().trim().to_owned();
        let level = heading.heading_rank().unwrap_or(2) - 2;
        let id = heading_id(doc, &text, index);

        if let Some(heading) = doc.element_mut(path) {
            heading.set_attr("id", id.clone());
        }
        entries.push(TocEntry {
            level,
            title: text,
            id,
        });
    }

    let nav = Node::from(toc_element(&entries, title));
    let paragraph = marker.parent().filter(|parent| {
        doc.element(parent)
            .is_some_and(|el| el.is("p") && el.text_content().trim() == TOC_MARKER)
    });
    doc.replace(paragraph.as_ref().unwrap_or(&marker), nav);

    Some(entries)
}
