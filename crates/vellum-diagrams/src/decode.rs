//! Plain-text reconstruction of a preformatted block's inner markup.
//!
//! Rich-text editors often wrap each line of a pasted diagram in `<p>` or
//! separate lines with `<br>`. Decoding turns those back into newlines,
//! drops all other markup and unescapes the basic HTML entities.

use std::sync::LazyLock;

use regex::Regex;

static PARAGRAPH_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p>\s*<p[^>]*>").expect("invalid paragraph regex"));

static PARAGRAPH_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p[^>]*>").expect("invalid paragraph regex"));

static PARAGRAPH_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p>").expect("invalid paragraph regex"));

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("invalid line break regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("invalid tag regex"));

static NBSP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&nbsp;").expect("invalid nbsp regex"));

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n").expect("invalid blank line regex"));

/// Decode a block's inner markup into plain text.
///
/// Paragraph boundaries and `<br>` tags become newlines, remaining tags are
/// stripped, `&nbsp;` `&lt;` `&gt;` `&amp;` `&quot;` `&#39;` are unescaped,
/// runs of three or more newlines collapse to one blank line, and the result
/// is trimmed.
///
/// # Examples
///
/// ```
/// use vellum_diagrams::decode_block;
///
/// assert_eq!(decode_block("<p>graph TD</p><p>A--&gt;B</p>"), "graph TD\nA-->B");
/// ```
#[must_use]
pub fn decode_block(markup: &str) -> String {
    let text = PARAGRAPH_BOUNDARY_RE.replace_all(markup, "\n");
    let text = PARAGRAPH_OPEN_RE.replace_all(&text, "");
    let text = PARAGRAPH_CLOSE_RE.replace_all(&text, "\n");
    let text = LINE_BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = NBSP_RE.replace_all(&text, " ");

    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_owned()
}
