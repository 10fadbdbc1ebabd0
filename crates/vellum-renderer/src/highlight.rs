//! Syntax highlighting for code blocks.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Produces class-annotated markup for source code.
pub trait CodeHighlighter: Send + Sync {
    /// Highlight `code` written in `language`.
    ///
    /// Returns `None` when the language is unknown or highlighting fails; the
    /// caller then keeps the plain text.
    fn highlight(&self, language: &str, code: &str) -> Option<String>;
}

/// Highlighter backed by syntect's bundled grammars.
///
/// Output uses space-separated scope classes (`<span class="source python">`),
/// styled by a stylesheet generated for the site theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectHighlighter;

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, language: &str, code: &str) -> Option<String> {
        let Some(syntax) = SYNTAX_SET.find_syntax_by_token(language) else {
            tracing::debug!(language, "No syntax for language, leaving code unhighlighted");
            return None;
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!(language, error = %e, "Highlighting failed");
                return None;
            }
        }
        Some(generator.finalize())
    }
}
