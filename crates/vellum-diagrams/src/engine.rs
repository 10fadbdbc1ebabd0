//! Diagram rendering engine abstraction.

/// Renders diagram source into markup.
///
/// Engines are shared across the rendering pool, so implementations must be
/// `Send + Sync`. Each call is independent: an error for one diagram must not
/// leave the engine unusable for the next.
pub trait DiagramEngine: Send + Sync {
    /// Render `source` and return the produced markup (typically inline SVG).
    ///
    /// `id` is the deterministic identifier assigned to the diagram
    /// (`mermaid-<index>`); engines use it for the root element of the output.
    fn render(&self, id: &str, source: &str) -> Result<String, DiagramError>;
}

/// Diagram rendering error.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("invalid UTF-8 in SVG: {0}")]
    InvalidUtf8(String),
    /// Failure reported by the engine itself (syntax error, internal error).
    #[error("{0}")]
    Engine(String),
}

impl DiagramError {
    /// Message shown to readers in place of the failed diagram.
    ///
    /// Falls back to the debug form when the error carries no message.
    #[must_use]
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            format!("{self:?}")
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_message_uses_message() {
        let err = DiagramError::Engine("Parse error on line 1".to_owned());
        assert_eq!(err.display_message(), "Parse error on line 1");
    }

    #[test]
    fn test_display_message_falls_back_to_debug() {
        let err = DiagramError::Engine(String::new());
        assert_eq!(err.display_message(), r#"Engine("")"#);
    }

    #[test]
    fn test_http_error_display() {
        let err = DiagramError::Http("HTTP 400: Syntax error".to_owned());
        assert_eq!(err.to_string(), "HTTP error: HTTP 400: Syntax error");
    }
}
