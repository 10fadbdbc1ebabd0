//! Mermaid rendering through a Kroki server.
//!
//! Each diagram is POSTed to `<server>/mermaid/svg` with the configured
//! `%%{init}%%` directive prepended. Requests share one HTTP agent and carry a
//! global timeout, so a hung server surfaces as a render error instead of an
//! unresolved placeholder.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use ureq::Agent;

use crate::consts::DEFAULT_TIMEOUT;
use crate::engine::{DiagramEngine, DiagramError};
use crate::mermaid::MermaidConfig;

/// XML prolog and doctype that must not appear inside HTML.
static SVG_PROLOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*(?:<\?xml[^>]*\?>\s*)?(?:<!DOCTYPE[^>]*>\s*)?")
        .expect("invalid SVG prolog regex")
});

/// Opening tag of the root `<svg>` element.
static SVG_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<svg\b[^>]*>").expect("invalid SVG tag regex"));

/// `id` attribute inside a tag.
static ID_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sid="([^"]*)""#).expect("invalid id regex"));

/// Create HTTP agent with the specified timeout.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Diagram engine backed by a Kroki server.
pub struct KrokiEngine {
    /// Kroki server URL without trailing slash.
    server_url: String,
    /// Mermaid initialization prepended to every diagram.
    mermaid: MermaidConfig,
    /// HTTP agent for connection pooling (reused across render calls).
    agent: Agent,
}

impl KrokiEngine {
    /// Create an engine for the given Kroki server.
    #[must_use]
    pub fn new(server_url: impl Into<String>, mermaid: MermaidConfig) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_owned();
        Self {
            server_url,
            mermaid,
            agent: create_agent(DEFAULT_TIMEOUT),
        }
    }

    /// Set HTTP timeout for Kroki requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Kroki server URL.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Send the diagram to Kroki and return the response body.
    ///
    /// HTTP errors carry the response body, which holds Kroki's description of
    /// the syntax error.
    fn send(&self, source: &str) -> Result<Vec<u8>, DiagramError> {
        let url = format!("{}/mermaid/svg", self.server_url);
        let body = self.mermaid.apply(source);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(body.as_bytes())
            .map_err(|e| DiagramError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramError::Http(format!(
                "HTTP {status}: {}",
                error_body.trim()
            )));
        }

        body.read_to_vec()
            .map_err(|e| DiagramError::Io(e.to_string()))
    }
}

impl DiagramEngine for KrokiEngine {
    fn render(&self, id: &str, source: &str) -> Result<String, DiagramError> {
        let data = self.send(source)?;
        let svg = String::from_utf8(data).map_err(|e| DiagramError::InvalidUtf8(e.to_string()))?;
        Ok(prepare_svg(&svg, id))
    }
}

/// Make Kroki's SVG document embeddable under the given root `id`.
///
/// Strips the XML prolog and renames the root id. Mermaid scopes its
/// stylesheet with `#<id>` selectors, so every reference to the old id is
/// renamed as well.
fn prepare_svg(svg: &str, id: &str) -> String {
    let svg = SVG_PROLOG_RE.replace(svg, "");

    let Some(open) = SVG_OPEN_RE.find(&svg) else {
        return svg.trim().to_owned();
    };
    let open_tag = open.as_str();

    let renamed = match ID_ATTR_RE.captures(open_tag).and_then(|caps| caps.get(1)) {
        Some(old) if !old.as_str().is_empty() => {
            let old_id = old.as_str();
            let new_tag = open_tag.replacen(&format!(r#"id="{old_id}""#), &format!(r#"id="{id}""#), 1);
            let body = svg[open.end()..].replace(&format!("#{old_id}"), &format!("#{id}"));
            format!("{}{new_tag}{body}", &svg[..open.start()])
        }
        _ => {
            let new_tag = open_tag.replacen("<svg", &format!(r#"<svg id="{id}""#), 1);
            format!("{}{new_tag}{}", &svg[..open.start()], &svg[open.end()..])
        }
    };

    renamed.trim().to_owned()
}
