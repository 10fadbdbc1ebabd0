//! Mermaid engine initialization.
//!
//! Theme, security level, flowchart style and palette are delivered to the
//! renderer as a `%%{init: ...}%%` directive prepended to every diagram.

use std::collections::BTreeMap;

use serde::Serialize;

/// Mermaid initialization options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MermaidConfig {
    /// Theme name (`default`, `neutral`, `dark`, `forest`, `base`).
    pub theme: String,
    /// Security level (`strict`, `loose`, `antiscript`, `sandbox`).
    pub security_level: String,
    /// Flowchart options.
    pub flowchart: FlowchartConfig,
    /// Named theme colors.
    pub theme_variables: BTreeMap<String, String>,
}

/// Flowchart rendering options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartConfig {
    /// Render node labels as HTML.
    pub html_labels: bool,
    /// Edge curve style (`basis`, `linear`, `cardinal`, ...).
    pub curve: String,
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            html_labels: true,
            curve: "basis".to_owned(),
        }
    }
}

impl Default for MermaidConfig {
    /// GitHub-like light theme.
    fn default() -> Self {
        let theme_variables = [
            ("primaryColor", "#dce5f2"),
            ("primaryTextColor", "#24292f"),
            ("primaryBorderColor", "#8b949e"),
            ("lineColor", "#57606a"),
            ("secondaryColor", "#fff8dc"),
            ("tertiaryColor", "#f6f8fa"),
            ("background", "#ffffff"),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_owned(), color.to_owned()))
        .collect();

        Self {
            theme: "default".to_owned(),
            security_level: "loose".to_owned(),
            flowchart: FlowchartConfig::default(),
            theme_variables,
        }
    }
}

impl MermaidConfig {
    /// `%%{init: ...}%%` directive carrying this configuration.
    #[must_use]
    pub fn init_directive(&self) -> String {
        // Serializing plain strings, bools and string maps cannot fail.
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned());
        format!("%%{{init: {json}}}%%")
    }

    /// Diagram source with the init directive prepended.
    #[must_use]
    pub fn apply(&self, source: &str) -> String {
        format!("{}\n{source}", self.init_directive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_palette() {
        let config = MermaidConfig::default();
        assert_eq!(config.theme, "default");
        assert_eq!(config.security_level, "loose");
        assert!(config.flowchart.html_labels);
        assert_eq!(config.flowchart.curve, "basis");
        assert_eq!(config.theme_variables.len(), 7);
        assert_eq!(config.theme_variables["primaryColor"], "#dce5f2");
    }

    #[test]
    fn test_init_directive_camel_case() {
        let config = MermaidConfig {
            theme_variables: BTreeMap::new(),
            ..MermaidConfig::default()
        };
        assert_eq!(
            config.init_directive(),
            r#"%%{init: {"theme":"default","securityLevel":"loose","flowchart":{"htmlLabels":true,"curve":"basis"},"themeVariables":{}}}%%"#
        );
    }

    #[test]
    fn test_apply_prepends_directive() {
        let config = MermaidConfig::default();
        let source = config.apply("graph TD\nA-->B");
        assert!(source.starts_with("%%{init: {"));
        assert!(source.ends_with("}%%\ngraph TD\nA-->B"));
    }
}
