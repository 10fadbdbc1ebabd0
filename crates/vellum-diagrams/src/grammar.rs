//! Mermaid diagram grammars recognized by their leading keyword.

/// Diagram grammars that mark a block as Mermaid notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidGrammar {
    Graph,
    Flowchart,
    Sequence,
    Class,
    State,
    EntityRelationship,
    Gantt,
    Pie,
    Journey,
    GitGraph,
    Mindmap,
    Timeline,
    QuadrantChart,
}

/// Leading keywords, checked in order.
///
/// `graph`, `flowchart` and `pie` require a trailing space or newline so that
/// ordinary prose such as "graphics" or "pieces" is not mistaken for a diagram.
const KEYWORDS: &[(&str, MermaidGrammar)] = &[
    ("graph ", MermaidGrammar::Graph),
    ("graph\n", MermaidGrammar::Graph),
    ("flowchart ", MermaidGrammar::Flowchart),
    ("flowchart\n", MermaidGrammar::Flowchart),
    ("sequencediagram", MermaidGrammar::Sequence),
    ("classdiagram", MermaidGrammar::Class),
    ("statediagram", MermaidGrammar::State),
    ("erdiagram", MermaidGrammar::EntityRelationship),
    ("gantt", MermaidGrammar::Gantt),
    ("pie ", MermaidGrammar::Pie),
    ("pie\n", MermaidGrammar::Pie),
    ("journey", MermaidGrammar::Journey),
    ("gitgraph", MermaidGrammar::GitGraph),
    ("mindmap", MermaidGrammar::Mindmap),
    ("timeline", MermaidGrammar::Timeline),
    ("quadrantchart", MermaidGrammar::QuadrantChart),
];

impl MermaidGrammar {
    /// Classify decoded block text by its leading keyword (case-insensitive).
    ///
    /// Returns `None` when the text is not diagram notation.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.starts_with(*keyword))
            .map(|&(_, grammar)| grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_all_keywords() {
        let cases = [
            ("graph TD\nA-->B", MermaidGrammar::Graph),
            ("graph\nA-->B", MermaidGrammar::Graph),
            ("flowchart LR\nA-->B", MermaidGrammar::Flowchart),
            ("flowchart\nA-->B", MermaidGrammar::Flowchart),
            ("sequenceDiagram\nA->>B: hi", MermaidGrammar::Sequence),
            ("classDiagram\nA <|-- B", MermaidGrammar::Class),
            ("stateDiagram-v2\n[*] --> S", MermaidGrammar::State),
            ("erDiagram\nA ||--o{ B : has", MermaidGrammar::EntityRelationship),
            ("gantt\ntitle Plan", MermaidGrammar::Gantt),
            ("pie title Pets", MermaidGrammar::Pie),
            ("pie\n\"a\": 1", MermaidGrammar::Pie),
            ("journey\ntitle Day", MermaidGrammar::Journey),
            ("gitGraph\ncommit", MermaidGrammar::GitGraph),
            ("mindmap\nroot", MermaidGrammar::Mindmap),
            ("timeline\ntitle History", MermaidGrammar::Timeline),
            ("quadrantChart\ntitle Reach", MermaidGrammar::QuadrantChart),
        ];

        for (text, expected) in cases {
            assert_eq!(MermaidGrammar::detect(text), Some(expected), "{text:?}");
        }
    }

    #[test]
    fn test_detect_case_insensitive() {
        assert_eq!(MermaidGrammar::detect("GRAPH TD"), Some(MermaidGrammar::Graph));
        assert_eq!(
            MermaidGrammar::detect("SEQUENCEDIAGRAM"),
            Some(MermaidGrammar::Sequence)
        );
    }

    #[test]
    fn test_detect_requires_separator() {
        assert_eq!(MermaidGrammar::detect("graphics pipeline"), None);
        assert_eq!(MermaidGrammar::detect("flowcharts are fun"), None);
        assert_eq!(MermaidGrammar::detect("pieces = 3"), None);
        assert_eq!(MermaidGrammar::detect("graph"), None);
    }

    #[test]
    fn test_detect_code_is_not_diagram() {
        assert_eq!(MermaidGrammar::detect("def main():\n    pass"), None);
        assert_eq!(MermaidGrammar::detect(""), None);
        assert_eq!(MermaidGrammar::detect("  graph TD"), None);
    }
}
