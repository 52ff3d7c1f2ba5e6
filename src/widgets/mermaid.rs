//! Diagram widget.
//!
//! Emits `<pre class="mermaid">` for the browser-side renderer after
//! checking that the source declares a diagram type the renderer knows.
//! Catching an unknown or empty diagram here turns a blank box in the
//! browser into a visible error on the page.

use super::{Props, Widget, WidgetError};
use maud::{Markup, html};

/// Diagram type keywords accepted as the first statement.
const DIAGRAM_TYPES: &[&str] = &[
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "classDiagram-v2",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "quadrantChart",
    "requirementDiagram",
    "gitGraph",
    "C4Context",
    "C4Container",
    "C4Component",
    "C4Dynamic",
    "C4Deployment",
    "mindmap",
    "timeline",
    "zenuml",
    "sankey-beta",
    "xychart-beta",
    "block-beta",
    "packet-beta",
    "kanban",
    "architecture-beta",
];

const FLOW_DIRECTIONS: &[&str] = &["TB", "TD", "BT", "RL", "LR"];

/// Skip blank lines, `%%` comments/directives and a leading `---` config block.
fn first_statement(source: &str) -> Option<&str> {
    let mut lines = source.lines().map(str::trim).peekable();
    while lines.peek().is_some_and(|l| l.is_empty()) {
        lines.next();
    }
    if lines.peek() == Some(&"---") {
        lines.next();
        for line in lines.by_ref() {
            if line == "---" {
                break;
            }
        }
    }
    lines.find(|l| !l.is_empty() && !l.starts_with("%%"))
}

/// Check a diagram source and return its type keyword.
pub fn validate(source: &str) -> Result<&str, WidgetError> {
    let statement = first_statement(source)
        .ok_or_else(|| WidgetError::InvalidDiagram("empty diagram".into()))?;
    let mut words = statement.split_whitespace();
    let keyword = words
        .next()
        .map(|w| w.trim_end_matches(';'))
        .unwrap_or_default();

    if !DIAGRAM_TYPES.contains(&keyword) {
        return Err(WidgetError::InvalidDiagram(format!(
            "unknown diagram type '{keyword}'"
        )));
    }
    if matches!(keyword, "graph" | "flowchart")
        && let Some(dir) = words.next().map(|w| w.trim_end_matches(';'))
        && !FLOW_DIRECTIONS.contains(&dir)
    {
        return Err(WidgetError::InvalidDiagram(format!(
            "unknown flowchart direction '{dir}'"
        )));
    }
    Ok(keyword)
}

/// Tag name of the diagram widget.
pub const NAME: &str = "Mermaid";

pub struct Mermaid {
    failure: String,
}

impl Mermaid {
    /// `failure` is shown in place of a diagram that cannot be rendered.
    pub fn new(failure: impl Into<String>) -> Self {
        Self {
            failure: failure.into(),
        }
    }
}

impl Widget for Mermaid {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fence(&self) -> Option<&'static str> {
        Some("mermaid")
    }

    fn body_prop(&self) -> &'static str {
        "chart"
    }

    fn failure_message(&self) -> &str {
        &self.failure
    }

    fn render(&self, props: &Props) -> Result<Markup, WidgetError> {
        let chart = props
            .get("chart")
            .map(|c| c.trim_matches('\n'))
            .ok_or(WidgetError::MissingProp("chart"))?;
        let kind = validate(chart)?;
        Ok(html! {
            div.mermaid-container data-diagram=(kind) {
                pre.mermaid { (chart) }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(chart: &str) -> Props {
        Props::from([("chart".to_string(), chart.to_string())])
    }

    #[test]
    fn validates_flowchart() {
        assert_eq!(validate("graph TD\n  A --> B").unwrap(), "graph");
        assert_eq!(validate("flowchart LR;\n  A --> B").unwrap(), "flowchart");
        assert_eq!(validate("graph\n  A --> B").unwrap(), "graph");
    }

    #[test]
    fn skips_comments_and_config() {
        let src = "\n%% a comment\n%%{init: {'theme': 'dark'}}%%\nsequenceDiagram\n  A->>B: hi";
        assert_eq!(validate(src).unwrap(), "sequenceDiagram");
        let src = "---\ntitle: Flow\n---\nclassDiagram\n  class A";
        assert_eq!(validate(src).unwrap(), "classDiagram");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            validate("  \n%% only a comment\n"),
            Err(WidgetError::InvalidDiagram(_))
        ));
    }

    #[test]
    fn rejects_unknown_type() {
        let err = validate("grpah TD\n A --> B").unwrap_err();
        assert!(err.to_string().contains("unknown diagram type 'grpah'"));
    }

    #[test]
    fn rejects_bad_direction() {
        let err = validate("graph XY\n A --> B").unwrap_err();
        assert!(err.to_string().contains("direction 'XY'"));
    }

    #[test]
    fn renders_pre_for_browser() {
        let html = Mermaid::new("failed")
            .render(&props("\ngraph TD\n  A --> B\n"))
            .unwrap()
            .into_string();
        assert!(html.contains(r#"<div class="mermaid-container" data-diagram="graph">"#));
        assert!(html.contains("<pre class=\"mermaid\">graph TD\n  A --&gt; B</pre>"));
    }

    #[test]
    fn missing_chart_prop() {
        assert!(matches!(
            Mermaid::new("failed").render(&Props::new()),
            Err(WidgetError::MissingProp("chart"))
        ));
    }
}
