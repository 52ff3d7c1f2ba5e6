//! Code playground widget.
//!
//! An editor frame with a file tab and language badge around an editable
//! `<textarea>`. `site.js` upgrades the textarea (tab key, auto-height); the
//! page works without it.

use super::{Props, Widget, WidgetError};
use crate::config::PlaygroundConfig;
use maud::{Markup, html};

const CSS_UNITS: &[&str] = &["px", "rem", "em", "vh", "%"];

pub struct CodePlayground {
    defaults: PlaygroundConfig,
}

impl CodePlayground {
    pub fn new(defaults: PlaygroundConfig) -> Self {
        Self { defaults }
    }
}

/// File extension shown on the editor tab.
fn extension(language: &str) -> &str {
    match language {
        "typescript" | "ts" => "ts",
        "javascript" | "js" => "js",
        "tsx" => "tsx",
        "jsx" => "jsx",
        "json" => "json",
        "rust" => "rs",
        "python" => "py",
        other => other,
    }
}

fn badge(language: &str) -> String {
    match language {
        "typescript" | "ts" => "TypeScript".to_string(),
        "javascript" | "js" => "JavaScript".to_string(),
        "tsx" => "TSX".to_string(),
        "jsx" => "JSX".to_string(),
        "json" => "JSON".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Accept `300`, `300px`, `20rem`, `50vh`, … ; bare numbers mean pixels.
fn normalize_height(height: &str) -> Result<String, WidgetError> {
    let height = height.trim();
    let digits = height
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(height.len());
    let (number, unit) = height.split_at(digits);
    if number.is_empty() || number.parse::<f64>().is_err() {
        return Err(WidgetError::InvalidProp {
            prop: "height",
            value: height.to_string(),
        });
    }
    match unit {
        "" => Ok(format!("{number}px")),
        u if CSS_UNITS.contains(&u) => Ok(height.to_string()),
        _ => Err(WidgetError::InvalidProp {
            prop: "height",
            value: height.to_string(),
        }),
    }
}

impl Widget for CodePlayground {
    fn name(&self) -> &'static str {
        "CodePlayground"
    }

    fn fence(&self) -> Option<&'static str> {
        Some("playground")
    }

    fn body_prop(&self) -> &'static str {
        "initialCode"
    }

    fn render(&self, props: &Props) -> Result<Markup, WidgetError> {
        let language = props
            .get("language")
            .map(String::as_str)
            .unwrap_or(&self.defaults.language);
        let height = normalize_height(
            props
                .get("height")
                .map(String::as_str)
                .unwrap_or(&self.defaults.height),
        )?;
        let code = props
            .get("initialCode")
            .map(|c| c.trim_matches('\n'))
            .unwrap_or(&self.defaults.placeholder);

        let file_name = format!("Playground.{}", extension(language));
        let style = format!("height: {height};");

        Ok(html! {
            div.code-playground data-language=(language) {
                div.playground-header {
                    div.playground-title {
                        span.playground-dots aria-hidden="true" { span {} span {} span {} }
                        span.playground-file { (file_name) }
                    }
                    span.playground-badge { (badge(language)) }
                }
                textarea.playground-editor spellcheck="false" aria-label={ (file_name) " editor" } style=(style) {
                    "\n" (code)
                }
            }
        })
    }
}
