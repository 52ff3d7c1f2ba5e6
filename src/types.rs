//! Shared types passed from the content resolver to the page renderer.
//!
//! Compiled content lives for a single render: the build compiles each
//! chapter once, and the preview server compiles on every request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Metadata from the optional YAML block at the top of a content file.
///
/// ```text
/// ---
/// title: 왜 TypeScript인가?
/// description: TypeScript가 필요한 이유
/// tags: [intro]
/// ---
/// ```
///
/// `title` and `description` accept any scalar (`title: 2024` reads as
/// `"2024"`); a list or mapping there is ignored with a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Every other key, in key order.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let text = match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => match tagged.value {
            Value::String(s) => Some(s),
            other => {
                tracing::warn!("frontmatter: ignoring non-text value {:?}", other);
                None
            }
        },
        other => {
            tracing::warn!("frontmatter: ignoring non-text value {:?}", other);
            None
        }
    };
    Ok(text)
}

impl Frontmatter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.extra.is_empty()
    }
}

/// A heading found while compiling, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub level: u8,
    /// Anchor id, either explicit (`{#id}`) or generated from the text
    pub id: String,
    pub text: String,
}

/// Renderable output of one content file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledContent {
    /// Body HTML, ready to embed without escaping
    pub html: String,
    pub frontmatter: Frontmatter,
    pub headings: Vec<Heading>,
    /// Names of the widgets the document uses, sorted, deduplicated
    pub widgets: Vec<String>,
}

impl CompiledContent {
    pub fn uses_widget(&self, name: &str) -> bool {
        self.widgets.iter().any(|w| w == name)
    }

    pub fn has_anchor(&self, id: &str) -> bool {
        self.headings.iter().any(|h| h.id == id)
    }
}
