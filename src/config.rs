//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. A single optional
//! file in the content root is merged on top of the stock defaults, so it
//! only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "TypeScript Academy"
//! tagline = "타입은 약속이다"
//! lang = "ko"                  # <html lang>
//! content_dir = "chapters"     # chapter files, relative to the content root
//!
//! [labels]
//! start = "학습 시작하기 →"
//! previous = "이전 챕터"
//! next = "다음 챕터"
//! complete = "🎉 학습 완료!"
//! pending = "콘텐츠 준비 중입니다 🚧"
//! # ...see `chapterbook gen-config` for the full list
//!
//! [playground]
//! language = "typescript"      # default CodePlayground language
//! height = "300px"
//! placeholder = "// 코드를 입력하세요"
//!
//! [diagrams]
//! script = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs"
//! theme = "default"
//!
//! [colors.light]
//! background = "#ffffff"
//! accent = "#2563eb"
//! # ...
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! # ...
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// File name of the site config inside the content root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults matching the stock course. Unknown keys are
/// rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name, shown in the header, page titles and footer.
    pub title: String,
    /// One-line motto under the hero heading and in the footer.
    pub tagline: String,
    /// Value of `<html lang>`.
    pub lang: String,
    /// Directory holding chapter content files, relative to the content root.
    pub content_dir: String,
    /// User-visible interface strings.
    pub labels: LabelsConfig,
    /// Defaults for `CodePlayground` widgets.
    pub playground: PlaygroundConfig,
    /// Browser-side diagram renderer.
    pub diagrams: DiagramsConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "TypeScript Academy".to_string(),
            tagline: "타입은 약속이다 - TypeScript를 제대로 이해하는 방법".to_string(),
            lang: "ko".to_string(),
            content_dir: "chapters".to_string(),
            labels: LabelsConfig::default(),
            playground: PlaygroundConfig::default(),
            diagrams: DiagramsConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if self.lang.trim().is_empty() {
            return Err(ConfigError::Validation("lang must not be empty".into()));
        }
        let content_dir = Path::new(&self.content_dir);
        if self.content_dir.trim().is_empty()
            || content_dir.is_absolute()
            || content_dir
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(ConfigError::Validation(
                "content_dir must be a relative path inside the content root".into(),
            ));
        }
        if self.playground.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "playground.language must not be empty".into(),
            ));
        }
        if self.playground.height.trim().is_empty() {
            return Err(ConfigError::Validation(
                "playground.height must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Interface strings. Defaults are Korean, matching the stock course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    /// Hero button linking to the first chapter.
    pub start: String,
    /// Hero button jumping to the chapter list.
    pub contents: String,
    /// Heading above the chapter cards.
    pub chapters_heading: String,
    /// Link on each chapter card.
    pub read_chapter: String,
    /// Prefix before the chapter number (`Chapter 01`).
    pub chapter: String,
    /// Heading of the box repeating the chapter description.
    pub learning_goals: String,
    /// Sidebar progress caption.
    pub progress: String,
    /// Caption of the previous-chapter link.
    pub previous: String,
    /// Caption of the next-chapter link.
    pub next: String,
    /// Completion action on the last chapter.
    pub complete: String,
    /// Placeholder shown when a chapter has no content file yet.
    pub pending: String,
    /// Second placeholder line, followed by the expected file pattern.
    pub pending_hint: String,
    /// Shown in place of a diagram that cannot be rendered.
    pub diagram_error: String,
    /// Heading of the 404 page.
    pub not_found: String,
    /// Link back home on the 404 page.
    pub home: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            start: "학습 시작하기 →".to_string(),
            contents: "목차 보기".to_string(),
            chapters_heading: "챕터 목록".to_string(),
            read_chapter: "학습하기 →".to_string(),
            chapter: "Chapter".to_string(),
            learning_goals: "학습 목표".to_string(),
            progress: "학습 진행률".to_string(),
            previous: "이전 챕터".to_string(),
            next: "다음 챕터".to_string(),
            complete: "🎉 학습 완료!".to_string(),
            pending: "콘텐츠 준비 중입니다 🚧".to_string(),
            pending_hint: "다음 파일을 확인해주세요:".to_string(),
            diagram_error: "다이어그램 렌더링에 실패했습니다.".to_string(),
            not_found: "페이지를 찾을 수 없습니다".to_string(),
            home: "처음으로".to_string(),
        }
    }
}

/// Defaults for the code playground widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaygroundConfig {
    /// Editor language when a playground does not set one.
    pub language: String,
    /// Editor height (CSS length; bare numbers are pixels).
    pub height: String,
    /// Code shown when a playground has no `initialCode`.
    pub placeholder: String,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            language: "typescript".to_string(),
            height: "300px".to_string(),
            placeholder: "// 코드를 입력하세요".to_string(),
        }
    }
}

/// Browser-side diagram renderer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramsConfig {
    /// ES module URL of the diagram renderer, loaded only on pages with diagrams.
    pub script: String,
    /// Renderer theme name.
    pub theme: String,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            script: "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs".to_string(),
            theme: "default".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Cards, sidebar and boxes.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Secondary text (durations, captions, sidebar sections).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
    /// Chapter numbers, difficulty dots, progress bar.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f6f7f9".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#1d4ed8".to_string(),
            link_hover: "#1e3a8a".to_string(),
            accent: "#2563eb".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#18181b".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#93c5fd".to_string(),
            link_hover: "#dbeafe".to_string(),
            accent: "#60a5fa".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# chapterbook configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file at content/config.toml.
# Unknown keys will cause an error.

# Site name (header, page titles, footer).
title = "TypeScript Academy"

# One-line motto under the hero heading and in the footer.
tagline = "타입은 약속이다 - TypeScript를 제대로 이해하는 방법"

# Value of <html lang>.
lang = "ko"

# Directory of chapter content files, relative to the content root.
# A chapter with id "ch01" uses the file named ch01.md, ch01-<anything>.md
# or ch01-<anything>.mdx inside it.
content_dir = "chapters"

# ---------------------------------------------------------------------------
# Interface strings
# ---------------------------------------------------------------------------
[labels]
start = "학습 시작하기 →"
contents = "목차 보기"
chapters_heading = "챕터 목록"
read_chapter = "학습하기 →"
chapter = "Chapter"
learning_goals = "학습 목표"
progress = "학습 진행률"
previous = "이전 챕터"
next = "다음 챕터"
complete = "🎉 학습 완료!"
pending = "콘텐츠 준비 중입니다 🚧"
pending_hint = "다음 파일을 확인해주세요:"
diagram_error = "다이어그램 렌더링에 실패했습니다."
not_found = "페이지를 찾을 수 없습니다"
home = "처음으로"

# ---------------------------------------------------------------------------
# Code playground widget defaults
# ---------------------------------------------------------------------------
[playground]
# Editor language when <CodePlayground> does not set one.
language = "typescript"

# Editor height. CSS length; bare numbers are pixels.
height = "300px"

# Code shown when <CodePlayground> has no initialCode.
placeholder = "// 코드를 입력하세요"

# ---------------------------------------------------------------------------
# Diagram widget
# ---------------------------------------------------------------------------
[diagrams]
# ES module URL of the browser-side renderer. Only pages with diagrams load it.
script = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs"

# Renderer theme name.
theme = "default"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f6f7f9"       # Cards, sidebar, boxes
text = "#111111"
text_muted = "#666666"    # Durations, captions, sidebar sections
border = "#e0e0e0"
link = "#1d4ed8"
link_hover = "#1e3a8a"
accent = "#2563eb"        # Chapter numbers, difficulty dots, progress bar

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
surface = "#18181b"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#93c5fd"
link_hover = "#dbeafe"
accent = "#60a5fa"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = scheme_variables(&colors.light, "    "),
        dark = scheme_variables(&colors.dark, "        "),
    )
}

fn scheme_variables(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("bg", &scheme.background),
        ("surface", &scheme.surface),
        ("text", &scheme.text),
        ("text-muted", &scheme.text_muted),
        ("border", &scheme.border),
        ("link", &scheme.link),
        ("link-hover", &scheme.link_hover),
        ("accent", &scheme.accent),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}--color-{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}
