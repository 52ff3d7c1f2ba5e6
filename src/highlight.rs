//! Syntax highlighting for fenced code blocks.
//!
//! Highlighting is class-based: code is wrapped in `<span class="hl-…">`
//! elements and the colors live in CSS generated from two bundled themes
//! (light and dark). Languages syntect does not bundle fall back to a close
//! relative (`ts` → JavaScript) or to plain escaped text.

use maud::{Markup, PreEscaped, html};
use std::sync::LazyLock;
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

const LIGHT_THEME: &str = "InspiredGitHub";
const DARK_THEME: &str = "base16-ocean.dark";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Map fence languages onto tokens syntect knows.
fn syntax_token(lang: &str) -> &str {
    match lang {
        "ts" | "typescript" | "tsx" | "jsx" | "mts" | "cts" | "javascript" | "mjs" => "js",
        "shell" | "bash" | "zsh" | "console" => "sh",
        "jsonc" | "json5" => "json",
        "yml" => "yaml",
        "rs" => "rust",
        "py" => "python",
        other => other,
    }
}

fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    if lang.is_empty() {
        return None;
    }
    let token = syntax_token(lang);
    SYNTAXES.find_syntax_by_token(token)
}

fn highlight_spans(code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

/// Render a fenced code block.
///
/// `lang` is the first word of the fence info string, lowercased; an empty
/// string means no language.
pub fn code_block(code: &str, lang: &str) -> Markup {
    let class = if lang.is_empty() {
        "hljs".to_string()
    } else {
        format!("hljs language-{lang}")
    };

    let spans = find_syntax(lang).and_then(|syntax| match highlight_spans(code, syntax) {
        Ok(spans) => Some(spans),
        Err(e) => {
            tracing::warn!("highlighting {} block failed: {}", lang, e);
            None
        }
    });

    html! {
        pre.hl-code {
            code class=(class) {
                @match spans {
                    Some(spans) => { (PreEscaped(spans)) }
                    None => { (code) }
                }
            }
        }
    }
}

/// CSS for highlighted code: light theme by default, dark theme under
/// `prefers-color-scheme: dark`.
pub fn theme_css() -> String {
    let themes = ThemeSet::load_defaults();
    let mut css = String::new();

    if let Some(light) = themes.themes.get(LIGHT_THEME) {
        match css_for_theme_with_class_style(light, CLASS_STYLE) {
            Ok(rules) => css.push_str(&rules),
            Err(e) => tracing::warn!("theme {} CSS failed: {}", LIGHT_THEME, e),
        }
    }
    if let Some(dark) = themes.themes.get(DARK_THEME) {
        match css_for_theme_with_class_style(dark, CLASS_STYLE) {
            Ok(rules) => {
                css.push_str("\n@media (prefers-color-scheme: dark) {\n");
                css.push_str(&rules);
                css.push_str("\n}\n");
            }
            Err(e) => tracing::warn!("theme {} CSS failed: {}", DARK_THEME, e),
        }
    }
    css
}
