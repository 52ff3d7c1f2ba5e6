//! HTML site generation.
//!
//! Renders the course pages from the chapter registry and the compiled
//! chapter content. The same page functions back the static build and the
//! preview server.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): hero with the site title and a start
//!   link, followed by one card per chapter
//! - **Chapter pages** (`/chapter/{slug}/index.html`): sidebar with the
//!   chapter list and progress, chapter header, learning goals, content (or
//!   a "content pending" placeholder) and previous/next navigation
//! - **Not-found page** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── style.css              # colors + base styles + highlight themes
//! ├── site.js                # playground editor behaviour
//! ├── chapter/
//! │   ├── why-typescript/
//! │   │   └── index.html
//! │   └── ...
//! └── assets/                # copied from content/assets/
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Registry strings are escaped; compiled chapter HTML is embedded as is.

use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{ContentError, ContentResolver};
use crate::highlight;
use crate::registry::{Chapter, Registry, RegistryError, difficulty_dots};
use crate::types::CompiledContent;
use crate::widgets::{WidgetRegistry, mermaid};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub const CSS_STATIC: &str = include_str!("../static/style.css");
pub const JS: &str = include_str!("../static/site.js");

/// Directory inside the content root copied to the output as `assets/`.
pub const ASSETS_DIR: &str = "assets";

/// Everything needed to render the course: config, registry and resolver.
#[derive(Debug)]
pub struct Site {
    pub root: PathBuf,
    pub config: SiteConfig,
    pub registry: Registry,
    pub resolver: ContentResolver,
}

impl Site {
    /// Load config and registry from a content root.
    pub fn load(root: &Path) -> Result<Self, GenerateError> {
        let config = config::load_config(root)?;
        let registry = Registry::load(root)?;
        let widgets = WidgetRegistry::with_builtins(&config);
        let resolver = ContentResolver::new(root.join(&config.content_dir), widgets);
        tracing::debug!(
            "loaded {} chapters, content in {}",
            registry.len(),
            resolver.dir().display()
        );
        Ok(Self {
            root: root.to_path_buf(),
            config,
            registry,
            resolver,
        })
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }

    /// Full stylesheet: color variables, base styles, highlight themes.
    pub fn stylesheet(&self) -> String {
        stylesheet(&self.config)
    }

    pub fn index_page(&self) -> Markup {
        render_index(&self.config, &self.registry)
    }

    pub fn not_found_page(&self) -> Markup {
        render_not_found(&self.config)
    }

    /// Resolve and render the chapter at `index`.
    pub fn chapter_page(&self, index: usize) -> Result<Option<Markup>, ContentError> {
        let Some(chapter) = self.registry.get(index) else {
            return Ok(None);
        };
        let content = self.resolver.resolve(chapter)?;
        Ok(Some(render_chapter_page(
            &self.config,
            &self.registry,
            index,
            content.as_ref(),
        )))
    }
}

/// How a chapter's content resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentState {
    /// Content file found and compiled
    Ready { file: String, widgets: Vec<String> },
    /// No content file yet; the page shows a placeholder
    Pending,
    /// Lookup or compilation failed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterStatus {
    pub number: u32,
    pub id: String,
    pub slug: String,
    pub title: String,
    pub state: ContentState,
    /// Registry sections whose anchor the content does not define
    pub missing_sections: Vec<String>,
}

impl ChapterStatus {
    fn new(chapter: &Chapter, state: ContentState) -> Self {
        Self {
            number: chapter.number,
            id: chapter.id.clone(),
            slug: chapter.slug.clone(),
            title: chapter.localized_title.clone(),
            state,
            missing_sections: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct BuildReport {
    pub output: PathBuf,
    pub chapters: Vec<ChapterStatus>,
    pub assets: usize,
}

#[derive(Debug)]
pub struct CheckReport {
    pub chapters: Vec<ChapterStatus>,
}

impl CheckReport {
    pub fn failures(&self) -> usize {
        self.chapters
            .iter()
            .filter(|c| matches!(c.state, ContentState::Failed(_)))
            .count()
    }
}

/// Section slugs of `chapter` that `content` has no heading anchor for.
fn missing_sections(chapter: &Chapter, content: &CompiledContent) -> Vec<String> {
    let missing: Vec<String> = chapter
        .sections
        .iter()
        .filter(|s| !content.has_anchor(&s.slug))
        .map(|s| s.slug.clone())
        .collect();
    for slug in &missing {
        tracing::warn!("{}: no heading with anchor #{}", chapter.id, slug);
    }
    missing
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build the static site from `source` into `output`.
///
/// Any content error aborts the build.
pub fn generate(source: &Path, output: &Path) -> Result<BuildReport, GenerateError> {
    let site = Site::load(source)?;
    fs::create_dir_all(output)?;

    fs::write(output.join("style.css"), site.stylesheet())?;
    fs::write(output.join("site.js"), JS)?;
    fs::write(output.join("index.html"), site.index_page().into_string())?;
    fs::write(output.join("404.html"), site.not_found_page().into_string())?;

    let chapters = site
        .registry
        .chapters()
        .par_iter()
        .enumerate()
        .map(|(index, chapter)| build_chapter(&site, index, chapter, output))
        .collect::<Result<Vec<_>, _>>()?;

    let assets = copy_assets(&site.assets_dir(), &output.join(ASSETS_DIR))?;

    tracing::info!(
        "site generated at {} ({} chapters, {} assets)",
        output.display(),
        chapters.len(),
        assets
    );
    Ok(BuildReport {
        output: output.to_path_buf(),
        chapters,
        assets,
    })
}

fn build_chapter(
    site: &Site,
    index: usize,
    chapter: &Chapter,
    output: &Path,
) -> Result<ChapterStatus, GenerateError> {
    let resolved = site.resolver.resolve_with_path(chapter)?;
    let content = resolved.as_ref().map(|(_, content)| content);

    let html = render_chapter_page(&site.config, &site.registry, index, content);
    let dir = output.join("chapter").join(&chapter.slug);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("index.html"), html.into_string())?;

    let status = match &resolved {
        Some((path, content)) => ready_status(chapter, path, content),
        None => {
            tracing::debug!("{}: content pending", chapter.id);
            ChapterStatus::new(chapter, ContentState::Pending)
        }
    };
    tracing::debug!("generated chapter/{}/index.html", chapter.slug);
    Ok(status)
}

/// Resolve every chapter without writing anything.
///
/// Unlike [`generate`], failures are collected per chapter so one run
/// reports all of them.
pub fn check(source: &Path) -> Result<CheckReport, GenerateError> {
    let site = Site::load(source)?;
    let chapters = site
        .registry
        .chapters()
        .par_iter()
        .map(|chapter| check_chapter(&site.resolver, chapter))
        .collect();
    Ok(CheckReport { chapters })
}

fn check_chapter(resolver: &ContentResolver, chapter: &Chapter) -> ChapterStatus {
    match resolver.resolve_with_path(chapter) {
        Ok(Some((path, content))) => ready_status(chapter, &path, &content),
        Ok(None) => ChapterStatus::new(chapter, ContentState::Pending),
        Err(e) => ChapterStatus::new(chapter, ContentState::Failed(e.to_string())),
    }
}

fn ready_status(chapter: &Chapter, path: &Path, content: &CompiledContent) -> ChapterStatus {
    let mut status = ChapterStatus::new(
        chapter,
        ContentState::Ready {
            file: file_name(path),
            widgets: content.widgets.clone(),
        },
    );
    status.missing_sections = missing_sections(chapter, content);
    status
}

/// Copy `src` recursively into `dst`. A missing `src` copies nothing.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Color variables, base styles and highlight themes in one stylesheet.
pub fn stylesheet(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC,
        highlight::theme_css()
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(config: &SiteConfig, title: &str, head: Markup, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/style.css";
                (head)
            }
            body {
                (site_header(config))
                (content)
                (site_footer(config))
                script src="/site.js" defer {}
            }
        }
    }
}

fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (config.title) }
        }
    }
}

fn site_footer(config: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p { (config.title) " · " (config.tagline) }
        }
    }
}

/// JS string literal safe to embed in a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// Module script loading the diagram renderer.
///
/// Each diagram is parsed first; one the renderer rejects is swapped for
/// the same error box a diagram failing validation at build time gets.
fn diagram_script(config: &SiteConfig) -> Markup {
    let src = js_string(&config.diagrams.script);
    let theme = js_string(&config.diagrams.theme);
    let failure = js_string(&config.labels.diagram_error);
    html! {
        script type="module" {
            (PreEscaped(format!(r#"import mermaid from {src};
mermaid.initialize({{ startOnLoad: false, theme: {theme} }});
for (const node of document.querySelectorAll("pre.mermaid")) {{
  if (await mermaid.parse(node.textContent, {{ suppressErrors: true }})) continue;
  const box = document.createElement("div");
  box.className = "widget-error";
  box.setAttribute("role", "alert");
  box.dataset.widget = "{name}";
  const message = document.createElement("p");
  message.textContent = {failure};
  box.append(message);
  (node.closest(".mermaid-container") ?? node).replaceWith(box);
}}
await mermaid.run({{ querySelector: "pre.mermaid", suppressErrors: true }});"#,
                name = mermaid::NAME,
            )))
        }
    }
}

fn difficulty(level: u8) -> Markup {
    html! {
        span.difficulty title={ (level) "/5" } aria-label={ "difficulty " (level) " of 5" } {
            (difficulty_dots(level))
        }
    }
}

/// Renders the chapter list in the sidebar, marking the current chapter
pub fn render_sidebar(config: &SiteConfig, registry: &Registry, current: &Chapter) -> Markup {
    let percent = registry.progress_percent(current);
    html! {
        aside.sidebar {
            nav.sidebar-nav aria-label=(config.labels.chapters_heading) {
                ol.sidebar-chapters {
                    @for chapter in registry.chapters() {
                        @let is_current = chapter.slug == current.slug;
                        li class=[is_current.then_some("current")] {
                            a href=(chapter.href()) aria-current=[is_current.then_some("page")] {
                                span.chapter-number { (chapter.number_label()) }
                                span.chapter-name { (chapter.localized_title) }
                            }
                            @if is_current && !chapter.sections.is_empty() {
                                ul.sidebar-sections {
                                    @for section in &chapter.sections {
                                        li {
                                            a href={ "#" (section.slug) } { (section.title) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div.progress {
                div.progress-label {
                    span { (config.labels.progress) }
                    span.progress-value { (percent) "%" }
                }
                div.progress-track role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow=(percent) {
                    div.progress-bar style={ "width: " (percent) "%" } {}
                }
            }
        }
    }
}

fn chapter_header(config: &SiteConfig, chapter: &Chapter) -> Markup {
    html! {
        header.chapter-header {
            p.chapter-meta {
                span.chapter-label { (config.labels.chapter) " " (chapter.number_label()) }
                " • "
                span.duration { (chapter.duration) }
                " • "
                (difficulty(chapter.difficulty))
            }
            h1 { (chapter.localized_title) }
            p.canonical-title { (chapter.title) }
            p.chapter-description { (chapter.description) }
        }
    }
}

fn pending_placeholder(config: &SiteConfig, chapter: &Chapter) -> Markup {
    let pattern = match &chapter.file {
        Some(file) => format!("{}/{}", config.content_dir, file),
        None => format!("{}/{}-*.md", config.content_dir, chapter.id),
    };
    html! {
        div.content-pending {
            p.pending-title { (config.labels.pending) }
            p.pending-hint {
                (config.labels.pending_hint) " "
                code { (pattern) }
            }
        }
    }
}

fn chapter_nav(config: &SiteConfig, registry: &Registry, index: usize) -> Markup {
    let neighbors = registry.neighbors(index);
    html! {
        nav.chapter-nav {
            @if let Some(prev) = neighbors.prev {
                a.nav-prev href=(prev.href()) rel="prev" {
                    span.nav-label { "← " (config.labels.previous) }
                    span.nav-title { (prev.localized_title) }
                }
            } @else {
                span.nav-spacer {}
            }
            @match neighbors.next {
                Some(next) => {
                    a.nav-next href=(next.href()) rel="next" {
                        span.nav-label { (config.labels.next) " →" }
                        span.nav-title { (next.localized_title) }
                    }
                }
                None => {
                    a.nav-complete href="/" { (config.labels.complete) }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page: hero and chapter cards
pub fn render_index(config: &SiteConfig, registry: &Registry) -> Markup {
    let content = html! {
        main.index-page {
            section.hero {
                h1 { (config.title) }
                p.tagline { (config.tagline) }
                div.hero-actions {
                    a.button.primary href=(registry.first().href()) { (config.labels.start) }
                    a.button href="#chapters" { (config.labels.contents) }
                }
            }
            section id="chapters" {
                h2 { (config.labels.chapters_heading) }
                ol.chapter-grid {
                    @for chapter in registry.chapters() {
                        li.chapter-card {
                            a href=(chapter.href()) {
                                span.chapter-number { (chapter.number_label()) }
                                h3 { (chapter.localized_title) }
                                p.canonical-title { (chapter.title) }
                                p.chapter-description { (chapter.description) }
                                div.card-meta {
                                    span.duration { (chapter.duration) }
                                    (difficulty(chapter.difficulty))
                                }
                                span.read-more { (config.labels.read_chapter) }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(config, &config.title, html! {}, content)
}

/// Renders a chapter page. `content` is `None` while the chapter has no
/// content file.
pub fn render_chapter_page(
    config: &SiteConfig,
    registry: &Registry,
    index: usize,
    content: Option<&CompiledContent>,
) -> Markup {
    let Some(chapter) = registry.get(index) else {
        return render_not_found(config);
    };
    let title = format!("{} | {}", chapter.localized_title, config.title);
    let uses_diagrams = content.is_some_and(|c| c.uses_widget(mermaid::NAME));

    let head = html! {
        meta name="description" content=(chapter.description);
        @if uses_diagrams {
            (diagram_script(config))
        }
    };

    let body = html! {
        div.chapter-layout {
            (render_sidebar(config, registry, chapter))
            main.chapter-page {
                (chapter_header(config, chapter))
                section.learning-goals {
                    h2 { (config.labels.learning_goals) }
                    p { (chapter.description) }
                }
                @match content {
                    Some(content) => {
                        article.chapter-content {
                            (PreEscaped(&content.html))
                        }
                    }
                    None => { (pending_placeholder(config, chapter)) }
                }
                (chapter_nav(config, registry, index))
            }
        }
    };

    base_document(config, &title, head, body)
}

pub fn render_not_found(config: &SiteConfig) -> Markup {
    let content = html! {
        main.not-found {
            h1 { "404" }
            p { (config.labels.not_found) }
            a.button href="/" { (config.labels.home) }
        }
    };
    base_document(config, &format!("404 | {}", config.title), html! {}, content)
}

/// Page shown by the preview server when a chapter fails to compile.
pub fn render_error_page(config: &SiteConfig, message: &str) -> Markup {
    let content = html! {
        main.error-page {
            h1 { "500" }
            pre.error-message { (message) }
        }
    };
    base_document(config, &format!("500 | {}", config.title), html! {}, content)
}

// ============================================================================
// Tests
// ============================================================================
