//! Content resolution: chapter identifier → compiled HTML.
//!
//! Finds the content file of a chapter in the content directory, splits off
//! its frontmatter, expands widget placeholders and renders the Markdown.
//! Nothing is cached; every call reads the file again, so edits show up on
//! the next request of the preview server.
//!
//! ## Lookup
//!
//! A chapter's file is the single `.md`/`.mdx` file whose name starts with the
//! chapter id followed by a delimiter (see [`crate::naming`]). A chapter may
//! name its file explicitly with `file = "…"` in `chapters.toml`.
//!
//! Lookup has three outcomes that callers must keep apart:
//!
//! | Outcome | Result | Page shows |
//! |---------|--------|------------|
//! | one match | `Ok(Some(content))` | compiled content |
//! | no match | `Ok(None)` | "content pending" placeholder |
//! | unreadable dir/file, several matches, malformed document | `Err(_)` | error page |
//!
//! ## Compilation
//!
//! 1. Frontmatter is split off and parsed as YAML.
//! 2. Component tags of registered widgets are rendered and swapped for
//!    HTML comment markers, so the Markdown parser sees a plain HTML block.
//! 3. The body is rendered with tables, footnotes, strikethrough, task lists
//!    and `{#id}` heading attributes. Headings without an explicit id get a
//!    GitHub-style slug.
//! 4. Fenced blocks whose language is a widget fence (`mermaid`,
//!    `playground`) go through that widget; other fenced blocks are
//!    syntax-highlighted.

use crate::frontmatter;
use crate::highlight;
use crate::naming::{Slugger, matches_identifier, parse_content_name};
use crate::registry::Chapter;
use crate::types::{CompiledContent, Heading};
use crate::widgets::{Props, TagError, Widget, WidgetRegistry, find_tags};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MARKER_PREFIX: &str = "<!--chapterbook-widget-";
const MARKER_SUFFIX: &str = "-->";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot list content directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("chapter '{id}' matches several content files: {}", files.join(", "))]
    Ambiguous { id: String, files: Vec<String> },
    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
    #[error("malformed widget tag, {0}")]
    Malformed(#[from] TagError),
    #[error("{}: {source}", path.display())]
    Compile {
        path: PathBuf,
        source: Box<ContentError>,
    },
}

/// Locates and compiles chapter content files.
#[derive(Debug)]
pub struct ContentResolver {
    dir: PathBuf,
    widgets: WidgetRegistry,
}

impl ContentResolver {
    pub fn new(dir: impl Into<PathBuf>, widgets: WidgetRegistry) -> Self {
        Self {
            dir: dir.into(),
            widgets,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the content file for a chapter identifier.
    ///
    /// The directory listing is sorted, so the result does not depend on
    /// the order the filesystem returns entries in.
    pub fn locate_id(&self, id: &str) -> Result<Option<PathBuf>, ContentError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| ContentError::ReadDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ContentError::ReadDir {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(parsed) = parse_content_name(&file_name)
                && matches_identifier(&parsed.stem, id)
            {
                matches.push(file_name);
            }
        }
        matches.sort();

        match matches.len() {
            0 => {
                tracing::debug!("no content file for {} in {}", id, self.dir.display());
                Ok(None)
            }
            1 => {
                let path = self.dir.join(&matches[0]);
                tracing::debug!("{} → {}", id, path.display());
                Ok(Some(path))
            }
            _ => Err(ContentError::Ambiguous {
                id: id.to_string(),
                files: matches,
            }),
        }
    }

    /// Find a chapter's content file, honouring an explicit `file` override.
    pub fn locate(&self, chapter: &Chapter) -> Result<Option<PathBuf>, ContentError> {
        match &chapter.file {
            Some(file) => {
                let path = self.dir.join(file);
                if path.is_file() {
                    Ok(Some(path))
                } else {
                    tracing::debug!(
                        "{}: configured file {} does not exist",
                        chapter.id,
                        path.display()
                    );
                    Ok(None)
                }
            }
            None => self.locate_id(&chapter.id),
        }
    }

    /// Locate, read and compile the content for a chapter identifier.
    ///
    /// `Ok(None)` means the chapter has no content file yet.
    pub fn resolve_id(&self, id: &str) -> Result<Option<CompiledContent>, ContentError> {
        match self.locate_id(id)? {
            Some(path) => self.compile_file(&path).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`resolve_id`](Self::resolve_id), honouring the chapter's `file`.
    pub fn resolve(&self, chapter: &Chapter) -> Result<Option<CompiledContent>, ContentError> {
        Ok(self.resolve_with_path(chapter)?.map(|(_, content)| content))
    }

    /// [`resolve`](Self::resolve), also returning the file the content came
    /// from.
    pub fn resolve_with_path(
        &self,
        chapter: &Chapter,
    ) -> Result<Option<(PathBuf, CompiledContent)>, ContentError> {
        match self.locate(chapter)? {
            Some(path) => {
                let content = self.compile_file(&path)?;
                Ok(Some((path, content)))
            }
            None => Ok(None),
        }
    }

    fn compile_file(&self, path: &Path) -> Result<CompiledContent, ContentError> {
        let source = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.compile(&source).map_err(|e| ContentError::Compile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Compile a content document.
    pub fn compile(&self, source: &str) -> Result<CompiledContent, ContentError> {
        let split = frontmatter::split(source);
        let frontmatter = match split.yaml {
            Some(yaml) => frontmatter::parse(yaml)?,
            None => Default::default(),
        };

        let mut used = BTreeSet::new();
        let (body, rendered) = self.expand_tags(split.body, split.body_line, &mut used)?;

        let mut events: Vec<Event> = Parser::new_ext(&body, markdown_options()).collect();
        let headings = assign_heading_ids(&mut events);
        let events = self.replace_blocks(events, &rendered, &mut used);

        let mut html = String::with_capacity(body.len() * 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        Ok(CompiledContent {
            html,
            frontmatter,
            headings,
            widgets: used.into_iter().collect(),
        })
    }

    /// Render component tags and swap each for a marker comment. Returns the
    /// rewritten body and the rendered HTML per marker.
    ///
    /// A tag preceded on its line only by container markers (`>`, list
    /// bullets, indentation) becomes an HTML block inside that container;
    /// a tag after text stays inline. `first_line` is the file line the
    /// body starts on, for error messages.
    fn expand_tags(
        &self,
        body: &str,
        first_line: usize,
        used: &mut BTreeSet<String>,
    ) -> Result<(String, Vec<String>), ContentError> {
        let tags = find_tags(body, |name| self.widgets.get(name).is_some())
            .map_err(|e| e.offset(first_line - 1))?;
        if tags.is_empty() {
            return Ok((body.to_string(), Vec::new()));
        }

        let mut out = String::with_capacity(body.len());
        let mut rendered = Vec::with_capacity(tags.len());
        let mut last = 0;

        for tag in tags {
            let Some(widget) = self.widgets.get(&tag.name) else {
                continue;
            };
            let mut props = tag.props;
            if let Some(children) = tag.children {
                props
                    .entry(widget.body_prop().to_string())
                    .or_insert(children);
            }

            let marker = format!("{MARKER_PREFIX}{}{MARKER_SUFFIX}", rendered.len());
            let line_start = body[..tag.start].rfind('\n').map_or(0, |i| i + 1);
            // A tag ending earlier on the same line counts as text.
            let prefix = (line_start >= last)
                .then(|| continuation(&body[line_start..tag.start]))
                .flatten();
            out.push_str(&body[last..tag.start]);
            match prefix {
                Some(prefix) => out.push_str(&format!("\n{prefix}{marker}\n{prefix}")),
                None => out.push_str(&marker),
            }
            rendered.push(self.widgets.render(widget, &props).into_string());
            used.insert(widget.name().to_string());
            last = tag.end;
        }
        out.push_str(&body[last..]);
        Ok((out, rendered))
    }

    /// Swap markers for widget HTML and render fenced code blocks.
    fn replace_blocks<'a>(
        &self,
        events: Vec<Event<'a>>,
        rendered: &[String],
        used: &mut BTreeSet<String>,
    ) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut code: Option<(String, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let info = match kind {
                        CodeBlockKind::Fenced(info) => info.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((info, String::new()));
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, buf)) = code.as_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((info, text)) = code.take() {
                        let html = self.render_code_block(&info, &text, used);
                        out.push(Event::Html(CowStr::from(html)));
                    }
                }
                Event::Html(html) | Event::InlineHtml(html)
                    if marker_index(&html).is_some_and(|i| i < rendered.len()) =>
                {
                    if let Some(i) = marker_index(&html) {
                        out.push(Event::Html(CowStr::from(rendered[i].clone())));
                    }
                }
                other => out.push(other),
            }
        }
        out
    }

    fn render_code_block(&self, info: &str, text: &str, used: &mut BTreeSet<String>) -> String {
        let mut words = info.split_whitespace();
        let lang = words.next().unwrap_or_default().to_lowercase();

        match self.widgets.by_fence(&lang) {
            Some(widget) => {
                used.insert(widget.name().to_string());
                let props = fence_props(widget, words, text);
                self.widgets.render(widget, &props).into_string()
            }
            None => highlight::code_block(text, &lang).into_string(),
        }
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Line prefix that keeps a block inside the containers `prefix` opens.
///
/// `>` and indentation are kept and list markers become spaces of the same
/// width. `None` when the prefix holds anything else, such as text.
fn continuation(prefix: &str) -> Option<String> {
    let mut out = String::with_capacity(prefix.len());
    let mut rest = prefix;
    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];
        match c {
            '>' | ' ' | '\t' => {
                out.push(c);
                rest = after;
            }
            '-' | '*' | '+' if after.starts_with([' ', '\t']) => {
                out.push(' ');
                rest = after;
            }
            '0'..='9' => {
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                let delim = &rest[digits..];
                if !(delim.starts_with(['.', ')']) && delim[1..].starts_with([' ', '\t'])) {
                    return None;
                }
                out.push_str(&" ".repeat(digits + 1));
                rest = &delim[1..];
            }
            _ => return None,
        }
    }
    Some(out)
}

fn marker_index(html: &str) -> Option<usize> {
    html.trim()
        .strip_prefix(MARKER_PREFIX)?
        .strip_suffix(MARKER_SUFFIX)?
        .parse()
        .ok()
}

/// Props of a fenced widget block: `key=value` words after the fence
/// language, and the block text as the widget body.
///
/// ```text
/// ```playground language=javascript height=200
/// ```
fn fence_props<'w>(widget: &dyn Widget, words: impl Iterator<Item = &'w str>, text: &str) -> Props {
    let mut props: Props = words
        .filter_map(|word| word.split_once('='))
        .map(|(k, v)| (k.to_string(), v.trim_matches(['"', '\'']).to_string()))
        .collect();
    props.insert(widget.body_prop().to_string(), text.to_string());
    props
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Give every heading an id and collect the document outline.
///
/// Explicit `{#id}` ids are reserved first so generated slugs never take
/// them.
fn assign_heading_ids(events: &mut [Event]) -> Vec<Heading> {
    let mut slugger = Slugger::new();
    for event in events.iter() {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            slugger.reserve(id);
        }
    }

    let mut headings = Vec::new();
    let mut i = 0;
    while i < events.len() {
        let Event::Start(Tag::Heading { level, id, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let level = *level;
        let explicit = id.as_ref().map(|id| id.to_string());

        let mut text = String::new();
        let mut j = i + 1;
        while j < events.len() {
            match &events[j] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            j += 1;
        }
        let text = text.trim().to_string();
        let id = explicit.unwrap_or_else(|| slugger.slug(&text));

        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[i] {
            *slot = Some(CowStr::from(id.clone()));
        }
        headings.push(Heading {
            level: heading_level(level),
            id,
            text,
        });
        i = j;
    }
    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::*;

    fn resolver(dir: &Path) -> ContentResolver {
        ContentResolver::new(dir, WidgetRegistry::with_builtins(&SiteConfig::default()))
    }

    fn compile(source: &str) -> CompiledContent {
        let tmp = content_dir(&[]);
        resolver(tmp.path()).compile(source).unwrap()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[test]
    fn missing_file_is_none() {
        let tmp = content_dir(&[("ch02-other.md", "# Other")]);
        assert!(resolver(tmp.path()).resolve_id("ch01").unwrap().is_none());
    }

    #[test]
    fn matching_file_compiles() {
        let tmp = content_dir(&[("ch01-why-typescript.mdx", "# Why\n\nBecause.")]);
        let content = resolver(tmp.path()).resolve_id("ch01").unwrap().unwrap();
        assert!(content.html.contains("<h1 id=\"why\">Why</h1>"));
        assert!(content.html.contains("<p>Because.</p>"));
    }

    #[test]
    fn exact_stem_matches() {
        let tmp = content_dir(&[("ch01.md", "x")]);
        let path = resolver(tmp.path()).locate_id("ch01").unwrap().unwrap();
        assert!(path.ends_with("ch01.md"));
    }

    #[test]
    fn ch1_does_not_match_ch10() {
        let tmp = content_dir(&[("ch10-generics.md", "# Ten")]);
        let r = resolver(tmp.path());
        assert!(r.locate_id("ch1").unwrap().is_none());
        assert!(r.locate_id("ch10").unwrap().is_some());
    }

    #[test]
    fn non_content_and_hidden_files_are_ignored() {
        let tmp = content_dir(&[
            ("ch01-notes.txt", "x"),
            (".ch01-draft.md", "x"),
            ("ch01-intro.md.bak", "x"),
        ]);
        assert!(resolver(tmp.path()).locate_id("ch01").unwrap().is_none());
    }

    #[test]
    fn ambiguous_match_is_error() {
        let tmp = content_dir(&[("ch01-a.md", "a"), ("ch01-b.mdx", "b")]);
        match resolver(tmp.path()).locate_id("ch01") {
            Err(ContentError::Ambiguous { id, files }) => {
                assert_eq!(id, "ch01");
                assert_eq!(files, vec!["ch01-a.md", "ch01-b.mdx"]);
            }
            other => panic!("expected ambiguity error, got {other:?}"),
        }
    }

    #[test]
    fn missing_directory_is_error() {
        let tmp = content_dir(&[]);
        let r = resolver(&tmp.path().join("nope"));
        assert!(matches!(
            r.resolve_id("ch01"),
            Err(ContentError::ReadDir { .. })
        ));
    }

    #[test]
    fn file_override_wins() {
        let tmp = content_dir(&[("intro.md", "# Intro"), ("ch01-old.md", "# Old")]);
        let mut ch = chapter("ch01", 1, "first");
        ch.file = Some("intro.md".into());
        let content = resolver(tmp.path()).resolve(&ch).unwrap().unwrap();
        assert!(content.html.contains("Intro"));
    }

    #[test]
    fn missing_override_is_pending() {
        let tmp = content_dir(&[("ch01-old.md", "# Old")]);
        let mut ch = chapter("ch01", 1, "first");
        ch.file = Some("gone.md".into());
        assert!(resolver(tmp.path()).resolve(&ch).unwrap().is_none());
    }

    #[test]
    fn resolve_with_path_returns_the_source_file() {
        let tmp = content_dir(&[("ch01-why.md", "# Why")]);
        let (path, content) = resolver(tmp.path())
            .resolve_with_path(&chapter("ch01", 1, "first"))
            .unwrap()
            .unwrap();
        assert!(path.ends_with("ch01-why.md"));
        assert!(content.html.contains("Why"));
    }

    #[test]
    fn compile_error_names_the_file() {
        let tmp = content_dir(&[("ch01-bad.md", "---\ntitle: [unclosed\n---\nbody")]);
        let err = resolver(tmp.path()).resolve_id("ch01").unwrap_err();
        assert!(matches!(err, ContentError::Compile { .. }));
        assert!(err.to_string().contains("ch01-bad.md"));
    }

    // =========================================================================
    // Frontmatter
    // =========================================================================

    #[test]
    fn frontmatter_is_parsed_and_stripped() {
        let content = compile("---\ntitle: 왜 TypeScript인가?\nlevel: 1\n---\n# Body\n");
        assert_eq!(content.frontmatter.title.as_deref(), Some("왜 TypeScript인가?"));
        assert!(content.frontmatter.extra.contains_key("level"));
        assert!(!content.html.contains("title:"));
    }

    #[test]
    fn numeric_frontmatter_title_compiles() {
        let content = compile("---\ntitle: 2024\n---\nbody\n");
        assert_eq!(content.frontmatter.title.as_deref(), Some("2024"));
        assert!(content.html.contains("<p>body</p>"));
    }

    #[test]
    fn no_frontmatter_is_empty() {
        assert!(compile("# Just a body").frontmatter.is_empty());
    }

    // =========================================================================
    // Headings
    // =========================================================================

    #[test]
    fn custom_heading_id_overrides_slug() {
        let content = compile("## Type Erasure {#erasure}\n");
        assert!(content.html.contains(r#"<h2 id="erasure">Type Erasure</h2>"#));
        assert_eq!(find_heading(&content, "Type Erasure").id, "erasure");
    }

    #[test]
    fn korean_heading_keeps_letters() {
        let content = compile("## 타입 에러의 비용\n");
        assert_eq!(heading_ids(&content), vec!["타입-에러의-비용"]);
    }

    #[test]
    fn duplicate_headings_get_suffixes() {
        let content = compile("## Example\n\n## Example\n\n## Example\n");
        assert_eq!(heading_ids(&content), vec!["example", "example-1", "example-2"]);
    }

    #[test]
    fn generated_slug_avoids_explicit_id() {
        let content = compile("## Setup\n\n## Install {#setup}\n");
        assert_eq!(heading_ids(&content), vec!["setup-1", "setup"]);
    }

    #[test]
    fn heading_text_includes_inline_code() {
        let content = compile("### The `any` type\n");
        let h = find_heading(&content, "The any type");
        assert_eq!(h.level, 3);
        assert_eq!(h.id, "the-any-type");
    }

    // =========================================================================
    // GFM and code
    // =========================================================================

    #[test]
    fn gfm_extensions() {
        let content = compile("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n");
        assert!(content.html.contains("<table>"));
        assert!(content.html.contains("<del>old</del>"));
        assert!(content.html.contains("type=\"checkbox\""));
    }

    #[test]
    fn fenced_code_is_highlighted() {
        let content = compile("```ts\nconst x: number = 1;\n```\n");
        assert!(content.html.contains(r#"class="hljs language-ts""#));
        assert!(content.html.contains("hl-"));
        assert!(content.widgets.is_empty());
    }

    #[test]
    fn indented_code_is_plain() {
        let content = compile("para\n\n    let a = <b>;\n");
        assert!(content.html.contains(r#"<code class="hljs">"#));
        assert!(content.html.contains("&lt;b&gt;"));
    }

    // =========================================================================
    // Widgets
    // =========================================================================

    #[test]
    fn valid_mermaid_tag_renders_diagram() {
        let content = compile("Intro\n\n<Mermaid chart={`\ngraph TD\n  A --> B\n`} />\n\nOutro\n");
        assert!(content.html.contains(r#"<pre class="mermaid">"#));
        assert!(content.html.contains("<p>Intro</p>"));
        assert!(content.html.contains("<p>Outro</p>"));
        assert!(content.uses_widget("Mermaid"));
    }

    #[test]
    fn invalid_mermaid_reports_failure_inline() {
        let content = compile("<Mermaid chart=\"nonsense here\" />\n\n## Still here\n");
        assert!(content.html.contains("다이어그램 렌더링에 실패했습니다."));
        assert!(content.html.contains("Still here"));
    }

    #[test]
    fn mermaid_fence_renders_diagram() {
        let content = compile("```mermaid\nsequenceDiagram\n  A->>B: hi\n```\n");
        assert!(content.html.contains(r#"data-diagram="sequenceDiagram""#));
        assert!(content.html.contains("A-&gt;&gt;B: hi"));
        assert!(!content.html.contains("language-mermaid"));
        assert!(content.uses_widget("Mermaid"));
    }

    #[test]
    fn paired_mermaid_tag_uses_children() {
        let content = compile("<Mermaid>\npie title Pets\n  \"Dogs\" : 3\n</Mermaid>\n");
        assert!(content.html.contains(r#"data-diagram="pie""#));
    }

    #[test]
    fn playground_tag_renders_editor() {
        let content = compile(
            "<CodePlayground initialCode={`let x: number = 1;`} height=\"200px\" />\n",
        );
        assert!(content.html.contains(r#"class="code-playground""#));
        assert!(content.html.contains("height: 200px;"));
        assert!(content.html.contains("let x: number = 1;"));
        assert_eq!(content.widgets, vec!["CodePlayground"]);
    }

    #[test]
    fn playground_fence_takes_info_props() {
        let content = compile("```playground language=javascript height=150\nconsole.log(1)\n```\n");
        assert!(content.html.contains("Playground.js"));
        assert!(content.html.contains("height: 150px;"));
        assert!(content.html.contains("console.log(1)"));
    }

    #[test]
    fn tags_in_code_are_not_widgets() {
        let content = compile("```tsx\n<Mermaid chart=\"graph TD\" />\n```\n");
        assert!(content.widgets.is_empty());
        assert!(!content.html.contains("<Mermaid"));
        assert!(!content.html.contains("mermaid-container"));
    }

    #[test]
    fn unterminated_tag_is_malformed() {
        let tmp = content_dir(&[]);
        let err = resolver(tmp.path())
            .compile("# T\n\n<Mermaid chart={`graph TD\n")
            .unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn malformed_tag_line_counts_frontmatter() {
        let tmp = content_dir(&[]);
        let err = resolver(tmp.path())
            .compile("---\ntitle: T\ndescription: D\n---\n# T\n\n<Mermaid chart={`graph TD\n")
            .unwrap_err();
        assert!(err.to_string().contains("line 7"), "{err}");
    }

    #[test]
    fn widget_stays_inside_blockquote() {
        let content = compile("> Note\n> <Mermaid chart=\"graph TD\" />\n> tail\n");
        let html = &content.html;
        assert_eq!(html.matches("<blockquote>").count(), 1, "{html}");
        let open = html.find("<blockquote>").unwrap();
        let diagram = html.find("mermaid-container").unwrap();
        let close = html.find("</blockquote>").unwrap();
        assert!(open < diagram && diagram < close, "{html}");
        assert!(html.contains("<p>Note</p>"));
        assert!(html.contains("<p>tail</p>"));
    }

    #[test]
    fn widget_stays_inside_list_item() {
        let content = compile("- first\n  <Mermaid chart=\"graph TD\" />\n- second\n");
        let html = &content.html;
        assert_eq!(html.matches("<ul>").count(), 1, "{html}");
        assert_eq!(html.matches("<li>").count(), 2, "{html}");
        let diagram = html.find("mermaid-container").unwrap();
        assert!(diagram < html.find("second").unwrap(), "{html}");
        assert!(diagram < html.find("</li>").unwrap(), "{html}");
    }

    #[test]
    fn widget_after_list_marker_fills_the_item() {
        let content = compile("1. <Mermaid chart=\"graph TD\" />\n2. next\n");
        let html = &content.html;
        assert_eq!(html.matches("<ol>").count(), 1, "{html}");
        assert!(html.find("mermaid-container").unwrap() < html.find("</li>").unwrap(), "{html}");
    }

    #[test]
    fn widget_after_text_stays_inline() {
        let content = compile("See <Mermaid chart=\"graph TD\" /> here\n");
        let html = &content.html;
        assert!(html.starts_with("<p>See "), "{html}");
        assert!(html.contains("mermaid-container"));
        assert!(html.contains(" here</p>"), "{html}");
    }

    #[test]
    fn container_prefixes() {
        assert_eq!(continuation(""), Some(String::new()));
        assert_eq!(continuation("> "), Some("> ".to_string()));
        assert_eq!(continuation("- "), Some("  ".to_string()));
        assert_eq!(continuation("> 10. "), Some(">     ".to_string()));
        assert_eq!(continuation("See "), None);
        assert_eq!(continuation("-x"), None);
    }

    #[test]
    fn widgets_are_sorted_and_deduplicated() {
        let content = compile(
            "<Mermaid chart=\"graph TD\" />\n\n<CodePlayground />\n\n```mermaid\npie\n```\n",
        );
        assert_eq!(content.widgets, vec!["CodePlayground", "Mermaid"]);
    }

    #[test]
    fn compile_is_deterministic() {
        let source = "---\ntitle: T\n---\n## A\n\n```ts\nlet a = 1;\n```\n\n<Mermaid chart=\"graph LR\" />\n";
        assert_eq!(compile(source), compile(source));
    }
}
