//! # chapterbook
//!
//! A static site generator and preview server for chapter-based courses.
//! A fixed, ordered chapter registry drives the site; each chapter's content
//! is a Markdown file found on disk by its identifier and compiled on demand.
//!
//! # Architecture
//!
//! ```text
//! chapters.toml ─→ Registry ─┐
//!                            ├─→ page renderer ─→ dist/  (build)
//! chapters/*.md ─→ Resolver ─┘                 └→ HTTP   (serve)
//! ```
//!
//! A page request carries a chapter slug. The registry maps it to the chapter
//! and its position (for previous/next links and progress), the resolver
//! loads and compiles the matching content file, and the page renderer
//! embeds the result next to the navigation.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | Validated, immutable chapter table with slug/id lookups |
//! | [`content`] | Content file lookup by id prefix and Markdown compilation |
//! | [`frontmatter`] | YAML frontmatter splitting and parsing |
//! | [`widgets`] | Diagram and code-playground widgets behind a name → renderer registry |
//! | [`highlight`] | Class-based syntax highlighting for fenced code |
//! | [`generate`] | Maud page templates, static build and content check |
//! | [`serve`] | Axum preview server over the same templates |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Compiled content, headings, frontmatter |
//! | [`naming`] | Content filename matching and heading anchor slugs |
//! | [`output`] | CLI output formatting for build, check and chapter listings |
//!
//! # Design Decisions
//!
//! ## The Registry Is the Source of Truth
//!
//! Titles, order, durations and sections come from `chapters.toml`, never
//! from content files. A chapter without a content file still gets its page,
//! with a placeholder naming the file it expects. Frontmatter is parsed and
//! exposed but does not override registry data.
//!
//! ## Strict Prefix Matching
//!
//! A content file belongs to a chapter when its name is the chapter id
//! followed by `-`, `_`, `.` or the extension. `ch1` never picks up
//! `ch10-generics.md`, and two files claiming the same chapter are an error
//! rather than a silent first pick.
//!
//! ## Widgets Behind a Registry
//!
//! Widgets are looked up by tag name and fence language in a
//! [`widgets::WidgetRegistry`]. The resolver knows nothing about diagrams
//! or editors, so adding a widget means registering one more
//! [`widgets::Widget`] implementation. A widget that fails to render shows an
//! inline error box; the page around it still renders.
//!
//! ## No Caching
//!
//! The preview server reads and compiles content on every request. Courses
//! are small and compilation is fast, so an edit shows up on the next reload
//! without a watcher or cache invalidation.

pub mod config;
pub mod content;
pub mod frontmatter;
pub mod generate;
pub mod highlight;
pub mod naming;
pub mod output;
pub mod registry;
pub mod serve;
pub mod types;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_helpers;
