//! CLI output formatting for build, check and chapter listings.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every chapter is its semantic identity (number and title) with the
//! content file and generated page shown as secondary context on indented
//! lines. The output reads as a course inventory while still letting users
//! trace each page back to its source file.
//!
//! # Output Format
//!
//! ## Chapters
//!
//! ```text
//! 01 왜 TypeScript인가? (Why TypeScript?)
//!     Slug: why-typescript
//!     30분 • ●○○○○
//!     TypeScript가 필요한 이유
//!     Sections: #type-error-cost, #compile-time
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 01 왜 TypeScript인가? → chapter/why-typescript/index.html
//!     Source: ch01-why-typescript.mdx
//!     Widgets: Mermaid
//! 03 제네릭 → chapter/generics/index.html
//!     Pending: no content file
//! Not found → 404.html
//!
//! Generated 3 chapter pages (2 with content, 1 pending), 1 asset
//! ```
//!
//! ## Check
//!
//! ```text
//! 01 왜 TypeScript인가?
//!     Source: ch01-why-typescript.mdx
//! 02 TypeScript는 어떻게 동작하나?
//!     Error: chapter 'ch02' matches several content files: ch02-a.md, ch02-b.md
//!
//! Checked 3 chapters: 1 ready, 1 pending, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{BuildReport, ChapterStatus, CheckReport, ContentState};
use crate::registry::{Registry, difficulty_dots};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based chapter number as 2-digit zero-padded.
fn format_index(pos: u32) -> String {
    format!("{:0>2}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a chapter header: number + title, with optional detail.
///
/// ```text
/// 01 왜 TypeScript인가? (Why TypeScript?)
/// 01 왜 TypeScript인가? → chapter/why-typescript/index.html
/// ```
fn entity_header(number: u32, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} {}", format_index(number), title, d),
        None => format!("{} {}", format_index(number), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Context lines shared by build and check output.
fn status_lines(status: &ChapterStatus) -> Vec<String> {
    let mut lines = Vec::new();
    match &status.state {
        ContentState::Ready { file, widgets } => {
            lines.push(format!("{}Source: {}", indent(1), file));
            if !widgets.is_empty() {
                lines.push(format!("{}Widgets: {}", indent(1), widgets.join(", ")));
            }
        }
        ContentState::Pending => {
            lines.push(format!("{}Pending: no content file", indent(1)));
        }
        ContentState::Failed(message) => {
            lines.push(format!("{}Error: {}", indent(1), message));
        }
    }
    for slug in &status.missing_sections {
        lines.push(format!("{}Missing anchor: #{}", indent(1), slug));
    }
    lines
}

// ============================================================================
// Chapters
// ============================================================================

/// Format the chapter registry as an inventory.
pub fn format_chapters(registry: &Registry) -> Vec<String> {
    let mut lines = Vec::new();
    for chapter in registry.chapters() {
        let detail = format!("({})", chapter.title);
        lines.push(entity_header(chapter.number, &chapter.localized_title, Some(&detail)));
        lines.push(format!("{}Slug: {}", indent(1), chapter.slug));
        lines.push(format!(
            "{}{} • {}",
            indent(1),
            chapter.duration,
            difficulty_dots(chapter.difficulty)
        ));
        if !chapter.description.is_empty() {
            lines.push(format!("{}{}", indent(1), truncate_desc(&chapter.description, 60)));
        }
        if let Some(file) = &chapter.file {
            lines.push(format!("{}File: {}", indent(1), file));
        }
        if !chapter.sections.is_empty() {
            let anchors: Vec<String> = chapter
                .sections
                .iter()
                .map(|s| format!("#{}", s.slug))
                .collect();
            lines.push(format!("{}Sections: {}", indent(1), anchors.join(", ")));
        }
    }
    lines
}

/// Print the chapter registry to stdout.
pub fn print_chapters(registry: &Registry) {
    for line in format_chapters(registry) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a build.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Home → index.html".to_string()];

    for status in &report.chapters {
        let detail = format!("→ chapter/{}/index.html", status.slug);
        lines.push(entity_header(status.number, &status.title, Some(&detail)));
        lines.extend(status_lines(status));
    }
    lines.push("Not found → 404.html".to_string());

    let pending = report
        .chapters
        .iter()
        .filter(|c| c.state == ContentState::Pending)
        .count();
    let ready = report.chapters.len() - pending;

    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({} with content, {} pending), {}",
        plural(report.chapters.len(), "chapter page"),
        ready,
        pending,
        plural(report.assets, "asset")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of a content check.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut ready = 0;
    let mut pending = 0;

    for status in &report.chapters {
        match status.state {
            ContentState::Ready { .. } => ready += 1,
            ContentState::Pending => pending += 1,
            ContentState::Failed(_) => {}
        }
        lines.push(entity_header(status.number, &status.title, None));
        lines.extend(status_lines(status));
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {}: {} ready, {} pending, {} failed",
        plural(report.chapters.len(), "chapter"),
        ready,
        pending,
        report.failures()
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::path::PathBuf;

    fn status(number: u32, slug: &str, state: ContentState) -> ChapterStatus {
        ChapterStatus {
            number,
            id: format!("ch{:02}", number),
            slug: slug.to_string(),
            title: format!("챕터 {slug}"),
            state,
            missing_sections: Vec::new(),
        }
    }

    fn ready(file: &str, widgets: &[&str]) -> ContentState {
        ContentState::Ready {
            file: file.to_string(),
            widgets: widgets.iter().map(|w| w.to_string()).collect(),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_two() {
        assert_eq!(format_index(1), "01");
        assert_eq!(format_index(12), "12");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_counts_characters() {
        let text = "타입".repeat(30);
        let expected = format!("{}...", "타입".repeat(20));
        assert_eq!(truncate_desc(&text, 40), expected);
    }

    #[test]
    fn truncate_desc_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "asset"), "1 asset");
        assert_eq!(plural(0, "asset"), "0 assets");
    }

    // =========================================================================
    // Chapters
    // =========================================================================

    #[test]
    fn chapters_listing() {
        let registry = Registry::new(sample_chapters()).unwrap();
        let lines = format_chapters(&registry);
        assert_eq!(lines[0], "01 챕터 first (Chapter first)");
        assert_eq!(lines[1], "    Slug: first");
        assert_eq!(lines[2], "    30분 • ●●○○○");
        assert_eq!(lines[3], "    About first");
        assert_eq!(lines[4], "    Sections: #overview");
        assert_eq!(lines[5], "02 챕터 second (Chapter second)");
    }

    #[test]
    fn chapters_listing_shows_file_override() {
        let mut chapters = sample_chapters();
        chapters[0].file = Some("intro.md".into());
        let registry = Registry::new(chapters).unwrap();
        assert!(format_chapters(&registry).contains(&"    File: intro.md".to_string()));
    }

    // =========================================================================
    // Build
    // =========================================================================

    #[test]
    fn build_output() {
        let mut with_gap = status(2, "second", ready("ch02.md", &[]));
        with_gap.missing_sections = vec!["overview".into()];
        let report = BuildReport {
            output: PathBuf::from("dist"),
            chapters: vec![
                status(1, "first", ready("ch01-first.mdx", &["CodePlayground", "Mermaid"])),
                with_gap,
                status(3, "third", ContentState::Pending),
            ],
            assets: 1,
        };
        let lines = format_build_output(&report);
        assert_eq!(
            lines,
            vec![
                "Home → index.html",
                "01 챕터 first → chapter/first/index.html",
                "    Source: ch01-first.mdx",
                "    Widgets: CodePlayground, Mermaid",
                "02 챕터 second → chapter/second/index.html",
                "    Source: ch02.md",
                "    Missing anchor: #overview",
                "03 챕터 third → chapter/third/index.html",
                "    Pending: no content file",
                "Not found → 404.html",
                "",
                "Generated 3 chapter pages (2 with content, 1 pending), 1 asset",
            ]
        );
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_output_counts_states() {
        let report = CheckReport {
            chapters: vec![
                status(1, "first", ready("ch01.md", &[])),
                status(2, "second", ContentState::Failed("boom".into())),
                status(3, "third", ContentState::Pending),
            ],
        };
        let lines = format_check_output(&report);
        assert!(lines.contains(&"    Error: boom".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Checked 3 chapters: 1 ready, 1 pending, 1 failed"
        );
    }
}
