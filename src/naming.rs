//! Naming conventions shared by content lookup and page anchors.
//!
//! ## Content Files
//!
//! Each chapter's content lives in one file whose name starts with the
//! chapter identifier, followed by a delimiter and free-form words:
//!
//! - `ch01-why-typescript.mdx` → matches `ch01`
//! - `ch01.md` → matches `ch01`
//! - `ch10-generics.md` → matches `ch10`, never `ch1`
//!
//! Only `.md` and `.mdx` files count. Hidden files (`.ch01-draft.md`) and
//! editor leftovers are ignored.
//!
//! ## Anchors
//!
//! Heading anchors follow the GitHub convention: lowercase, punctuation
//! dropped, spaces become dashes, repeated anchors get `-1`, `-2`, …
//! suffixes. Letters outside ASCII are kept, so `타입 에러의 비용` becomes
//! `타입-에러의-비용`.

use std::collections::HashMap;

/// Extensions recognised as chapter content.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Result of parsing a content filename like `ch01-why-typescript.mdx`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Filename without extension (`ch01-why-typescript`)
    pub stem: String,
    /// Lowercased extension (`mdx`)
    pub extension: String,
}

/// Parse a filename as a content file.
///
/// Returns `None` for hidden files and files without a content extension.
pub fn parse_content_name(file_name: &str) -> Option<ParsedName> {
    if file_name.starts_with('.') {
        return None;
    }
    let (stem, ext) = file_name.rsplit_once('.')?;
    let extension = ext.to_ascii_lowercase();
    if stem.is_empty() || !CONTENT_EXTENSIONS.contains(&extension.as_str()) {
        return None;
    }
    Some(ParsedName {
        stem: stem.to_string(),
        extension,
    })
}

/// Whether a content stem belongs to the chapter `id`.
///
/// The stem must equal the identifier or continue it with `-`, `_` or `.`.
pub fn matches_identifier(stem: &str, id: &str) -> bool {
    if id.is_empty() {
        return false;
    }
    match stem.strip_prefix(id) {
        Some("") => true,
        Some(rest) => rest.starts_with(['-', '_', '.']),
        None => false,
    }
}

/// Turn heading text into an anchor slug (no deduplication).
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            slug.push(c);
        } else if c == ' ' {
            slug.push('-');
        }
    }
    slug
}

/// Stateful slug generator for one document.
///
/// Hands out unique anchors in document order. Explicit ids are reserved
/// first so generated anchors never collide with them.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, u32>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an explicit id (`## Title {#id}`).
    pub fn reserve(&mut self, id: &str) {
        self.occurrences.entry(id.to_string()).or_insert(0);
    }

    /// Unique slug for `text`.
    pub fn slug(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let mut candidate = base.clone();
        while self.occurrences.contains_key(&candidate) {
            let count = self.occurrences.entry(base.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_name_with_words() {
        let p = parse_content_name("ch01-why-typescript.mdx").unwrap();
        assert_eq!(p.stem, "ch01-why-typescript");
        assert_eq!(p.extension, "mdx");
    }

    #[test]
    fn content_name_uppercase_extension() {
        let p = parse_content_name("ch02.MD").unwrap();
        assert_eq!(p.stem, "ch02");
        assert_eq!(p.extension, "md");
    }

    #[test]
    fn non_content_files_are_skipped() {
        assert_eq!(parse_content_name("ch01-notes.txt"), None);
        assert_eq!(parse_content_name(".ch01-draft.md"), None);
        assert_eq!(parse_content_name("README"), None);
        assert_eq!(parse_content_name(".md"), None);
    }

    #[test]
    fn identifier_exact_and_delimited() {
        assert!(matches_identifier("ch01", "ch01"));
        assert!(matches_identifier("ch01-why-typescript", "ch01"));
        assert!(matches_identifier("ch01_intro", "ch01"));
        assert!(matches_identifier("ch01.draft", "ch01"));
    }

    #[test]
    fn identifier_is_not_a_bare_prefix() {
        assert!(!matches_identifier("ch10-generics", "ch1"));
        assert!(!matches_identifier("ch011", "ch01"));
        assert!(!matches_identifier("intro", "ch01"));
        assert!(!matches_identifier("ch01", ""));
    }

    #[test]
    fn slugify_ascii() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("What's new in 5.0?"), "whats-new-in-50");
        assert_eq!(slugify("  Union & Intersection "), "union--intersection");
    }

    #[test]
    fn slugify_keeps_korean() {
        assert_eq!(slugify("타입 에러의 비용"), "타입-에러의-비용");
        assert_eq!(slugify("IDE 설정 (VSCode)"), "ide-설정-vscode");
    }

    #[test]
    fn slugger_deduplicates() {
        let mut s = Slugger::new();
        assert_eq!(s.slug("Example"), "example");
        assert_eq!(s.slug("Example"), "example-1");
        assert_eq!(s.slug("Example"), "example-2");
    }

    #[test]
    fn slugger_avoids_reserved_ids() {
        let mut s = Slugger::new();
        s.reserve("summary");
        assert_eq!(s.slug("Summary"), "summary-1");
    }

    #[test]
    fn slugger_empty_heading() {
        let mut s = Slugger::new();
        assert_eq!(s.slug("!!!"), "section");
        assert_eq!(s.slug("???"), "section-1");
    }
}
