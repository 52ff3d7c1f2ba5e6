//! Shared test utilities for the chapterbook test suite.
//!
//! Provides registry builders, fixture setup, and lookups that panic with a
//! readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let registry = Registry::new(sample_chapters()).unwrap();
//! let tmp = content_dir(&[("ch01-first.md", "# Hello")]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::registry::{Chapter, Section};
use crate::types::{CompiledContent, Heading};

// =========================================================================
// Registry builders
// =========================================================================

/// A minimal valid chapter.
pub fn chapter(id: &str, number: u32, slug: &str) -> Chapter {
    Chapter {
        id: id.to_string(),
        number,
        title: format!("Chapter {slug}"),
        localized_title: format!("챕터 {slug}"),
        slug: slug.to_string(),
        description: format!("About {slug}"),
        duration: "30분".to_string(),
        difficulty: 2,
        sections: vec![Section {
            id: format!("{number}-1"),
            title: "Overview".to_string(),
            slug: "overview".to_string(),
        }],
        file: None,
    }
}

/// Three chapters: `ch01/first`, `ch02/second`, `ch03/third`.
pub fn sample_chapters() -> Vec<Chapter> {
    vec![
        chapter("ch01", 1, "first"),
        chapter("ch02", 2, "second"),
        chapter("ch03", 3, "third"),
    ]
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// A temp directory holding the given `(filename, body)` files.
pub fn content_dir(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, body) in files {
        std::fs::write(tmp.path().join(name), body).unwrap();
    }
    tmp
}

// =========================================================================
// Compiled content lookups
// =========================================================================

/// Find a heading by its text. Panics if not found.
pub fn find_heading<'a>(content: &'a CompiledContent, text: &str) -> &'a Heading {
    content
        .headings
        .iter()
        .find(|h| h.text == text)
        .unwrap_or_else(|| {
            let texts: Vec<&str> = content.headings.iter().map(|h| h.text.as_str()).collect();
            panic!("heading '{text}' not found. Available: {texts:?}")
        })
}

/// All heading ids in document order.
pub fn heading_ids(content: &CompiledContent) -> Vec<&str> {
    content.headings.iter().map(|h| h.id.as_str()).collect()
}
