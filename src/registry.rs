//! The chapter registry.
//!
//! A course is a fixed, ordered list of chapters. The registry is loaded once
//! at startup from `chapters.toml` in the content root (or the stock course
//! compiled into the binary) and never changes afterwards.
//!
//! ## `chapters.toml`
//!
//! ```toml
//! [[chapters]]
//! id = "ch01"                      # stable key, also the content file prefix
//! number = 1                       # must equal the 1-based position
//! title = "Why TypeScript?"        # canonical title
//! localized_title = "왜 TypeScript인가?"
//! slug = "why-typescript"          # URL key: /chapter/why-typescript/
//! description = "..."
//! duration = "30분"
//! difficulty = 1                   # 1-5
//! # file = "intro.md"              # optional: exact content filename
//! sections = [
//!     { id = "1-1", title = "JavaScript의 자유와 혼돈", slug = "js-freedom" },
//! ]
//! ```
//!
//! ## Validation
//!
//! Loading fails when slugs or ids repeat, numbers skip or start anywhere
//! but 1, difficulty leaves 1-5, or section slugs repeat inside a chapter.
//! A `file` must be a relative path that stays inside the content directory.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// File name of the registry inside the content root.
pub const REGISTRY_FILE: &str = "chapters.toml";

const STOCK_REGISTRY: &str = include_str!("../static/chapters.toml");

/// Highest difficulty level, and the width of the dots string.
pub const MAX_DIFFICULTY: u8 = 5;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Registry validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chapter {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub localized_title: String,
    pub slug: String,
    pub description: String,
    pub duration: String,
    pub difficulty: u8,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Exact content filename, bypassing prefix lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Chapter {
    /// Two-digit ordinal label: `01`, `02`, … `10`.
    pub fn number_label(&self) -> String {
        format!("{:02}", self.number)
    }

    /// Site-relative URL of the chapter page.
    pub fn href(&self) -> String {
        format!("/chapter/{}/", self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    chapters: Vec<Chapter>,
}

/// Previous and next chapters around a position.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a Chapter>,
    /// `None` on the last chapter, where the completion action is shown.
    pub next: Option<&'a Chapter>,
}

/// Immutable, validated chapter table with slug and id indices.
#[derive(Debug, Clone)]
pub struct Registry {
    chapters: Vec<Chapter>,
    by_slug: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl Registry {
    /// Validate `chapters` and build the lookup indices.
    pub fn new(chapters: Vec<Chapter>) -> Result<Self, RegistryError> {
        if chapters.is_empty() {
            return Err(RegistryError::Validation(
                "registry must contain at least one chapter".into(),
            ));
        }

        let mut by_slug = HashMap::with_capacity(chapters.len());
        let mut by_id = HashMap::with_capacity(chapters.len());

        for (idx, chapter) in chapters.iter().enumerate() {
            let expected = idx as u32 + 1;
            if chapter.number != expected {
                return Err(RegistryError::Validation(format!(
                    "chapter '{}' has number {} but is at position {}",
                    chapter.id, chapter.number, expected
                )));
            }
            if chapter.id.trim().is_empty() {
                return Err(RegistryError::Validation(format!(
                    "chapter {} has an empty id",
                    chapter.number
                )));
            }
            if chapter.slug.trim().is_empty() {
                return Err(RegistryError::Validation(format!(
                    "chapter '{}' has an empty slug",
                    chapter.id
                )));
            }
            if !(1..=MAX_DIFFICULTY).contains(&chapter.difficulty) {
                return Err(RegistryError::Validation(format!(
                    "chapter '{}' difficulty must be 1-{}, got {}",
                    chapter.id, MAX_DIFFICULTY, chapter.difficulty
                )));
            }
            if let Some(file) = &chapter.file
                && !is_contained(file)
            {
                return Err(RegistryError::Validation(format!(
                    "chapter '{}' file '{}' must be a relative path inside the content directory",
                    chapter.id, file
                )));
            }
            if by_slug.insert(chapter.slug.clone(), idx).is_some() {
                return Err(RegistryError::Validation(format!(
                    "duplicate chapter slug '{}'",
                    chapter.slug
                )));
            }
            if by_id.insert(chapter.id.clone(), idx).is_some() {
                return Err(RegistryError::Validation(format!(
                    "duplicate chapter id '{}'",
                    chapter.id
                )));
            }

            let mut section_slugs = HashSet::new();
            for section in &chapter.sections {
                if !section_slugs.insert(section.slug.as_str()) {
                    return Err(RegistryError::Validation(format!(
                        "duplicate section slug '{}' in chapter '{}'",
                        section.slug, chapter.id
                    )));
                }
            }
        }

        Ok(Self {
            chapters,
            by_slug,
            by_id,
        })
    }

    /// Parse a registry from `chapters.toml` text.
    pub fn from_toml(source: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(source)?;
        Self::new(file.chapters)
    }

    /// The course compiled into the binary.
    pub fn stock() -> Result<Self, RegistryError> {
        Self::from_toml(STOCK_REGISTRY)
    }

    /// Load `chapters.toml` from the content root, falling back to the stock course.
    pub fn load(root: &Path) -> Result<Self, RegistryError> {
        let path = root.join(REGISTRY_FILE);
        if !path.exists() {
            tracing::debug!("no {} in {}, using stock registry", REGISTRY_FILE, root.display());
            return Self::stock();
        }
        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    pub fn first(&self) -> &Chapter {
        // `new` rejects empty registries
        &self.chapters[0]
    }

    /// Position of the chapter with `slug`.
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Chapter> {
        self.position(slug).map(|idx| &self.chapters[idx])
    }

    pub fn by_id(&self, id: &str) -> Option<&Chapter> {
        self.by_id.get(id).map(|&idx| &self.chapters[idx])
    }

    /// Chapters adjacent to `index` in reading order.
    pub fn neighbors(&self, index: usize) -> Neighbors<'_> {
        Neighbors {
            prev: index.checked_sub(1).and_then(|i| self.chapters.get(i)),
            next: self.chapters.get(index + 1),
        }
    }

    /// Share of the course covered once `chapter` is reached, 0-100.
    pub fn progress_percent(&self, chapter: &Chapter) -> u32 {
        let total = self.chapters.len() as u32;
        (chapter.number * 100 + total / 2) / total
    }
}

/// Whether `file` is a non-empty relative path with no `..` components.
fn is_contained(file: &str) -> bool {
    let path = Path::new(file);
    !file.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// The stock `chapters.toml`, printed by the `gen-chapters` command.
pub fn stock_registry_toml() -> &'static str {
    STOCK_REGISTRY
}

/// Fixed-width difficulty display: `level` filled dots, padded to five.
///
/// `difficulty_dots(3)` → `●●●○○`. Levels above five are clamped.
pub fn difficulty_dots(level: u8) -> String {
    let filled = level.min(MAX_DIFFICULTY) as usize;
    let empty = MAX_DIFFICULTY as usize - filled;
    format!("{}{}", "●".repeat(filled), "○".repeat(empty))
}
