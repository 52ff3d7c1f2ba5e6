//! Frontmatter splitting.
//!
//! A content file may open with a YAML block fenced by `---` lines. The
//! closing fence may also be `...`. Without a closing fence the opening
//! `---` is ordinary Markdown (a thematic break) and the file has no
//! frontmatter.

use crate::types::Frontmatter;

/// A source file split into its YAML block and Markdown body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split<'a> {
    /// Raw YAML between the fences, if the file has a frontmatter block
    pub yaml: Option<&'a str>,
    pub body: &'a str,
    /// 1-based line of the file on which `body` starts
    pub body_line: usize,
}

fn is_fence(line: &str, fences: &[&str]) -> bool {
    let trimmed = line.trim_end();
    fences.contains(&trimmed)
}

/// Separate a leading frontmatter block from the document body.
pub fn split(source: &str) -> Split<'_> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let no_frontmatter = Split {
        yaml: None,
        body: source,
        body_line: 1,
    };

    let Some((first, rest)) = source.split_once('\n') else {
        return no_frontmatter;
    };
    if !is_fence(first, &["---"]) {
        return no_frontmatter;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line, &["---", "..."]) {
            let yaml = &rest[..offset];
            let consumed = &rest[..offset + line.len()];
            return Split {
                yaml: Some(yaml),
                body: &rest[consumed.len()..],
                body_line: 2 + consumed.matches('\n').count(),
            };
        }
        offset += line.len();
    }
    no_frontmatter
}

/// Parse a YAML block into [`Frontmatter`].
///
/// Empty and comment-only blocks give an empty frontmatter.
pub fn parse(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_without_frontmatter() {
        let s = split("# Title\n\nBody");
        assert_eq!(s.yaml, None);
        assert_eq!(s.body, "# Title\n\nBody");
    }

    #[test]
    fn split_with_frontmatter() {
        let s = split("---\ntitle: Hello\n---\n# Body\n");
        assert_eq!(s.yaml, Some("title: Hello\n"));
        assert_eq!(s.body, "# Body\n");
        assert_eq!(s.body_line, 4);
    }

    #[test]
    fn body_line_counts_frontmatter_lines() {
        assert_eq!(split("# Title").body_line, 1);
        assert_eq!(split("---\na: 1\nb: 2\n\n---\nBody").body_line, 6);
        assert_eq!(split("---\r\na: 1\r\n...\r\nBody").body_line, 4);
    }

    #[test]
    fn split_accepts_dots_terminator_and_crlf() {
        let s = split("---\r\ntitle: Hello\r\n...\r\nBody");
        assert_eq!(s.yaml, Some("title: Hello\r\n"));
        assert_eq!(s.body, "Body");
    }

    #[test]
    fn split_strips_bom() {
        let s = split("\u{feff}---\ntitle: x\n---\nBody");
        assert_eq!(s.yaml, Some("title: x\n"));
    }

    #[test]
    fn unclosed_fence_is_not_frontmatter() {
        let src = "---\nJust a rule above\n\nand text";
        let s = split(src);
        assert_eq!(s.yaml, None);
        assert_eq!(s.body, src);
    }

    #[test]
    fn fence_must_be_first_line() {
        let src = "Intro\n---\ntitle: x\n---\n";
        assert_eq!(split(src).yaml, None);
    }

    #[test]
    fn empty_block() {
        let s = split("---\n---\nBody");
        assert_eq!(s.yaml, Some(""));
        assert_eq!(s.body, "Body");
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn parse_known_and_extra_keys() {
        let fm = parse("title: 왜 TypeScript인가?\ndescription: intro\ntags: [a, b]\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("왜 TypeScript인가?"));
        assert_eq!(fm.description.as_deref(), Some("intro"));
        assert!(fm.extra.contains_key("tags"));
    }

    #[test]
    fn parse_stringifies_scalar_title() {
        let fm = parse("title: 2024\ndescription: true\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("2024"));
        assert_eq!(fm.description.as_deref(), Some("true"));
        assert!(fm.extra.is_empty());
    }

    #[test]
    fn parse_ignores_structured_title() {
        let fm = parse("title: [a, b]\ndescription: ~\nlevel: 1\n").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(fm.description, None);
        assert!(fm.extra.contains_key("level"));
    }

    #[test]
    fn parse_comment_only_block() {
        assert!(parse("# nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_mapping() {
        assert!(parse("- a\n- b\n").is_err());
    }

    #[test]
    fn parse_rejects_invalid_yaml() {
        assert!(parse("title: [unclosed\n").is_err());
    }
}
