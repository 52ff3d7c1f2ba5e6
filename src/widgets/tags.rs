//! Component tag scanner.
//!
//! Finds JSX-style component tags for registered widget names in Markdown
//! source:
//!
//! ```text
//! <Mermaid chart={`
//! graph TD
//!   A --> B
//! `} />
//!
//! <CodePlayground language="typescript" initialCode={"let x = 1;"} height="200px" />
//!
//! <Mermaid>
//! pie title Pets
//! </Mermaid>
//! ```
//!
//! Attribute values may be `"…"`/`'…'` strings, `{`…`}` template literals,
//! `{"…"}` JS strings, or bare `{expr}` expressions (kept as text). A bare
//! attribute name means `"true"`. Tags inside fenced code blocks and inline
//! code spans are left alone.

use std::collections::BTreeMap;
use thiserror::Error;

pub type Props = BTreeMap<String, String>;

#[derive(Error, Debug, PartialEq)]
#[error("line {line}: {message}")]
pub struct TagError {
    pub line: usize,
    pub message: String,
}

impl TagError {
    /// Shift the line number of an error found in text that starts `lines`
    /// lines into its file.
    pub fn offset(mut self, lines: usize) -> Self {
        self.line += lines;
        self
    }
}

/// A component tag located in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMatch {
    pub name: String,
    pub props: Props,
    /// Text between `<Name>` and `</Name>`, for the paired form
    pub children: Option<String>,
    /// Byte range of the whole tag in the source
    pub start: usize,
    pub end: usize,
}

/// Byte ranges covered by fenced code blocks.
fn fenced_ranges(source: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut open: Option<(usize, char, usize)> = None;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let indent = line.len() - line.trim_start_matches(' ').len();
        let trimmed = line.trim_start_matches(' ');
        let fence_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~');

        if indent <= 3
            && let Some(c) = fence_char
        {
            let run = trimmed.chars().take_while(|&ch| ch == c).count();
            if run >= 3 {
                match open {
                    None => open = Some((offset, c, run)),
                    Some((start, oc, orun))
                        if oc == c && run >= orun && trimmed[run..].trim().is_empty() =>
                    {
                        ranges.push((start, offset + line.len()));
                        open = None;
                    }
                    Some(_) => {}
                }
            }
        }
        offset += line.len();
    }
    if let Some((start, _, _)) = open {
        ranges.push((start, source.len()));
    }
    ranges
}

/// Whether `pos` sits inside an inline code span on its line.
fn in_code_span(source: &str, pos: usize) -> bool {
    let line_start = source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    source[line_start..pos].matches('`').count() % 2 == 1
}

fn line_of(source: &str, pos: usize) -> usize {
    source[..pos].matches('\n').count() + 1
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_attr_name(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
}

struct Cursor<'a> {
    source: &'a str,
    pos: usize,
    tag_start: usize,
    name: &'a str,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> TagError {
        TagError {
            line: line_of(self.source, self.tag_start),
            message: message.into(),
        }
    }

    fn unterminated(&self) -> TagError {
        self.error(format!("unterminated <{}> tag", self.name))
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&f) {
            self.bump();
        }
        &self.source[start..self.pos]
    }

    /// Quoted string body after the opening quote, with JS escapes.
    fn escaped_until(&mut self, quote: char) -> Result<String, TagError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.unterminated()),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(self.unterminated()),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(other) => out.push(other),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Plain JSX attribute string, no escapes.
    fn raw_until(&mut self, quote: char) -> Result<String, TagError> {
        let start = self.pos;
        while let Some(c) = self.bump() {
            if c == quote {
                return Ok(self.source[start..self.pos - 1].to_string());
            }
        }
        Err(self.unterminated())
    }

    /// `{ … }` expression value; the opening brace is already consumed.
    fn expression(&mut self) -> Result<String, TagError> {
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('`' | '"' | '\'')) => {
                self.bump();
                self.escaped_until(q)?
            }
            Some(_) => {
                let start = self.pos;
                let mut depth = 0usize;
                loop {
                    match self.peek() {
                        None => return Err(self.unterminated()),
                        Some('{') => depth += 1,
                        Some('}') if depth == 0 => break,
                        Some('}') => depth -= 1,
                        Some(_) => {}
                    }
                    self.bump();
                }
                self.source[start..self.pos].trim().to_string()
            }
            None => return Err(self.unterminated()),
        };
        self.skip_ws();
        match self.bump() {
            Some('}') => Ok(value),
            Some(c) => Err(self.error(format!(
                "expected '}}' in <{}> attribute, found '{}'",
                self.name, c
            ))),
            None => Err(self.unterminated()),
        }
    }

    fn attribute_value(&mut self) -> Result<String, TagError> {
        self.skip_ws();
        match self.bump() {
            Some(q @ ('"' | '\'')) => self.raw_until(q),
            Some('{') => self.expression(),
            Some(c) => Err(self.error(format!(
                "unexpected '{}' in <{}> attribute value",
                c, self.name
            ))),
            None => Err(self.unterminated()),
        }
    }

    /// Parse attributes up to `/>` or `>`; returns the props and whether
    /// the tag is self-closing.
    fn attributes(&mut self) -> Result<(Props, bool), TagError> {
        let mut props = Props::new();
        loop {
            self.skip_ws();
            if self.rest().starts_with("/>") {
                self.pos += 2;
                return Ok((props, true));
            }
            if self.rest().starts_with('>') {
                self.pos += 1;
                return Ok((props, false));
            }
            let name = self.take_while(is_attr_name);
            if name.is_empty() {
                return match self.peek() {
                    Some(c) => Err(self.error(format!(
                        "unexpected '{}' in <{}> tag",
                        c, self.name
                    ))),
                    None => Err(self.unterminated()),
                };
            }
            self.skip_ws();
            let value = if self.peek() == Some('=') {
                self.bump();
                self.attribute_value()?
            } else {
                "true".to_string()
            };
            props.insert(name.to_string(), value);
        }
    }
}

/// Find every tag whose name satisfies `is_known`, in source order.
pub fn find_tags(source: &str, is_known: impl Fn(&str) -> bool) -> Result<Vec<TagMatch>, TagError> {
    let fenced = fenced_ranges(source);
    let mut tags = Vec::new();
    let mut search_from = 0;

    while let Some(rel) = source[search_from..].find('<') {
        let start = search_from + rel;
        search_from = start + 1;

        if let Some(&(_, end)) = fenced.iter().find(|(s, e)| *s <= start && start < *e) {
            search_from = end;
            continue;
        }

        let after = &source[start + 1..];
        if !after.chars().next().is_some_and(is_ident_start) {
            continue;
        }
        let name_len = after.find(|c: char| !is_ident(c)).unwrap_or(after.len());
        let name = &after[..name_len];
        let boundary = after[name_len..].chars().next();
        let at_boundary = match boundary {
            Some(c) => c.is_whitespace() || c == '/' || c == '>',
            None => true,
        };
        if !is_known(name) || !at_boundary || in_code_span(source, start) {
            continue;
        }

        let mut cursor = Cursor {
            source,
            pos: start + 1 + name_len,
            tag_start: start,
            name,
        };
        let (props, self_closing) = cursor.attributes()?;

        let (children, end) = if self_closing {
            (None, cursor.pos)
        } else {
            let closing = format!("</{name}>");
            let body_start = cursor.pos;
            let Some(rel_close) = source[body_start..].find(&closing) else {
                return Err(cursor.error(format!("missing closing </{name}>")));
            };
            let body = &source[body_start..body_start + rel_close];
            (Some(body.to_string()), body_start + rel_close + closing.len())
        };

        tags.push(TagMatch {
            name: name.to_string(),
            props,
            children,
            start,
            end,
        });
        search_from = end;
    }

    Ok(tags)
}
