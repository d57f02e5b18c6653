// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-list document parser.
//!
//! Reads the classic `key=value` line format used by `.properties` documents:
//!
//! - `key=value`, `key:value` and `key value` are all accepted
//! - lines whose first non-blank character is `#` or `!` are comments
//! - a line ending in an odd number of backslashes continues on the next line,
//!   whose leading whitespace is dropped
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded, any other escaped
//!   character stands for itself
//!
//! Keys are taken as written; a later duplicate replaces the earlier value but
//! keeps its position.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigParser;
use indexmap::IndexMap;

/// Parser for `.properties` documents.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::PropertiesParser;
/// use remotecfg::ports::ConfigParser;
///
/// let parser = PropertiesParser::new();
/// let result = parser.parse("# server\nserver.port=8080\nserver.host = example.org").unwrap();
/// assert_eq!(result.get("server.port").map(String::as_str), Some("8080"));
/// assert_eq!(result.get("server.host").map(String::as_str), Some("example.org"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new properties parser.
    pub fn new() -> Self {
        PropertiesParser
    }

    /// Joins natural lines into logical lines, dropping comments and blanks.
    ///
    /// Each logical line is returned with the 1-based number of the natural line
    /// it started on. Escapes are still encoded.
    fn logical_lines(content: &str) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        let mut current: Option<(usize, String)> = None;

        for (index, natural) in content.lines().enumerate() {
            let trimmed = natural.trim_start_matches(is_blank);

            let (start, mut text) = match current.take() {
                Some((start, mut text)) => {
                    text.push_str(trimmed);
                    (start, text)
                }
                None => {
                    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!')
                    {
                        continue;
                    }
                    (index + 1, trimmed.to_string())
                }
            };

            let trailing = text.chars().rev().take_while(|c| *c == '\\').count();
            if trailing % 2 == 1 {
                text.pop();
                current = Some((start, text));
            } else {
                lines.push((start, text));
            }
        }

        // A continuation on the last line simply ends the document.
        if let Some(pending) = current {
            lines.push(pending);
        }
        lines
    }

    /// Splits a logical line into its raw key and raw value.
    fn split_key_value(line: &str) -> (&str, &str) {
        let mut escaped = false;
        for (i, c) in line.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '=' | ':' => {
                    let value = line[i + 1..].trim_start_matches(is_blank);
                    return (&line[..i], value);
                }
                c if is_blank(c) => {
                    let rest = line[i..].trim_start_matches(is_blank);
                    let rest = rest
                        .strip_prefix('=')
                        .or_else(|| rest.strip_prefix(':'))
                        .unwrap_or(rest);
                    return (&line[..i], rest.trim_start_matches(is_blank));
                }
                _ => {}
            }
        }
        (line, "")
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

/// Decodes backslash escapes.
fn unescape(raw: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: a `\uXXXX` low surrogate must follow.
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_code_unit(&mut chars, line)?,
                        _ => return Err(malformed(line)),
                    };
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(malformed(line));
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                out.push(char::from_u32(decoded).ok_or_else(|| malformed(line))?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u32> {
    let mut unit = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| malformed(line))?;
        unit = unit * 16 + digit;
    }
    Ok(unit)
}

fn malformed(line: usize) -> ConfigError {
    ConfigError::ParseError {
        message: format!("Malformed \\uXXXX encoding on line {}", line),
        source: None,
    }
}

impl ConfigParser for PropertiesParser {
    fn parse(&self, content: &str) -> Result<IndexMap<String, String>> {
        let mut result = IndexMap::new();
        for (line, text) in Self::logical_lines(content) {
            let (key, value) = Self::split_key_value(&text);
            result.insert(unescape(key, line)?, unescape(value, line)?);
        }
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }
}
