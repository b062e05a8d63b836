//! Support for Apple `.strings` localization files.
//!
//! The format is a sequence of `"key" = "value";` pairs with optional
//! comments. Parsing is tolerant: blank lines, comments, and malformed lines
//! never abort a file; a comment immediately preceding a pair becomes its
//! message.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indoc::indoc;

use crate::{error::Error, traits::Parser, types::LocalizationEntry};

/// The parsed contents of one `.strings` file.
///
/// The format itself carries no language information; the language comes from
/// the `<lang>.lproj` directory the file lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs, in file order.
    pub pairs: Vec<Pair>,
}

/// A single key-value pair, possibly with an associated comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,

    /// Comment text (markers stripped) from the line immediately above the
    /// pair, if any.
    pub comment: Option<String>,
}

impl Pair {
    pub fn to_entry(&self) -> LocalizationEntry {
        LocalizationEntry::new(
            self.key.as_str(),
            self.value.as_str(),
            self.comment.clone(),
        )
    }

    pub fn from_entry(entry: &LocalizationEntry) -> Self {
        Pair {
            key: entry.key.clone(),
            value: entry.value.clone(),
            comment: entry.message.clone(),
        }
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(comment) = &self.comment {
            writeln!(f, "/* {} */", comment)?;
        }
        write!(f, "\"{}\" = \"{}\";", self.key, self.value)
    }
}

/// Joins values that span multiple physical lines into one logical line,
/// replacing embedded newlines with a literal `\n` and trimming the
/// indentation the file's own formatting introduced.
fn flatten_multiline_values(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    let mut value = String::new();
    let mut inside_value = false;

    while let Some(c) = chars.next() {
        if !inside_value {
            result.push(c);
            if c == '=' {
                // Seek the opening quote of the value.
                for d in chars.by_ref() {
                    result.push(d);
                    if d == '"' {
                        inside_value = true;
                        value.clear();
                        break;
                    }
                }
            }
        } else if c == '"' {
            let trailing_backslashes = value.chars().rev().take_while(|&b| b == '\\').count();
            if trailing_backslashes % 2 == 0 {
                // Unescaped quote closes the value.
                let one_line = value
                    .lines()
                    .map(str::trim_start)
                    .collect::<Vec<_>>()
                    .join(r"\n");
                result.push_str(&one_line);
                result.push('"');
                inside_value = false;
            } else {
                value.push('"');
            }
        } else {
            value.push(c);
        }
    }

    result
}

// Strips `//` or `/* ... */` markers from a comment line.
fn comment_text(line: &str) -> String {
    if let Some(inner) = line.strip_prefix("/*") {
        inner.strip_suffix("*/").unwrap_or(inner).trim().to_string()
    } else if let Some(inner) = line.strip_prefix("//") {
        inner.trim().to_string()
    } else {
        line.trim().to_string()
    }
}

// Parses one `"key" = "value";` line. Returns None for malformed lines.
fn parse_pair_line(line: &str) -> Option<(String, String)> {
    let (raw_key, raw_value) = line.split_once('=')?;

    let key = raw_key.trim().trim_matches('"').to_string();
    if key.is_empty() {
        return None;
    }

    let value = raw_value.trim().trim_end_matches(';').trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map(str::to_string)
        // An unquoted or half-quoted value is treated as missing.
        .unwrap_or_default();

    Some((key, value))
}

impl Parser for Format {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let content = reader.lines().collect::<Result<Vec<_>, _>>()?.join("\n");
        let content = flatten_multiline_values(&content);

        let mut pairs = Vec::new();
        let mut last_comment: Option<String> = None;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                last_comment = None;
                continue;
            }
            if trimmed.starts_with("//") || trimmed.starts_with("/*") {
                last_comment = Some(comment_text(trimmed));
                continue;
            }

            // Malformed lines are skipped, keeping the rest of the file.
            let Some((key, value)) = parse_pair_line(trimmed) else {
                last_comment = None;
                continue;
            };

            pairs.push(Pair {
                key,
                value,
                comment: last_comment.take().filter(|c| !c.is_empty()),
            });
        }

        Ok(Format { pairs })
    }

    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(indoc! {"
            // This file is automatically generated by locsheet.
            // Do not edit it manually, as your changes will be overwritten.

        "});

        for pair in &self.pairs {
            content.push_str(&pair.to_string());
            content.push('\n');
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// BOM-aware file reading, so UTF-16 `.strings` files (common in Apple
    /// projects) decode transparently.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;

    #[test]
    fn test_parse_basic_pair_with_comment() {
        let content = r#"
        /* Greeting for the user */
        "hello" = "Hello, world!";
        "#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs.len(), 1);
        let pair = &parsed.pairs[0];
        assert_eq!(pair.key, "hello");
        assert_eq!(pair.value, "Hello, world!");
        assert_eq!(pair.comment.as_deref(), Some("Greeting for the user"));
    }

    #[test]
    fn test_blank_and_malformed_lines_are_skipped() {
        let content = r#"

        // Comment

        "good" = "yes";
        bad line without equals
        "another" = "ok";
        "#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs.len(), 2);
        assert_eq!(parsed.pairs[0].key, "good");
        assert_eq!(parsed.pairs[1].key, "another");
    }

    #[test]
    fn test_multiline_value_is_flattened() {
        let content = r#"
        "multiline" = "line 1.
            line 2.
            line 3.";
        "#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs.len(), 1);
        assert_eq!(parsed.pairs[0].value, "line 1.\\nline 2.\\nline 3.");
    }

    #[test]
    fn test_empty_value() {
        let content = r#""empty" = "";"#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs.len(), 1);
        assert_eq!(parsed.pairs[0].value, "");
        assert!(!parsed.pairs[0].to_entry().is_translated());
    }

    #[test]
    fn test_comment_attaches_to_next_pair_only() {
        let content = r#"
        // Comment for A
        "A" = "a";
        "B" = "b";
        "#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs[0].comment.as_deref(), Some("Comment for A"));
        assert!(parsed.pairs[1].comment.is_none());
    }

    #[test]
    fn test_escaped_quote_inside_value() {
        let content = r#""quoted" = "say \"hi\"";"#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs.len(), 1);
        assert_eq!(parsed.pairs[0].value, r#"say \"hi\""#);
    }

    #[test]
    fn test_round_trip_serialization() {
        let content = r#"
        /* Farewell */
        "bye" = "Goodbye!";
        "hello" = "Hi";
        "#;
        let parsed = Format::from_str(content).unwrap();
        let mut output = Vec::new();
        parsed.to_writer(&mut output).unwrap();
        let reparsed = Format::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert_eq!(parsed, reparsed);
    }
}
