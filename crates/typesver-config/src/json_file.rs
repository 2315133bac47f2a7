//! Structured JSON files
//!
//! Reads JSON documents while remembering how they were formatted, so a
//! rewrite keeps the author's indentation and trailing newline.

use crate::{ConfigError, ConfigResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Indentation style of a JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// N spaces per level
    Spaces(usize),
    /// One tab per level
    Tab,
    /// Everything on one line
    Minified,
}

impl Indent {
    /// Detect the indentation unit from the first indented line
    pub fn detect(text: &str) -> Self {
        let mut lines = text.lines().skip(1).peekable();
        if lines.peek().is_none() {
            return Self::Minified;
        }

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('\t') {
                return Self::Tab;
            }
            let spaces = line.len() - line.trim_start_matches(' ').len();
            if spaces > 0 {
                return Self::Spaces(spaces);
            }
        }

        Self::default()
    }

    fn unit(&self) -> Option<String> {
        match self {
            Self::Spaces(n) => Some(" ".repeat(*n)),
            Self::Tab => Some("\t".to_string()),
            Self::Minified => None,
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::Spaces(2)
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spaces(n) => write!(f, "{} spaces", n),
            Self::Tab => write!(f, "tabs"),
            Self::Minified => write!(f, "minified"),
        }
    }
}

/// A parsed JSON document plus its formatting attributes
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredFile {
    pub contents: Value,
    pub indent: Indent,
    pub trailing_newline: bool,
}

impl StructuredFile {
    /// Parse strict JSON text read from `path`
    pub fn parse(text: &str, path: &Path) -> ConfigResult<Self> {
        let contents: Value = serde_json::from_str(text).map_err(|e| ConfigError::ParseError {
            file: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(Self::from_text(contents, text))
    }

    fn from_text(contents: Value, text: &str) -> Self {
        Self {
            contents,
            indent: Indent::detect(text),
            trailing_newline: text.ends_with('\n'),
        }
    }
}

fn read_text(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::IoError {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}

/// Read strict JSON (package.json)
pub fn read_structured(path: &Path) -> ConfigResult<StructuredFile> {
    let text = read_text(path)?;
    StructuredFile::parse(&text, path)
}

/// Read JSON that may contain comments and trailing commas (tsconfig.json)
pub fn read_relaxed(path: &Path) -> ConfigResult<StructuredFile> {
    let text = read_text(path)?;
    let contents: Value = json5::from_str(&text).map_err(|e| ConfigError::ParseError {
        file: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(StructuredFile::from_text(contents, &text))
}

/// Render a value with the given indentation
pub fn to_string_with_indent<T: Serialize>(value: &T, indent: Indent) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    match indent.unit() {
        Some(unit) => {
            let formatter = PrettyFormatter::with_indent(unit.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut serializer)?;
        }
        None => serde_json::to_writer(&mut buf, value)?,
    }
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a value to disk with the given formatting
pub fn write_structured<T: Serialize>(
    path: &Path,
    value: &T,
    indent: Indent,
    trailing_newline: bool,
) -> ConfigResult<()> {
    let mut text = to_string_with_indent(value, indent).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        error: e.into(),
    })?;
    if trailing_newline {
        text.push('\n');
    }
    fs::write(path, text).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        error: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    #[rstest]
    #[case("{\n  \"a\": 1\n}\n", Indent::Spaces(2))]
    #[case("{\n    \"a\": 1\n}", Indent::Spaces(4))]
    #[case("{\n\t\"a\": 1\n}", Indent::Tab)]
    #[case("{\"a\":1}", Indent::Minified)]
    #[case("{\n\"a\": 1\n}", Indent::Spaces(2))]
    fn test_detect_indent(#[case] text: &str, #[case] expected: Indent) {
        assert_eq!(Indent::detect(text), expected);
    }

    #[test]
    fn test_render_with_tabs() {
        let text = to_string_with_indent(&json!({"a": [1]}), Indent::Tab).unwrap();
        assert_eq!(text, "{\n\t\"a\": [\n\t\t1\n\t]\n}");
    }

    #[test]
    fn test_render_minified() {
        let text = to_string_with_indent(&json!({"a": 1, "b": true}), Indent::Minified).unwrap();
        assert_eq!(text, "{\"a\":1,\"b\":true}");
    }

    #[test]
    fn test_relaxed_read_allows_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsconfig.json");
        fs::write(
            &path,
            "{\n    // emit into dist\n    \"compilerOptions\": { \"outDir\": \"dist\", },\n}\n",
        )
        .unwrap();

        let file = read_relaxed(&path).unwrap();
        assert_eq!(file.contents, json!({"compilerOptions": {"outDir": "dist"}}));
        assert_eq!(file.indent, Indent::Spaces(4));
        assert!(file.trailing_newline);
    }

    #[test]
    fn test_strict_read_rejects_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{ /* no */ \"name\": \"x\" }").unwrap();

        let err = read_structured(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_structured(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_write_round_trip_keeps_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let value = json!({"zeta": 1, "alpha": {"b": 2, "a": 1}});

        write_structured(&path, &value, Indent::Spaces(2), true).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"b\": 2,\n    \"a\": 1\n  }\n}\n"
        );
    }
}
