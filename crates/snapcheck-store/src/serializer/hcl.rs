//! # HCL-style Codec
//!
//! A declarative `key = value` text format:
//!
//! ```text
//! hash = "44136fa3..."
//! version = "v1"
//! snapshot = {
//!   name = "Alice"
//!   tags = ["a", "b"]
//!   "first name" = null
//! }
//! ```
//!
//! - mappings are `{ ... }` blocks with one `key = value` per line;
//! - sequences are bracketed and comma-joined, and may contain blocks;
//! - strings are double-quoted with `\"`, `\\`, `\n`, `\r`, `\t` and
//!   `\uXXXX` escapes;
//! - booleans and `null` are bare words;
//! - keys that are not identifiers (`[A-Za-z_][A-Za-z0-9_-]*`) are quoted.
//!
//! The parser also accepts `#` line comments and commas between entries.
//! Floats are always written with a fraction or exponent so they read back
//! as floats. Blocks and lists may nest at most [`MAX_DEPTH`] levels.

use std::fmt::{self, Write as _};

use serde_json::{Map, Number, Value};
use snapcheck_core::SnapError;

use super::{codec_error, SnapshotSerializer};
use crate::record::SnapshotRecord;

const INDENT: &str = "  ";

/// Deepest block / list nesting the parser accepts.
pub const MAX_DEPTH: usize = 128;

/// `key = value` text codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct HclSerializer;

impl SnapshotSerializer for HclSerializer {
    fn name(&self) -> &'static str {
        "hcl"
    }

    fn encode(&self, record: &SnapshotRecord) -> Result<Vec<u8>, SnapError> {
        let value = serde_json::to_value(record).map_err(|e| codec_error("hcl", e))?;
        let Value::Object(body) = value else {
            return Err(codec_error("hcl", "record did not serialize to a mapping"));
        };
        Ok(to_string(&body)?.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<SnapshotRecord, SnapError> {
        let text = std::str::from_utf8(bytes).map_err(|e| codec_error("hcl", e))?;
        let body = from_str(text)?;
        serde_json::from_value(Value::Object(body)).map_err(|e| codec_error("hcl", e))
    }
}

/// Render a top-level body.
pub fn to_string(body: &Map<String, Value>) -> Result<String, SnapError> {
    let mut out = String::new();
    write_body(&mut out, body, 0).map_err(|e| codec_error("hcl", e))?;
    Ok(out)
}

/// Parse a top-level body.
pub fn from_str(text: &str) -> Result<Map<String, Value>, SnapError> {
    let mut parser = Parser::new(text);
    let body = parser.body(None)?;
    parser.skip_trivia();
    match parser.peek() {
        None => Ok(body),
        Some(c) => Err(parser.error(format!("unexpected {c:?} after body"))),
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

fn write_body(out: &mut impl fmt::Write, body: &Map<String, Value>, depth: usize) -> fmt::Result {
    for (key, value) in body {
        out.write_str(&INDENT.repeat(depth))?;
        write_key(out, key)?;
        out.write_str(" = ")?;
        write_value(out, value, depth)?;
        out.write_char('\n')?;
    }
    Ok(())
}

fn write_key(out: &mut impl fmt::Write, key: &str) -> fmt::Result {
    if is_identifier(key) {
        out.write_str(key)
    } else {
        write_string(out, key)
    }
}

fn write_value(out: &mut impl fmt::Write, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Null => out.write_str("null"),
        Value::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_value(out, item, depth)?;
            }
            out.write_char(']')
        }
        Value::Object(map) if map.is_empty() => out.write_str("{}"),
        Value::Object(map) => {
            out.write_str("{\n")?;
            write_body(out, map, depth + 1)?;
            out.write_str(&INDENT.repeat(depth))?;
            out.write_char('}')
        }
    }
}

fn write_number(out: &mut impl fmt::Write, n: &Number) -> fmt::Result {
    match n.as_f64().filter(|_| n.is_f64()) {
        // `{:?}` keeps a trailing `.0` on integral floats.
        Some(f) => write!(out, "{f:?}"),
        None => write!(out, "{n}"),
    }
}

fn write_string(out: &mut impl fmt::Write, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c.is_control() => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
        }
    }

    /// Run `parse` one nesting level deeper, failing past `MAX_DEPTH`.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SnapError>,
    ) -> Result<T, SnapError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting exceeds {MAX_DEPTH} levels")));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl std::fmt::Display) -> SnapError {
        let line = self.text[..self.pos].matches('\n').count() + 1;
        codec_error("hcl", format!("line {line}: {message}"))
    }

    fn expect(&mut self, want: char) -> Result<(), SnapError> {
        self.skip_trivia();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(self.error(format!("expected {want:?}, found {c:?}"))),
            None => Err(self.error(format!("expected {want:?}, found end of input"))),
        }
    }

    /// Skip whitespace, newlines and `#` comments.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Entries until `close` (or end of input at top level).
    fn body(&mut self, close: Option<char>) -> Result<Map<String, Value>, SnapError> {
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None if close.is_none() => return Ok(map),
                None => return Err(self.error("unterminated block")),
                Some(c) if Some(c) == close => {
                    self.bump();
                    return Ok(map);
                }
                Some(',') => {
                    self.bump();
                }
                Some(_) => {
                    let key = self.key()?;
                    self.expect('=')?;
                    let value = self.value()?;
                    map.insert(key, value);
                }
            }
        }
    }

    fn key(&mut self) -> Result<String, SnapError> {
        match self.peek() {
            Some('"') => self.string(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(self.word().to_string()),
            Some(c) => Err(self.error(format!("expected key, found {c:?}"))),
            None => Err(self.error("expected key, found end of input")),
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                self.bump();
            } else {
                break;
            }
        }
        &self.text[start..self.pos]
    }

    fn value(&mut self) -> Result<Value, SnapError> {
        self.skip_trivia();
        match self.peek() {
            Some('"') => self.string().map(Value::String),
            Some('{') => {
                self.bump();
                self.nested(|p| p.body(Some('}'))).map(Value::Object)
            }
            Some('[') => {
                self.bump();
                self.nested(Self::list).map(Value::Array)
            }
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => match self.word() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                other => Err(self.error(format!("unknown bare word {other:?}"))),
            },
            Some(c) => Err(self.error(format!("expected value, found {c:?}"))),
            None => Err(self.error("expected value, found end of input")),
        }
    }

    fn list(&mut self) -> Result<Vec<Value>, SnapError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(items);
                }
                None => return Err(self.error("unterminated list")),
                _ => {}
            }
            items.push(self.value()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected ',' or ']', found {c:?}"))),
                None => return Err(self.error("unterminated list")),
            }
        }
    }

    fn number(&mut self) -> Result<Value, SnapError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.bump();
            } else {
                break;
            }
        }
        let token = &self.text[start..self.pos];
        let is_float = token.contains(['.', 'e', 'E']);
        let number = if is_float {
            token.parse::<f64>().ok().and_then(Number::from_f64)
        } else {
            token
                .parse::<i64>()
                .map(Number::from)
                .or_else(|_| token.parse::<u64>().map(Number::from))
                .ok()
        };
        number
            .map(Value::Number)
            .ok_or_else(|| self.error(format!("invalid number {token:?}")))
    }

    fn string(&mut self) -> Result<String, SnapError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('u') => out.push(self.unicode_escape()?),
                    Some(c) => return Err(self.error(format!("invalid escape \\{c}"))),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<char, SnapError> {
        let start = self.pos;
        for _ in 0..4 {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => {}
                _ => return Err(self.error("invalid \\u escape")),
            }
        }
        u32::from_str_radix(&self.text[start..self.pos], 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid \\u escape"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected mapping"),
        }
    }

    #[test]
    fn renders_blocks_and_lists() {
        let text = to_string(&body(json!({
            "name": "Alice",
            "age": 30,
            "tags": ["a", "b"],
            "profile": {"active": true, "note": null}
        })))
        .unwrap();
        assert_eq!(
            text,
            "name = \"Alice\"\nage = 30\ntags = [\"a\", \"b\"]\nprofile = {\n  active = true\n  note = null\n}\n"
        );
    }

    #[test]
    fn quotes_non_identifier_keys_and_escapes() {
        let text = to_string(&body(json!({"first name": "say \"hi\"\n"}))).unwrap();
        assert_eq!(text, "\"first name\" = \"say \\\"hi\\\"\\n\"\n");
    }

    #[test]
    fn integral_floats_stay_floats() {
        let original = body(json!({"f": 1.0, "g": -2.5e-8, "i": 1, "big": u64::MAX}));
        let text = to_string(&original).unwrap();
        assert!(text.contains("f = 1.0\n"));
        let parsed = from_str(&text).unwrap();
        assert_eq!(parsed, original);
        assert!(parsed["f"].is_f64());
    }

    #[test]
    fn parses_nested_structures() {
        let original = body(json!({
            "users": [{"id": 1, "roles": ["admin"]}, {"id": 2, "roles": []}],
            "empty": {},
            "ctrl": "\u{1}tab\t",
            "ünïcode": "ü"
        }));
        assert_eq!(from_str(&to_string(&original).unwrap()).unwrap(), original);
    }

    #[test]
    fn accepts_comments_and_commas() {
        let text = "# header\na = 1, b = [1, 2,]\nc = { d = \"x\" } # trailing\n";
        assert_eq!(
            Value::Object(from_str(text).unwrap()),
            json!({"a": 1, "b": [1, 2], "c": {"d": "x"}})
        );
    }

    #[test]
    fn reports_line_of_error() {
        let err = from_str("a = 1\nb = maybe\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
        assert!(from_str("a = {\n b = 1\n").is_err());
        assert!(from_str("a = \"open").is_err());
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("a = {}1{}\n", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(from_str(&ok).is_ok());

        let deep = format!("a = {}1{}\n", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        let err = from_str(&deep).unwrap_err();
        assert!(matches!(err, SnapError::Serialization(_)));
        assert!(err.to_string().contains("nesting exceeds"), "{err}");

        let blocks = "a = {\n".repeat(100_000);
        assert!(matches!(from_str(&blocks).unwrap_err(), SnapError::Serialization(_)));
    }
}
