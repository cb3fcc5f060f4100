//! Leaf-value decoding: raw setting strings into typed literals.
//!
//! Settings values arrive as strings. Each is decoded into the closest typed
//! form: a quote-wrapped value loses its quotes, a bracket-delimited value is
//! parsed as a structured literal, an all-digit value becomes an integer, and
//! anything else stays a string.
//!
//! The structured parser is deliberately restricted: integers, quoted
//! strings, and nested lists/sets/maps, nothing else. There is no expression
//! evaluation and no name resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::iter::Peekable;
use std::str::Chars;

use serde::Serialize;

use crate::error::StorewireError;
use crate::tree::ConfigNode;

/// A decoded configuration value, handed to component factories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Int(i64),
    List(Vec<Literal>),
    Set(BTreeSet<Literal>),
    Map(BTreeMap<Literal, Literal>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// String items of a list or set literal, in literal order.
    /// `None` if the value is not a collection or holds a non-string item.
    pub fn string_items(&self) -> Option<Vec<&str>> {
        let items: Box<dyn Iterator<Item = &Literal>> = match self {
            Literal::List(items) => Box::new(items.iter()),
            Literal::Set(items) => Box::new(items.iter()),
            _ => return None,
        };
        items.map(Literal::as_str).collect()
    }
}

/// Decode a raw setting value.
///
/// Quote-wrapped values are unwrapped without any other escape processing.
/// Bracket-delimited values go through the restricted structured parser.
/// All-digit values parse as non-negative integers. Everything else is
/// returned as-is.
pub fn decode(raw: &str) -> Result<Literal, StorewireError> {
    let value = raw.trim();

    if let Some(inner) = unquote(value) {
        return Ok(Literal::Str(inner.to_string()));
    }

    if (value.starts_with('[') && value.ends_with(']'))
        || (value.starts_with('{') && value.ends_with('}'))
    {
        return parse_structured(value).map_err(|reason| StorewireError::BadLiteral {
            value: value.to_string(),
            reason,
        });
    }

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value
            .parse::<i64>()
            .map(Literal::Int)
            .map_err(|err| StorewireError::BadLiteral {
                value: value.to_string(),
                reason: err.to_string(),
            });
    }

    Ok(Literal::Str(value.to_string()))
}

/// Decode the leaf value carried by `node`.
///
/// A deeper tree was expected to terminate here; if the node has no value of
/// its own the key is reported as missing a value. Child nodes beneath a
/// valued node are ignored, matching the last-write-wins tree fold.
pub(crate) fn decode_leaf(key: &str, node: &ConfigNode) -> Result<Literal, StorewireError> {
    match &node.value {
        Some(raw) => decode(raw),
        None => Err(StorewireError::MissingValue {
            key: key.to_string(),
        }),
    }
}

/// The inner text of a value wrapped in one pair of matching quotes.
fn unquote(value: &str) -> Option<&str> {
    let mut chars = value.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if (first == '\'' || first == '"') && first == last {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

fn parse_structured(text: &str) -> Result<Literal, String> {
    let mut parser = Parser {
        chars: text.chars().peekable(),
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    match parser.chars.next() {
        None => Ok(value),
        Some(c) => Err(format!("trailing character '{c}'")),
    }
}

/// Recursive-descent parser over the restricted literal grammar:
///
/// ```text
/// value  := int | string | list | set | map
/// int    := '-'? digit+
/// string := "'" [^']* "'" | '"' [^"]* '"'
/// list   := '[' (value (',' value)* ','?)? ']'
/// set    := '{' value (',' value)* ','? '}'
/// map    := '{' '}' | '{' pair (',' pair)* ','? '}'
/// ```
///
/// An empty `{}` is a map; a brace group becomes a set only when its first
/// element is not followed by ':'.
struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn value(&mut self) -> Result<Literal, String> {
        self.skip_whitespace();
        match self.chars.peek() {
            None => Err("unexpected end of input".to_string()),
            Some('[') => self.list(),
            Some('{') => self.set_or_map(),
            Some('\'') | Some('"') => self.string(),
            Some(c) if c.is_ascii_digit() || *c == '-' => self.int(),
            Some(c) => Err(format!("unexpected character '{c}'")),
        }
    }

    fn list(&mut self) -> Result<Literal, String> {
        self.chars.next(); // consume '['
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(']') {
                return Ok(Literal::List(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            if !self.eat(',') && !matches!(self.chars.peek(), Some(']')) {
                return Err("expected ',' or ']'".to_string());
            }
        }
    }

    fn set_or_map(&mut self) -> Result<Literal, String> {
        self.chars.next(); // consume '{'
        self.skip_whitespace();
        if self.eat('}') {
            return Ok(Literal::Map(BTreeMap::new()));
        }

        let first = self.value()?;
        self.skip_whitespace();
        if self.eat(':') {
            return self.map(first);
        }

        let mut items = BTreeSet::new();
        items.insert(first);
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Literal::Set(items));
            }
            if !self.eat(',') {
                return Err("expected ',' or '}'".to_string());
            }
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Literal::Set(items));
            }
            items.insert(self.value()?);
        }
    }

    fn map(&mut self, first_key: Literal) -> Result<Literal, String> {
        let mut entries = BTreeMap::new();
        entries.insert(first_key, self.value()?);
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Literal::Map(entries));
            }
            if !self.eat(',') {
                return Err("expected ',' or '}'".to_string());
            }
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Literal::Map(entries));
            }
            let key = self.value()?;
            self.skip_whitespace();
            if !self.eat(':') {
                return Err("expected ':'".to_string());
            }
            entries.insert(key, self.value()?);
        }
    }

    fn string(&mut self) -> Result<Literal, String> {
        let quote = self.chars.next().expect("peeked");
        let mut content = String::new();
        for c in self.chars.by_ref() {
            if c == quote {
                return Ok(Literal::Str(content));
            }
            content.push(c);
        }
        Err("unterminated string".to_string())
    }

    fn int(&mut self) -> Result<Literal, String> {
        let mut digits = String::new();
        if self.eat('-') {
            digits.push('-');
        }
        while let Some(c) = self.chars.peek() {
            if c.is_ascii_digit() {
                digits.push(*c);
                self.chars.next();
            } else {
                break;
            }
        }
        digits
            .parse::<i64>()
            .map(Literal::Int)
            .map_err(|err| format!("bad integer '{digits}': {err}"))
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }
}
