//! Literal values.

use std::fmt;

use crate::ty::Ty;

/// A literal value as written in source: struct field defaults and
/// literal patterns both carry one.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Char(char),
}

impl Literal {
    /// The primitive type a literal of this kind has.
    pub fn ty(&self) -> Ty {
        match self {
            Literal::Int(_) => Ty::int(),
            Literal::Float(_) => Ty::float(),
            Literal::String(_) => Ty::string(),
            Literal::Bool(_) => Ty::bool(),
            Literal::Char(_) => Ty::char(),
        }
    }

    /// Parse an integer literal's source text. Accepts `_` separators and
    /// `0x`/`0o`/`0b` prefixes.
    pub fn parse_int(text: &str) -> Option<i64> {
        let cleaned: String = text.chars().filter(|c| *c != '_').collect();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let value = if let Some(hex) = digits.strip_prefix("0x") {
            i64::from_str_radix(hex, 16).ok()?
        } else if let Some(oct) = digits.strip_prefix("0o") {
            i64::from_str_radix(oct, 8).ok()?
        } else if let Some(bin) = digits.strip_prefix("0b") {
            i64::from_str_radix(bin, 2).ok()?
        } else {
            digits.parse::<i64>().ok()?
        };
        Some(if negative { -value } else { value })
    }

    pub fn parse_float(text: &str) -> Option<f64> {
        let cleaned: String = text.chars().filter(|c| *c != '_').collect();
        cleaned.parse::<f64>().ok()
    }

    /// Strip the surrounding quotes of a string literal and resolve the
    /// common escapes. Text without quotes is taken verbatim.
    pub fn parse_string(text: &str) -> String {
        let inner = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text);
        unescape(inner)
    }

    pub fn parse_char(text: &str) -> Option<char> {
        let inner = text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .unwrap_or(text);
        let unescaped = unescape(inner);
        let mut chars = unescaped.chars();
        let c = chars.next()?;
        chars.next().is_none().then_some(c)
    }

    /// Classify a literal from its source text alone, as literal patterns
    /// are stored.
    pub fn from_source(text: &str) -> Option<Literal> {
        let text = text.trim();
        match text {
            "true" => return Some(Literal::Bool(true)),
            "false" => return Some(Literal::Bool(false)),
            _ => {}
        }
        if text.starts_with('"') {
            return Some(Literal::String(Literal::parse_string(text)));
        }
        if text.starts_with('\'') {
            return Literal::parse_char(text).map(Literal::Char);
        }
        if let Some(i) = Literal::parse_int(text) {
            return Some(Literal::Int(i));
        }
        Literal::parse_float(text).map(Literal::Float)
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Char(c) => write!(f, "{:?}", c),
        }
    }
}
