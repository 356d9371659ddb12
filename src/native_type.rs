// src/native_type.rs
//! Conversion of node text into typed values.

use crate::document::XmlNode;
use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::str::FromStr;
use xmlbind_duration::Format;

/// The built-in node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Text,
    Integer,
    Float,
    Duration,
    DateTime,
    /// Passes the node's markup through unconverted.
    Void,
}

impl NativeType {
    pub const ALL: [NativeType; 6] = [
        NativeType::Text,
        NativeType::Integer,
        NativeType::Float,
        NativeType::Duration,
        NativeType::DateTime,
        NativeType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NativeType::Text => "text",
            NativeType::Integer => "integer",
            NativeType::Float => "float",
            NativeType::Duration => "duration",
            NativeType::DateTime => "date_time",
            NativeType::Void => "void",
        }
    }

    pub fn requires_format(self) -> bool {
        matches!(self, NativeType::Duration | NativeType::DateTime)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NativeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NativeType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::UnknownNodeType(s.to_string()))
    }
}

/// Fallback values applied before conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    /// Used when no node matched.
    pub default: Option<Value>,
    /// Used when the matched node's text is empty.
    pub default_empty: Option<Value>,
}

/// A native type with its format compiled, ready to convert nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Converter {
    Text,
    Integer,
    Float,
    Duration(Format),
    DateTime(String),
    Void,
}

impl Converter {
    pub fn new(native_type: NativeType, format: Option<&str>) -> Result<Self> {
        let converter = match native_type {
            NativeType::Text => Converter::Text,
            NativeType::Integer => Converter::Integer,
            NativeType::Float => Converter::Float,
            NativeType::Void => Converter::Void,
            NativeType::Duration => {
                let format = format.ok_or(Error::NoFormatProvided(native_type))?;
                Converter::Duration(Format::compile(format))
            }
            NativeType::DateTime => {
                let format = format.ok_or(Error::NoFormatProvided(native_type))?;
                Converter::DateTime(format.to_string())
            }
        };
        Ok(converter)
    }

    pub fn native_type(&self) -> NativeType {
        match self {
            Converter::Text => NativeType::Text,
            Converter::Integer => NativeType::Integer,
            Converter::Float => NativeType::Float,
            Converter::Duration(_) => NativeType::Duration,
            Converter::DateTime(_) => NativeType::DateTime,
            Converter::Void => NativeType::Void,
        }
    }

    /// Converts an optional node, applying `defaults` first.
    ///
    /// Void nodes bypass the defaults: a missing node is null, a present one is its markup.
    pub fn evaluate(&self, node: Option<XmlNode<'_>>, defaults: &Defaults) -> Result<Value> {
        if let Converter::Void = self {
            return Ok(node.map(|n| Value::Markup(n.markup())).unwrap_or(Value::Null));
        }
        let text = node.map(|n| n.text());
        self.with_defaults(text.as_deref(), defaults)
    }

    pub fn with_defaults(&self, text: Option<&str>, defaults: &Defaults) -> Result<Value> {
        let Some(text) = text else {
            return Ok(defaults.default.clone().unwrap_or(Value::Null));
        };
        if text.is_empty() {
            return Ok(match &defaults.default_empty {
                Some(value) => value.clone(),
                None => self.empty_value(),
            });
        }
        self.convert(text)
    }

    fn empty_value(&self) -> Value {
        match self {
            Converter::Text => Value::Text(String::new()),
            _ => Value::Null,
        }
    }

    /// Converts non-empty text.
    pub fn convert(&self, text: &str) -> Result<Value> {
        let value = match self {
            Converter::Text => Value::Text(text.to_string()),
            Converter::Integer => Value::Integer(lenient_integer(text)),
            Converter::Float => Value::Float(lenient_float(text)),
            Converter::Duration(format) => Value::Duration(format.parse(text)?),
            Converter::DateTime(format) => Value::DateTime(parse_date_time(text, format)?),
            Converter::Void => Value::Markup(text.to_string()),
        };
        Ok(value)
    }
}

/// Reads a leading integer: optional whitespace and sign, then digits with
/// single underscores between them. Trailing garbage is ignored, text without
/// digits is 0 and out-of-range values saturate.
pub fn lenient_integer(text: &str) -> i64 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    let mut previous_underscore = false;
    for (i, c) in digits.chars().enumerate() {
        match c {
            '0'..='9' => {
                let digit = i64::from(c as u8 - b'0');
                value = if negative {
                    value.saturating_mul(10).saturating_sub(digit)
                } else {
                    value.saturating_mul(10).saturating_add(digit)
                };
                previous_underscore = false;
            }
            '_' if i > 0 && !previous_underscore => previous_underscore = true,
            _ => break,
        }
    }
    value
}

/// Reads a leading decimal number with optional fraction and exponent, 0.0 when there is none.
pub fn lenient_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let integer_start = end;
    end = skip_digits(bytes, end);
    let mut has_digits = end > integer_start;
    if bytes.get(end) == Some(&b'.') {
        let fraction_end = skip_digits(bytes, end + 1);
        if fraction_end > end + 1 {
            end = fraction_end;
            has_digits = true;
        }
    }
    if !has_digits {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'-' | b'+')) {
            exponent += 1;
        }
        let exponent_end = skip_digits(bytes, exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }
    s[..end].replace('_', "").parse().unwrap_or(0.0)
}

/// Advances over digits, allowing single underscores between them.
fn skip_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'_' if end > start
                && bytes[end - 1].is_ascii_digit()
                && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) =>
            {
                end += 1
            }
            _ => break,
        }
    }
    end
}

/// Parses with a strftime-style format. Without an offset in the format the
/// result is UTC; without time fields it is midnight.
pub fn parse_date_time(text: &str, format: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(with_offset) = DateTime::parse_from_str(text, format) {
        return Ok(with_offset);
    }
    let naive = match NaiveDateTime::parse_from_str(text, format) {
        Ok(naive) => naive,
        Err(source) => NaiveDate::parse_from_str(text, format)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| Error::DateTime {
                input: text.to_string(),
                format: format.to_string(),
                source,
            })?,
    };
    Ok(naive.and_utc().fixed_offset())
}
