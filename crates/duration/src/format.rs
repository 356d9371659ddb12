//! Compiles a duration format string into an ordered list of chunks.
//!
//! Literal text outside braces must appear verbatim in the input. A braced field
//! `{U}` or `{Un}` names a unit letter and an optional fixed width:
//!
//! ```text
//! h{H2}:{M2};   ->  Literal("h"), Dynamic(H2, delimiter ':'), Literal(":"),
//!                   Dynamic(M2, delimiter ';'), Literal(";")
//! ```
//!
//! Compilation never fails. Unit letters and widths are resolved lazily, when a
//! chunk is actually used to consume input.

use crate::error::DurationError;
use crate::parser;
use crate::unit::TimeUnit;
use crate::value::Duration;
use std::convert::Infallible;
use std::fmt;
use std::mem;
use std::str::FromStr;

/// A braced field of a format string, kept in its raw form until it is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicChunk {
    spec: String,
    delimiter: Option<char>,
}

impl DynamicChunk {
    pub fn new(spec: impl Into<String>, delimiter: Option<char>) -> Self {
        Self {
            spec: spec.into(),
            delimiter,
        }
    }

    /// The raw text between the braces.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// The literal character that immediately follows the field in the format string, if any.
    pub fn delimiter(&self) -> Option<char> {
        self.delimiter
    }

    /// Resolves the first character of the field against the unit letter table.
    pub fn unit(&self) -> Result<TimeUnit, DurationError> {
        self.spec
            .chars()
            .next()
            .and_then(TimeUnit::from_letter)
            .ok_or_else(|| {
                DurationError::InvalidDurationUnit(chars_prefix(&self.spec, 1).to_string())
            })
    }

    /// Resolves the characters after the unit letter as a fixed width.
    ///
    /// `None` means the field has variable width. An explicit width of zero is
    /// treated the same way.
    pub fn width(&self) -> Result<Option<usize>, DurationError> {
        let digits = self.spec.chars().skip(1).collect::<String>();
        if digits.is_empty() {
            return Ok(None);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DurationError::InvalidParseLength(digits));
        }
        let width: usize = digits
            .parse()
            .map_err(|_| DurationError::InvalidParseLength(digits.clone()))?;
        Ok((width > 0).then_some(width))
    }
}

impl fmt::Display for DynamicChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.spec)
    }
}

/// One atomic unit of a compiled format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatChunk {
    /// Text that must match the input exactly.
    Literal(String),
    /// A numeric field bound to a time unit.
    Dynamic(DynamicChunk),
}

impl FormatChunk {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, FormatChunk::Dynamic(_))
    }
}

impl fmt::Display for FormatChunk {
    /// The canonical rendering: literal text as-is, dynamic fields re-braced.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatChunk::Literal(text) => f.write_str(text),
            FormatChunk::Dynamic(chunk) => chunk.fmt(f),
        }
    }
}

/// A compiled duration format. Immutable and freely shareable between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Format {
    chunks: Vec<FormatChunk>,
}

impl Format {
    pub fn compile(format_string: &str) -> Self {
        let mut compiler = Compiler::default();
        for c in format_string.chars() {
            compiler.feed(c);
        }
        Self {
            chunks: compiler.finish(),
        }
    }

    pub fn chunks(&self) -> &[FormatChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Parses `input` against this format. See [`crate::parser::parse_with`].
    pub fn parse(&self, input: &str) -> Result<Duration, DurationError> {
        parser::parse_with(input, self)
    }
}

impl FromStr for Format {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Format::compile(s))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.chunks {
            chunk.fmt(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ScanState {
    #[default]
    LiteralRun,
    BraceRun,
}

/// Two-state scanner behind [`Format::compile`].
///
/// A closed field waits in `pending` until the scanner knows whether a literal
/// character follows it; that character becomes the field's delimiter.
#[derive(Debug, Default)]
struct Compiler {
    state: ScanState,
    chunks: Vec<FormatChunk>,
    literal: String,
    field: String,
    pending: Option<DynamicChunk>,
}

impl Compiler {
    fn feed(&mut self, c: char) {
        match (self.state, c) {
            (ScanState::LiteralRun, '{') => {
                self.flush_pending();
                self.flush_literal();
                self.state = ScanState::BraceRun;
            }
            // A closing brace outside a field ends the literal run and is dropped.
            (ScanState::LiteralRun, '}') => {
                self.flush_pending();
                self.flush_literal();
            }
            (ScanState::LiteralRun, c) => {
                if let Some(mut chunk) = self.pending.take() {
                    chunk.delimiter = Some(c);
                    self.chunks.push(FormatChunk::Dynamic(chunk));
                }
                self.literal.push(c);
            }
            (ScanState::BraceRun, '}') => {
                let spec = mem::take(&mut self.field);
                self.pending = Some(DynamicChunk::new(spec, None));
                self.state = ScanState::LiteralRun;
            }
            // An unclosed field followed by another opening brace ends the first field.
            (ScanState::BraceRun, '{') => {
                let spec = mem::take(&mut self.field);
                self.chunks
                    .push(FormatChunk::Dynamic(DynamicChunk::new(spec, None)));
            }
            (ScanState::BraceRun, c) => self.field.push(c),
        }
    }

    fn flush_pending(&mut self) {
        if let Some(chunk) = self.pending.take() {
            self.chunks.push(FormatChunk::Dynamic(chunk));
        }
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            let text = mem::take(&mut self.literal);
            self.chunks.push(FormatChunk::Literal(text));
        }
    }

    fn finish(mut self) -> Vec<FormatChunk> {
        match self.state {
            ScanState::LiteralRun => {
                self.flush_pending();
                self.flush_literal();
            }
            ScanState::BraceRun => {
                let spec = mem::take(&mut self.field);
                self.chunks
                    .push(FormatChunk::Dynamic(DynamicChunk::new(spec, None)));
            }
        }
        self.chunks
    }
}

fn chars_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamic(chunk: &FormatChunk) -> &DynamicChunk {
        match chunk {
            FormatChunk::Dynamic(d) => d,
            other => panic!("Expected a dynamic chunk, got {:?}", other),
        }
    }

    #[test]
    fn test_single_literal_chunk() {
        let format = Format::compile("xy");
        assert_eq!(format.chunks(), &[FormatChunk::Literal("xy".into())]);
    }

    #[test]
    fn test_single_dynamic_chunk() {
        let format = Format::compile("{D2}");
        assert_eq!(format.len(), 1);
        let chunk = dynamic(&format.chunks()[0]);
        assert_eq!(chunk.unit(), Ok(TimeUnit::Days));
        assert_eq!(chunk.width(), Ok(Some(2)));
        assert_eq!(chunk.delimiter(), None);
    }

    #[test]
    fn test_adjacent_dynamic_chunks_have_no_delimiter() {
        let format = Format::compile("{D2}{H}");
        assert_eq!(format.len(), 2);
        let first = dynamic(&format.chunks()[0]);
        let second = dynamic(&format.chunks()[1]);
        assert_eq!(first.unit(), Ok(TimeUnit::Days));
        assert_eq!(first.delimiter(), None);
        assert_eq!(second.unit(), Ok(TimeUnit::Hours));
        assert_eq!(second.width(), Ok(None));
        assert_eq!(second.delimiter(), None);
    }

    #[test]
    fn test_literal_between_dynamic_chunks() {
        let format = Format::compile("{D2}.{H}xy");
        let chunks = format.chunks();
        assert_eq!(chunks.len(), 4);
        assert_eq!(dynamic(&chunks[0]).delimiter(), Some('.'));
        assert_eq!(chunks[1], FormatChunk::Literal(".".into()));
        assert_eq!(dynamic(&chunks[2]).unit(), Ok(TimeUnit::Hours));
        assert_eq!(dynamic(&chunks[2]).delimiter(), Some('x'));
        assert_eq!(chunks[3], FormatChunk::Literal("xy".into()));
    }

    #[test]
    fn test_leading_literal() {
        let format = Format::compile("h{H2}:{M2};");
        let kinds: Vec<bool> = format.chunks().iter().map(FormatChunk::is_dynamic).collect();
        assert_eq!(kinds, vec![false, true, false, true, false]);
        assert_eq!(format.chunks()[0], FormatChunk::Literal("h".into()));
        assert_eq!(dynamic(&format.chunks()[3]).delimiter(), Some(';'));
    }

    #[test]
    fn test_empty_format() {
        assert!(Format::compile("").is_empty());
    }

    #[test]
    fn test_round_trip_rendering() {
        for source in ["", "xy", "{D2}", "{D2}{H}", "{D2}.{H}xy", "h{H2}:{M2};", "{M}:{S}"] {
            assert_eq!(Format::compile(source).to_string(), source);
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        assert_eq!(Format::compile("{H}h {M}m"), Format::compile("{H}h {M}m"));
        let parsed: Format = "{H}h {M}m".parse().unwrap();
        assert_eq!(parsed, Format::compile("{H}h {M}m"));
    }

    #[test]
    fn test_malformed_fields_compile() {
        let format = Format::compile("{F}{MM}");
        assert_eq!(format.len(), 2);
        assert_eq!(
            dynamic(&format.chunks()[0]).unit(),
            Err(DurationError::InvalidDurationUnit("F".into()))
        );
        assert_eq!(
            dynamic(&format.chunks()[1]).width(),
            Err(DurationError::InvalidParseLength("M".into()))
        );
    }

    #[test]
    fn test_width_parsing() {
        assert_eq!(DynamicChunk::new("D4", None).width(), Ok(Some(4)));
        assert_eq!(DynamicChunk::new("S10", None).width(), Ok(Some(10)));
        assert_eq!(DynamicChunk::new("H", None).width(), Ok(None));
        assert_eq!(DynamicChunk::new("M0", None).width(), Ok(None));
        assert!(DynamicChunk::new("Mx", None).width().is_err());
    }

    #[test]
    fn test_empty_field_has_no_unit() {
        let format = Format::compile("{}");
        assert_eq!(
            dynamic(&format.chunks()[0]).unit(),
            Err(DurationError::InvalidDurationUnit(String::new()))
        );
    }

    #[test]
    fn test_unterminated_field() {
        let format = Format::compile("ab{H2");
        assert_eq!(format.chunks()[0], FormatChunk::Literal("ab".into()));
        assert_eq!(dynamic(&format.chunks()[1]).width(), Ok(Some(2)));
    }

    #[test]
    fn test_stray_closing_brace_splits_literal() {
        let format = Format::compile("a}b");
        assert_eq!(
            format.chunks(),
            &[FormatChunk::Literal("a".into()), FormatChunk::Literal("b".into())]
        );
        assert!(format.parse("ab").unwrap().is_unset());
        assert!(matches!(
            format.parse("a}b"),
            Err(DurationError::FormatMismatch { .. })
        ));

        let format = Format::compile("{M}}:{S2}");
        assert_eq!(format.len(), 3);
        assert_eq!(dynamic(&format.chunks()[0]).delimiter(), None);
        assert_eq!(format.chunks()[1], FormatChunk::Literal(":".into()));
    }
}
