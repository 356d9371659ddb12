//! Cuts an input string into one segment per format chunk and folds the parsed
//! segments into a single [`Duration`].

use crate::chunk::parse_chunk;
use crate::error::DurationError;
use crate::format::{Format, FormatChunk};
use crate::value::Duration;

/// Compiles `format_string` and parses `input` against it.
pub fn parse(input: &str, format_string: &str) -> Result<Duration, DurationError> {
    parse_with(input, &Format::compile(format_string))
}

/// Parses `input` against an already compiled format.
///
/// Every chunk is given its segment in order and the results are merged left to
/// right, so two fields naming the same unit fail with `DoubleValueAssignment`.
/// Input left over after the last chunk is ignored.
pub fn parse_with(input: &str, format: &Format) -> Result<Duration, DurationError> {
    let segments = segment(input, format)?;
    log::trace!(
        "Segmented '{}' against '{}' into {:?}",
        input,
        format,
        segments
    );

    format
        .chunks()
        .iter()
        .zip(segments)
        .try_fold(Duration::new(), |duration, (chunk, segment)| {
            duration.merge(parse_chunk(segment, chunk)?)
        })
}

/// Splits `input` into exactly one segment per chunk of `format`.
///
/// Widths are counted in characters. A literal chunk takes as many characters as
/// its text has, a fixed-width field takes its width, and a variable-width field
/// takes everything up to its delimiter (or the rest of the input when there is
/// no delimiter or it never occurs). Segments are shorter, possibly empty, once
/// the input runs out.
pub fn segment<'i>(input: &'i str, format: &Format) -> Result<Vec<&'i str>, DurationError> {
    let mut rest = input;
    let mut segments = Vec::with_capacity(format.len());

    for chunk in format.chunks() {
        let (head, tail) = match chunk {
            FormatChunk::Literal(text) => split_at_chars(rest, text.chars().count()),
            FormatChunk::Dynamic(field) => match field.width()? {
                Some(width) => split_at_chars(rest, width),
                None => match field.delimiter().and_then(|d| rest.find(d)) {
                    Some(index) => rest.split_at(index),
                    None => (rest, ""),
                },
            },
        };
        segments.push(head);
        rest = tail;
    }

    Ok(segments)
}

fn split_at_chars(s: &str, count: usize) -> (&str, &str) {
    match s.char_indices().nth(count) {
        Some((index, _)) => s.split_at(index),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::TimeUnit;

    fn hours_minutes(hours: u64, minutes: u64) -> Duration {
        Duration::from_pairs([(TimeUnit::Hours, hours), (TimeUnit::Minutes, minutes)]).unwrap()
    }

    fn is_mismatch(result: Result<Duration, DurationError>) -> bool {
        matches!(result, Err(DurationError::FormatMismatch { .. }))
    }

    #[test]
    fn test_single_fixed_width_field() {
        let duration = parse("24", "{H2}").unwrap();
        assert_eq!(duration, Duration::of(TimeUnit::Hours, 24));
        assert_eq!(duration.total_seconds(), 86_400);

        assert_eq!(parse("4", "{H2}").unwrap().hours(), Some(4));
        assert_eq!(parse("234", "{H2}").unwrap().hours(), Some(23));
    }

    #[test]
    fn test_two_fixed_width_fields() {
        let duration = parse("1234", "{H2}{M2}").unwrap();
        assert_eq!(duration, hours_minutes(12, 34));
        assert_eq!(duration.total_seconds(), 45_240);

        assert_eq!(parse("12345", "{H2}{M2}").unwrap(), hours_minutes(12, 34));
        assert_eq!(parse("1", "{H2}{M2}").unwrap(), hours_minutes(1, 0));
    }

    #[test]
    fn test_fixed_width_fields_with_literals() {
        let format = "h{H2}:{M2};";
        assert_eq!(parse("h12:34;", format).unwrap(), hours_minutes(12, 34));
        assert!(is_mismatch(parse("12:34;", format)));
        assert!(is_mismatch(parse("h12:34", format)));
        assert!(is_mismatch(parse("12:3;", format)));
        assert!(is_mismatch(parse("12:345;", format)));
    }

    #[test]
    fn test_variable_width_field() {
        assert_eq!(parse("1234", "{S}").unwrap().seconds(), Some(1234));
        assert!(is_mismatch(parse("1234.", "{S}")));
    }

    #[test]
    fn test_variable_width_fields_with_delimiter() {
        let format = "{M}:{S}";
        let duration = parse("1:34", format).unwrap();
        assert_eq!(duration.minutes(), Some(1));
        assert_eq!(duration.seconds(), Some(34));

        let duration = parse(":34", format).unwrap();
        assert_eq!(duration.minutes(), Some(0));
        assert_eq!(duration.seconds(), Some(34));
        assert_eq!(duration.total_seconds(), 34);

        let duration = parse("34:", format).unwrap();
        assert_eq!(duration.total_seconds(), 34 * 60);

        assert!(is_mismatch(parse("1234", format)));
        assert!(is_mismatch(parse("12.34", format)));
    }

    #[test]
    fn test_variable_width_field_stops_at_first_delimiter() {
        assert_eq!(
            segment("12.34.56", &Format::compile("{M}.{S}")).unwrap(),
            vec!["12", ".", "34.56"]
        );
        assert!(is_mismatch(parse("12.34.56", "{M}.{S}")));
    }

    #[test]
    fn test_fixed_width_field_with_trailing_literal() {
        assert_eq!(parse("123:", "{M3}:").unwrap().minutes(), Some(123));
        assert!(is_mismatch(parse("12:", "{M3}:")));
        assert!(is_mismatch(parse("1234:", "{M3}:")));
        assert!(is_mismatch(parse("123", "{M3}:")));
    }

    #[test]
    fn test_variable_width_field_missing_delimiter() {
        assert_eq!(parse("123.", "{M}.").unwrap().minutes(), Some(123));
        assert!(is_mismatch(parse("12", "{M}.")));
        assert_eq!(parse(".", "{M}.").unwrap().total_seconds(), 0);
    }

    #[test]
    fn test_literal_only_formats() {
        assert_eq!(parse(".", "."), Ok(Duration::new()));
        assert_eq!(parse(".12", "."), Ok(Duration::new()));
        assert!(is_mismatch(parse(":", ".")));
        assert!(is_mismatch(parse("", "abc")));
    }

    #[test]
    fn test_repeated_unit_is_double_assignment() {
        assert_eq!(
            parse("12.3456", "{M2}.{M4}"),
            Err(DurationError::DoubleValueAssignment(TimeUnit::Minutes))
        );
        assert_eq!(
            parse("0:0", "{S}:{S}"),
            Err(DurationError::DoubleValueAssignment(TimeUnit::Seconds))
        );
    }

    #[test]
    fn test_empty_input_and_format() {
        let duration = parse("", "").unwrap();
        assert!(duration.is_unset());
        assert_eq!(duration.total_seconds(), 0);
        assert!(segment("anything", &Format::compile("")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_fields() {
        assert_eq!(
            parse("adfvabdl", "{F}"),
            Err(DurationError::InvalidDurationUnit("F".into()))
        );
        assert_eq!(
            parse("123", "{MM}"),
            Err(DurationError::InvalidParseLength("M".into()))
        );
    }

    #[test]
    fn test_width_errors_surface_before_unit_errors() {
        // Segmentation resolves every width before any segment is parsed.
        assert_eq!(
            parse("12", "{xy}"),
            Err(DurationError::InvalidParseLength("y".into()))
        );
        assert_eq!(
            parse("1234", "{F2}{Mx}"),
            Err(DurationError::InvalidParseLength("x".into()))
        );
    }

    #[test]
    fn test_segments_count_characters() {
        let format = Format::compile("é{S2}");
        assert_eq!(segment("é42", &format).unwrap(), vec!["é", "42"]);
        assert_eq!(format.parse("é42").unwrap().seconds(), Some(42));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let format = Format::compile("{D}d {H2}:{M2}");
        let first = format.parse("3d 04:05").unwrap();
        let second = format.parse("3d 04:05").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total_seconds(), 3 * 86_400 + 4 * 3_600 + 5 * 60);
    }
}
