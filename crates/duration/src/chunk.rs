//! Validates a single input segment against the chunk it was cut for.

use crate::error::DurationError;
use crate::format::FormatChunk;
use crate::value::Duration;

/// Parses one segment.
///
/// Literal chunks contribute an all-unset duration when the segment matches
/// byte-for-byte. Dynamic chunks contribute exactly one unit; an empty segment
/// counts as zero.
pub fn parse_chunk(segment: &str, chunk: &FormatChunk) -> Result<Duration, DurationError> {
    match chunk {
        FormatChunk::Literal(text) => {
            if segment == text {
                Ok(Duration::new())
            } else {
                Err(mismatch(segment, chunk))
            }
        }
        FormatChunk::Dynamic(field) => {
            let unit = field.unit()?;
            field.width()?;

            if segment.is_empty() {
                return Ok(Duration::of(unit, 0));
            }
            if !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(mismatch(segment, chunk));
            }
            let magnitude =
                segment
                    .parse::<u64>()
                    .map_err(|_| DurationError::MagnitudeOverflow {
                        unit,
                        segment: segment.to_string(),
                    })?;
            Ok(Duration::of(unit, magnitude))
        }
    }
}

fn mismatch(segment: &str, chunk: &FormatChunk) -> DurationError {
    DurationError::FormatMismatch {
        segment: segment.to_string(),
        chunk: chunk.to_string(),
    }
}
