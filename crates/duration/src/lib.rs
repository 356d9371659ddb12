//! Format-driven duration parsing.
//!
//! A format string mixes literal text with braced fields that name a time unit
//! and an optional fixed width:
//!
//! | Field  | Meaning                                                        |
//! |--------|----------------------------------------------------------------|
//! | `{U}`  | variable width, digits up to the next literal character or end |
//! | `{Un}` | fixed width, exactly `n` characters                            |
//!
//! `U` is one of `D` (days), `H` (hours), `M` (minutes) or `S` (seconds).
//!
//! ```
//! use xmlbind_duration::{parse, TimeUnit};
//!
//! let duration = parse("h12:34;", "h{H2}:{M2};").unwrap();
//! assert_eq!(duration.get(TimeUnit::Hours), Some(12));
//! assert_eq!(duration.total_seconds(), 45_240);
//! ```
//!
//! Formats can be compiled once and reused across threads:
//!
//! ```
//! use xmlbind_duration::Format;
//!
//! let format = Format::compile("{M}:{S}");
//! assert_eq!(format.parse("1:34").unwrap().total_seconds(), 94);
//! assert_eq!(format.parse(":34").unwrap().total_seconds(), 34);
//! ```

pub mod chunk;
pub mod error;
pub mod format;
pub mod parser;
pub mod unit;
pub mod value;

pub use chunk::parse_chunk;
pub use error::DurationError;
pub use format::{DynamicChunk, Format, FormatChunk};
pub use parser::{parse, parse_with, segment};
pub use unit::TimeUnit;
pub use value::Duration;
