//! The closed set of time units a duration format can address.

use std::fmt;

/// A unit of time with a fixed multiplier to seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// All units, largest first. This is also the storage order inside [`crate::Duration`].
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
    ];

    /// Number of seconds in one of this unit.
    pub const fn multiplier(self) -> u64 {
        match self {
            TimeUnit::Days => 86_400,
            TimeUnit::Hours => 3_600,
            TimeUnit::Minutes => 60,
            TimeUnit::Seconds => 1,
        }
    }

    /// Resolves the unit letter used inside format fields (`{H2}` -> hours).
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'D' => Some(TimeUnit::Days),
            'H' => Some(TimeUnit::Hours),
            'M' => Some(TimeUnit::Minutes),
            'S' => Some(TimeUnit::Seconds),
            _ => None,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Hours => 'H',
            TimeUnit::Minutes => 'M',
            TimeUnit::Seconds => 'S',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TimeUnit::Days => "days",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            TimeUnit::Days => 0,
            TimeUnit::Hours => 1,
            TimeUnit::Minutes => 2,
            TimeUnit::Seconds => 3,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
