//! The aggregate duration value produced by parsing.

use crate::error::DurationError;
use crate::unit::TimeUnit;
use std::fmt;

/// At most one magnitude per [`TimeUnit`].
///
/// An unset unit is distinct from a unit set to zero: parsing an empty numeric
/// field yields zero, and only set units participate in the double-assignment
/// check performed by [`Duration::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    magnitudes: [Option<u64>; 4],
}

impl Duration {
    /// A duration with every unit unset.
    pub const fn new() -> Self {
        Self {
            magnitudes: [None; 4],
        }
    }

    /// A duration with exactly one unit set.
    pub fn of(unit: TimeUnit, magnitude: u64) -> Self {
        let mut duration = Self::new();
        duration.magnitudes[unit.index()] = Some(magnitude);
        duration
    }

    /// Builds a duration from an initial set of unit/magnitude pairs.
    /// Naming the same unit twice fails with `DoubleValueAssignment`.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, DurationError>
    where
        I: IntoIterator<Item = (TimeUnit, u64)>,
    {
        let mut duration = Self::new();
        for (unit, magnitude) in pairs {
            duration.assign(unit, magnitude)?;
        }
        Ok(duration)
    }

    pub fn get(&self, unit: TimeUnit) -> Option<u64> {
        self.magnitudes[unit.index()]
    }

    pub fn days(&self) -> Option<u64> {
        self.get(TimeUnit::Days)
    }

    pub fn hours(&self) -> Option<u64> {
        self.get(TimeUnit::Hours)
    }

    pub fn minutes(&self) -> Option<u64> {
        self.get(TimeUnit::Minutes)
    }

    pub fn seconds(&self) -> Option<u64> {
        self.get(TimeUnit::Seconds)
    }

    /// True when no unit carries a magnitude, not even zero.
    pub fn is_unset(&self) -> bool {
        self.magnitudes.iter().all(Option::is_none)
    }

    /// The units that carry a magnitude, largest unit first.
    pub fn set_units(&self) -> impl Iterator<Item = (TimeUnit, u64)> + '_ {
        TimeUnit::ALL
            .into_iter()
            .filter_map(|unit| self.get(unit).map(|magnitude| (unit, magnitude)))
    }

    fn assign(&mut self, unit: TimeUnit, magnitude: u64) -> Result<(), DurationError> {
        let slot = &mut self.magnitudes[unit.index()];
        if slot.is_some() {
            return Err(DurationError::DoubleValueAssignment(unit));
        }
        *slot = Some(magnitude);
        Ok(())
    }

    /// Unions the set units of both operands.
    ///
    /// Fails with `DoubleValueAssignment` on the first (largest) unit that is set on
    /// both sides; in that case neither operand is changed.
    pub fn merge(self, other: Duration) -> Result<Duration, DurationError> {
        if let Some((unit, _)) = other.set_units().find(|(unit, _)| self.get(*unit).is_some()) {
            return Err(DurationError::DoubleValueAssignment(unit));
        }
        let mut merged = self;
        for (unit, magnitude) in other.set_units() {
            merged.assign(unit, magnitude)?;
        }
        Ok(merged)
    }

    /// Sum of every set magnitude times its unit multiplier. Saturates at `u64::MAX`.
    pub fn total_seconds(&self) -> u64 {
        self.set_units().fold(0u64, |total, (unit, magnitude)| {
            total.saturating_add(magnitude.saturating_mul(unit.multiplier()))
        })
    }

    pub fn to_std(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.total_seconds())
    }
}

impl From<Duration> for std::time::Duration {
    fn from(duration: Duration) -> Self {
        duration.to_std()
    }
}

impl fmt::Display for Duration {
    /// Renders the set units compactly, e.g. `1d 12h 0m`. An all-unset duration renders as `0s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return f.write_str("0s");
        }
        let mut first = true;
        for (unit, magnitude) in self.set_units() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            let suffix = unit.letter().to_ascii_lowercase();
            write!(f, "{}{}", magnitude, suffix)?;
        }
        Ok(())
    }
}
