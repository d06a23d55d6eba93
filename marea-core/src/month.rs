//! Calendar month used to pick seasonal multipliers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A month of the year in `1..=12`.
///
/// Construction is the only place a month is checked, so lookups keyed by
/// `Month` never need to handle an out-of-range value.
///
/// # Examples
/// ```
/// use marea_core::Month;
///
/// # fn main() -> Result<(), marea_core::MonthError> {
/// let august = Month::new(8)?;
/// assert_eq!(august.number(), 8);
/// assert!(Month::new(13).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

/// Errors returned by [`Month::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthError {
    /// The value was outside `1..=12`.
    #[error("month must be between 1 and 12, got {value}")]
    OutOfRange {
        /// Rejected input.
        value: u8,
    },
}

impl Month {
    /// January.
    pub const JANUARY: Self = Self(1);
    /// August, the coastal peak.
    pub const AUGUST: Self = Self(8);
    /// December.
    pub const DECEMBER: Self = Self(12);

    /// Validate and construct a [`Month`].
    ///
    /// # Errors
    /// Returns [`MonthError::OutOfRange`] when `value` is not in `1..=12`.
    pub const fn new(value: u8) -> Result<Self, MonthError> {
        if value >= 1 && value <= 12 {
            Ok(Self(value))
        } else {
            Err(MonthError::OutOfRange { value })
        }
    }

    /// Month number in `1..=12`.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index in `0..12`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Iterate over all twelve months in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1_u8..=12).map(Self)
    }
}

impl TryFrom<u8> for Month {
    type Error = MonthError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(12)]
    fn accepts_boundary_months(#[case] value: u8) {
        assert!(Month::new(value).is_ok());
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    #[case(u8::MAX)]
    fn rejects_out_of_range(#[case] value: u8) {
        assert_eq!(Month::new(value), Err(MonthError::OutOfRange { value }));
    }

    #[test]
    fn all_yields_twelve_sequential_indices() {
        let indices: Vec<usize> = Month::all().map(Month::index).collect();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn deserialising_rejects_invalid_month() {
        let result: Result<Month, _> = serde_json::from_str("14");
        assert!(result.is_err());
        let august: Month = serde_json::from_str("8").expect("valid month");
        assert_eq!(august, Month::AUGUST);
    }
}
