//! Month-of-year multipliers per category.
//!
//! The table is read-only once built and is shared across every record in a
//! batch. Construction enforces the invariants lookups rely on: exactly
//! twelve entries per category and strictly positive, finite multipliers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Category, Month};

const COASTAL: [f64; 12] = [0.3, 0.3, 0.4, 0.6, 0.7, 0.9, 1.5, 1.8, 1.2, 0.7, 0.4, 0.3];
const MOUNTAIN: [f64; 12] = [1.4, 1.3, 1.0, 0.8, 0.7, 0.9, 1.2, 0.9, 0.7, 0.8, 1.1, 1.5];
const CITY: [f64; 12] = [0.7, 0.7, 0.8, 1.2, 0.9, 1.0, 0.9, 0.9, 1.0, 1.1, 0.9, 0.8];
const INTERIOR: [f64; 12] = [0.5, 0.5, 0.6, 0.8, 0.7, 0.7, 0.7, 0.7, 0.7, 0.6, 0.6, 0.6];

/// Lookup `category × month → multiplier`.
///
/// # Examples
/// ```
/// use marea_core::{Category, Month, TemporalMultiplierTable};
///
/// let table = TemporalMultiplierTable::default();
/// let august = table.multiplier(Category::Coastal, Month::AUGUST);
/// let january = table.multiplier(Category::Coastal, Month::JANUARY);
/// assert!(august > january);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Category, Vec<f64>>",
    into = "BTreeMap<Category, Vec<f64>>"
)]
pub struct TemporalMultiplierTable {
    coastal: [f64; 12],
    mountain: [f64; 12],
    city: [f64; 12],
    interior: [f64; 12],
}

/// Errors returned when building a [`TemporalMultiplierTable`].
#[derive(Debug, Error, PartialEq)]
pub enum MultiplierTableError {
    /// A category had no row.
    #[error("multiplier table has no entries for {category}")]
    MissingCategory {
        /// Category without a row.
        category: Category,
    },
    /// A row did not contain exactly twelve entries.
    #[error("{category} needs 12 monthly multipliers, found {found}")]
    WrongLength {
        /// Offending category.
        category: Category,
        /// Number of entries supplied.
        found: usize,
    },
    /// A multiplier was zero, negative or not finite.
    #[error("{category} multiplier for month {month} must be positive, got {value}")]
    NonPositive {
        /// Offending category.
        category: Category,
        /// Month number in `1..=12`.
        month: usize,
        /// Rejected value.
        value: f64,
    },
}

impl TemporalMultiplierTable {
    /// Validate and construct a table from one row per category.
    ///
    /// # Errors
    /// Returns [`MultiplierTableError`] when a category is missing, a row
    /// does not have twelve entries, or any multiplier is not a positive
    /// finite number.
    pub fn new(rows: &BTreeMap<Category, Vec<f64>>) -> Result<Self, MultiplierTableError> {
        let mut table = Self::default();
        for category in Category::ALL {
            let row = rows
                .get(&category)
                .ok_or(MultiplierTableError::MissingCategory { category })?;
            let fixed: [f64; 12] =
                row.as_slice()
                    .try_into()
                    .map_err(|_| MultiplierTableError::WrongLength {
                        category,
                        found: row.len(),
                    })?;
            if let Some((position, &value)) = fixed
                .iter()
                .enumerate()
                .find(|(_, value)| !(value.is_finite() && **value > 0.0))
            {
                return Err(MultiplierTableError::NonPositive {
                    category,
                    month: position + 1,
                    value,
                });
            }
            *table.row_mut(category) = fixed;
        }
        Ok(table)
    }

    /// Multiplier for `category` in `month`.
    #[must_use]
    pub fn multiplier(&self, category: Category, month: Month) -> f64 {
        self.row(category)
            .get(month.index())
            .copied()
            .unwrap_or(1.0)
    }

    /// All twelve multipliers for `category`, January first.
    #[must_use]
    pub const fn row(&self, category: Category) -> &[f64; 12] {
        match category {
            Category::Coastal => &self.coastal,
            Category::Mountain => &self.mountain,
            Category::City => &self.city,
            Category::Interior => &self.interior,
        }
    }

    const fn row_mut(&mut self, category: Category) -> &mut [f64; 12] {
        match category {
            Category::Coastal => &mut self.coastal,
            Category::Mountain => &mut self.mountain,
            Category::City => &mut self.city,
            Category::Interior => &mut self.interior,
        }
    }

    /// Month with the highest multiplier for `category` (earliest on ties).
    #[must_use]
    pub fn peak_month(&self, category: Category) -> Month {
        self.extreme_month(category, |candidate, best| candidate > best)
    }

    /// Month with the lowest multiplier for `category` (earliest on ties).
    #[must_use]
    pub fn low_month(&self, category: Category) -> Month {
        self.extreme_month(category, |candidate, best| candidate < best)
    }

    fn extreme_month(&self, category: Category, better: impl Fn(f64, f64) -> bool) -> Month {
        let mut best = Month::JANUARY;
        for month in Month::all() {
            if better(
                self.multiplier(category, month),
                self.multiplier(category, best),
            ) {
                best = month;
            }
        }
        best
    }
}

impl Default for TemporalMultiplierTable {
    fn default() -> Self {
        Self {
            coastal: COASTAL,
            mountain: MOUNTAIN,
            city: CITY,
            interior: INTERIOR,
        }
    }
}

impl TryFrom<BTreeMap<Category, Vec<f64>>> for TemporalMultiplierTable {
    type Error = MultiplierTableError;

    fn try_from(rows: BTreeMap<Category, Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(&rows)
    }
}

impl From<TemporalMultiplierTable> for BTreeMap<Category, Vec<f64>> {
    fn from(table: TemporalMultiplierTable) -> Self {
        Category::ALL
            .into_iter()
            .map(|category| (category, table.row(category).to_vec()))
            .collect()
    }
}
