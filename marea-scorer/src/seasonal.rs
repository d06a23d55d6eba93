//! Apply month-of-year multipliers to base intensities.

use marea_core::{Category, Month, TemporalMultiplierTable, sanitise_intensity};

/// Scale `base` by the multiplier for `category` in `month`, clamped to
/// `0.0..=1.0`.
///
/// Months are validated when [`Month`] is constructed, so this function
/// cannot see an out-of-range month.
///
/// # Examples
/// ```
/// use marea_core::{Category, Month, TemporalMultiplierTable};
/// use marea_scorer::apply_seasonal;
///
/// let table = TemporalMultiplierTable::default();
/// let adjusted = apply_seasonal(&table, 0.85, Category::Coastal, Month::AUGUST);
/// assert_eq!(adjusted, 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "seasonal adjustment multiplies two floats"
)]
pub fn apply_seasonal(
    table: &TemporalMultiplierTable,
    base: f64,
    category: Category,
    month: Month,
) -> f64 {
    sanitise_intensity(base * table.multiplier(category, month))
}

/// Seasonal stage bound to one multiplier table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemporalModulator {
    table: TemporalMultiplierTable,
}

impl TemporalModulator {
    /// Modulator over `table`.
    #[must_use]
    pub const fn new(table: TemporalMultiplierTable) -> Self {
        Self { table }
    }

    /// See [`apply_seasonal`].
    #[must_use]
    pub fn apply(&self, base: f64, category: Category, month: Month) -> f64 {
        apply_seasonal(&self.table, base, category, month)
    }

    /// Table in use.
    #[must_use]
    pub const fn table(&self) -> &TemporalMultiplierTable {
        &self.table
    }
}
