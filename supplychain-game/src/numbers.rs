//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Scale a unit count by a fraction and truncate toward zero.
///
/// Non-finite or negative fractions yield 0; the result never exceeds
/// `u32::MAX`.
#[must_use]
pub fn floor_units(units: u32, fraction: f64) -> u32 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    let scaled = (f64::from(units) * fraction).trunc();
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(scaled.min(max)).unwrap_or(0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Express a fraction as a whole percentage, truncating like the ledger does.
#[must_use]
pub fn fraction_to_percent(fraction: f64) -> u32 {
    floor_units(100, fraction)
}
