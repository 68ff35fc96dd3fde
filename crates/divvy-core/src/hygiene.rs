//! Numeric hygiene for persisted values
//!
//! Last line of defense before anything numeric becomes final output: a
//! division against a zero subtotal or a garbage token upstream must never
//! leak NaN or infinity into a saved breakdown.

/// Replace non-finite values with `0.0`. Idempotent.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Round to 2 decimal places (standard half-up decimal rounding)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
