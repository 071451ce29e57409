//! Shared helpers for f64 ↔ Decimal rounding.
//!
//! Every figure the dashboard displays is rounded to two decimal places the
//! way a `{:.2}` rendering reads, then carried as `f64` for charting. Going
//! through `Decimal` keeps the rounded value exact (25.43 stays 25.43, not
//! 25.429999…).
//!
//! Non-finite inputs (NaN, ±Inf) become zero. Finite values beyond
//! ±`DECIMAL_2DP_LIMIT` are clamped to it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest magnitude kept at two decimal places within `Decimal`'s 96-bit mantissa.
const DECIMAL_2DP_LIMIT: f64 = 1e26;

/// Convert an f64 to Decimal, rounded to 2 decimal places.
pub(crate) fn f64_to_decimal_2dp(v: f64) -> Decimal {
    if !v.is_finite() {
        tracing::warn!(
            "f64_to_decimal_2dp received non-finite value {}, defaulting to 0",
            v
        );
        return Decimal::ZERO;
    }
    let v = v.clamp(-DECIMAL_2DP_LIMIT, DECIMAL_2DP_LIMIT);
    Decimal::from_str_exact(&format!("{:.2}", v)).unwrap_or_default()
}

/// Convert a Decimal to f64, defaulting to 0.0 for values that can't be represented.
pub(crate) fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Round an f64 to 2 decimal places.
pub(crate) fn round_2dp(v: f64) -> f64 {
    dec_to_f64(f64_to_decimal_2dp(v))
}
