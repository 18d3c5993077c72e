//! One-decimal fixed-point values.
//!
//! A [`Fixed1`] stores `round(10 × real)` as an integer count of tenths, so
//! decimal rounding happens exactly once, at the integer level. Boundary
//! arithmetic (e.g. a compass heading wrapping modulo 360°) is applied to the
//! already-rounded tenths, which is why `359.96°` displays as `"0.0"` and
//! never as `"360.0"`.

use std::fmt;

/// A real value rounded to tenths, stored as the integer number of tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed1(pub i32);

impl Fixed1 {
    /// Round a real value to tenths.
    pub fn from_f64(value: f64) -> Self {
        Self((value * 10.0).round() as i32)
    }

    /// The stored number of tenths.
    pub fn tenths(self) -> i32 {
        self.0
    }
}

impl From<f64> for Fixed1 {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl fmt::Display for Fixed1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Split on the magnitude so values in (-1.0, 0.0) keep their sign.
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let text = format!("{sign}{}.{}", magnitude / 10, magnitude % 10);
        f.pad(&text)
    }
}
