//! # Fixed-Point Decimals
//!
//! Averages and growth figures are kept as integer tenths so that every
//! aggregate is exact and reproducible. Rounding is half away from zero.
//!
//! Conversion to a JSON number happens only at the serialization boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A signed decimal with exactly one fractional digit, stored as tenths.
///
/// `Tenths::from_tenths(13)` is `1.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tenths(i64);

impl Tenths {
    /// Zero.
    pub const ZERO: Tenths = Tenths(0);

    /// Build from a raw tenths count.
    #[must_use]
    pub const fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    /// Build from a whole number.
    #[must_use]
    pub const fn from_whole(whole: i64) -> Self {
        Self(whole.saturating_mul(10))
    }

    /// The raw tenths count.
    #[must_use]
    pub const fn tenths(self) -> i64 {
        self.0
    }

    /// `sum / count`, rounded to one decimal. Zero when `count` is zero.
    #[must_use]
    pub fn average(sum: u64, count: u64) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        let scaled = i128::from(sum) * 10;
        Self(div_round(scaled, i128::from(count)))
    }

    /// Absolute change `self - earlier`.
    #[must_use]
    pub const fn minus(self, earlier: Tenths) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }

    /// Percentage change from `previous` to `current`, rounded to one decimal.
    ///
    /// Zero when `previous` is not positive, so a skill that appears from
    /// nothing reports no growth instead of dividing by zero.
    #[must_use]
    pub fn percent_change(current: Tenths, previous: Tenths) -> Self {
        if previous.0 <= 0 {
            return Self::ZERO;
        }
        let delta = i128::from(current.0) - i128::from(previous.0);
        Self(div_round(delta * 1000, i128::from(previous.0)))
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Integer division rounding half away from zero. `denominator` must be > 0.
fn div_round(numerator: i128, denominator: i128) -> i64 {
    let magnitude = (numerator.abs() * 2 + denominator) / (denominator * 2);
    let signed = if numerator < 0 { -magnitude } else { magnitude };
    i64::try_from(signed).unwrap_or(if signed < 0 { i64::MIN } else { i64::MAX })
}

impl std::fmt::Display for Tenths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

impl Serialize for Tenths {
    #[allow(clippy::float_arithmetic)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 10.0)
    }
}

impl<'de> Deserialize<'de> for Tenths {
    #[allow(clippy::float_arithmetic)]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("decimal must be finite"));
        }
        Ok(Self((value * 10.0).round() as i64))
    }
}

// =============================================================================
// TESTS
// =============================================================================
