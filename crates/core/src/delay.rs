//! Validated wait durations
//!
//! [`Delay`] is the only way a debounce delay or throttle interval enters
//! the library. Construction rejects negative, non-finite and oversized
//! inputs, so every limiter can add its delay to an `Instant` without
//! overflowing.
//!
//! Serializes as milliseconds: an integer when the value is a whole number
//! of milliseconds, a float otherwise.

use crate::error::{PacerError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const MAX_SECS: u64 = 30 * 365 * 24 * 60 * 60;

/// Non-negative, finite wait duration of at most [`Delay::MAX`]
///
/// # Examples
///
/// ```
/// use pacer_core::Delay;
///
/// let d = Delay::try_from(1.5_f64).unwrap();
/// assert_eq!(d.as_duration().as_micros(), 1500);
///
/// assert!(Delay::try_from(-1_i64).is_err());
/// assert!(Delay::try_from(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "f64")]
pub struct Delay(Duration);

impl Delay {
    /// Zero delay
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Longest accepted delay (30 years)
    pub const MAX: Self = Self(Duration::from_secs(MAX_SECS));

    /// Create from whole milliseconds, saturating at [`Delay::MAX`]
    pub const fn from_millis(ms: u64) -> Self {
        if ms / 1000 >= MAX_SECS {
            Self::MAX
        } else {
            Self(Duration::from_millis(ms))
        }
    }

    /// Create from a [`Duration`], rejecting anything above [`Delay::MAX`]
    pub fn try_from_duration(d: Duration) -> Result<Self> {
        if d > Self::MAX.0 {
            return Err(PacerError::invalid(
                "delay",
                format!("must be at most {} (got {:?})", Self::MAX, d),
            ));
        }
        Ok(Self(d))
    }

    /// Create from (possibly fractional) milliseconds
    ///
    /// Fails with [`PacerError::InvalidArgument`] for negative, NaN or
    /// infinite input, and for values too large to represent.
    pub fn try_from_millis_f64(ms: f64) -> Result<Self> {
        if !ms.is_finite() {
            return Err(PacerError::invalid(
                "delay",
                format!("must be finite (got {ms})"),
            ));
        }
        if ms < 0.0 {
            return Err(PacerError::invalid(
                "delay",
                format!("must not be negative (got {ms}ms)"),
            ));
        }

        let d = Duration::try_from_secs_f64(ms / 1000.0)
            .map_err(|e| PacerError::invalid("delay", e.to_string()))?;
        Self::try_from_duration(d)
    }

    /// Get as a std [`Duration`]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Get as fractional milliseconds
    pub fn as_millis_f64(&self) -> f64 {
        self.0.as_secs_f64() * 1000.0
    }

    /// Whether this delay is zero
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_whole_millis(&self) -> bool {
        self.0.subsec_nanos() % 1_000_000 == 0
    }
}

impl TryFrom<Duration> for Delay {
    type Error = PacerError;

    fn try_from(d: Duration) -> Result<Self> {
        Self::try_from_duration(d)
    }
}

impl From<Delay> for Duration {
    fn from(d: Delay) -> Self {
        d.0
    }
}

impl TryFrom<u64> for Delay {
    type Error = PacerError;

    fn try_from(ms: u64) -> Result<Self> {
        Self::try_from_duration(Duration::from_millis(ms))
    }
}

impl TryFrom<i64> for Delay {
    type Error = PacerError;

    fn try_from(ms: i64) -> Result<Self> {
        let ms = u64::try_from(ms)
            .map_err(|_| PacerError::invalid("delay", format!("must not be negative (got {ms}ms)")))?;
        Self::try_from(ms)
    }
}

impl TryFrom<f64> for Delay {
    type Error = PacerError;

    fn try_from(ms: f64) -> Result<Self> {
        Self::try_from_millis_f64(ms)
    }
}

impl Serialize for Delay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_whole_millis() {
            // Bounded by MAX, so the millisecond count fits in a u64
            serializer.serialize_u64(u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX))
        } else {
            serializer.serialize_f64(self.as_millis_f64())
        }
    }
}

/// Parse `"250"`, `"250ms"`, `"1.5s"` or `"0.5 ms"`
impl FromStr for Delay {
    type Err = PacerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (number, scale) = if let Some(n) = s.strip_suffix("ms") {
            (n, 1.0)
        } else if let Some(n) = s.strip_suffix('s') {
            (n, 1000.0)
        } else {
            (s, 1.0)
        };

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| PacerError::invalid("delay", format!("not a duration: '{s}'")))?;

        Self::try_from_millis_f64(value * scale)
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole_millis() {
            write!(f, "{}ms", self.0.as_millis())
        } else {
            write!(f, "{}ms", self.as_millis_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_and_non_finite() {
        for bad in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Delay::try_from(bad).unwrap_err();
            assert!(matches!(err, PacerError::InvalidArgument { name: "delay", .. }), "{bad}");
        }
        assert!(Delay::try_from(-100_i64).is_err());
    }

    #[test]
    fn test_rejects_oversized() {
        for bad in [1e22, 1e15] {
            let err = Delay::try_from(bad).unwrap_err();
            assert!(matches!(err, PacerError::InvalidArgument { name: "delay", .. }), "{bad}");
        }
        assert!(Delay::try_from(Duration::MAX).is_err());
        assert!(Delay::try_from(u64::MAX).is_err());
        assert!(Delay::try_from(i64::MAX).is_err());
        assert!("1e20s".parse::<Delay>().is_err());

        assert_eq!(Delay::try_from(Delay::MAX.as_duration()).unwrap(), Delay::MAX);
        assert_eq!(Delay::from_millis(u64::MAX), Delay::MAX);
    }

    #[test]
    fn test_max_fits_an_instant() {
        let now = std::time::Instant::now();
        assert!(now.checked_add(Delay::MAX.as_duration()).is_some());
    }

    #[test]
    fn test_zero_is_allowed() {
        let d = Delay::try_from(0.0).unwrap();
        assert!(d.is_zero());
        assert_eq!(d, Delay::ZERO);
    }

    #[test]
    fn test_fractional_millis_preserved() {
        let d = Delay::try_from(0.25).unwrap();
        assert_eq!(d.as_duration(), Duration::from_micros(250));
        assert_eq!(d.to_string(), "0.25ms");
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("250".parse::<Delay>().unwrap(), Delay::from_millis(250));
        assert_eq!("250ms".parse::<Delay>().unwrap(), Delay::from_millis(250));
        assert_eq!("1.5s".parse::<Delay>().unwrap(), Delay::from_millis(1500));
        assert_eq!(" 40 ms ".parse::<Delay>().unwrap(), Delay::from_millis(40));
        assert!("-3ms".parse::<Delay>().is_err());
        assert!("soon".parse::<Delay>().is_err());
    }

    #[test]
    fn test_serializes_as_millis() {
        assert_eq!(serde_json::to_string(&Delay::from_millis(100)).unwrap(), "100");
        assert_eq!(serde_json::to_string(&Delay::try_from(2.5).unwrap()).unwrap(), "2.5");

        let d: Delay = serde_json::from_str("75").unwrap();
        assert_eq!(d, Delay::from_millis(75));
        assert!(serde_json::from_str::<Delay>("-1").is_err());
    }
}
