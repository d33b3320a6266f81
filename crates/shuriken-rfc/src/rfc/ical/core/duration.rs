//! iCalendar DURATION value type (RFC 5545 §3.3.6).

use std::fmt;

/// A DURATION value.
///
/// Format: `[+|-]P[nW]` or `[+|-]P[nD][T[nH][nM][nS]]`. RFC 5545 forbids
/// mixing weeks with the other designators, so `weeks` is mutually exclusive
/// with the rest in practice, but we don't enforce that here -- callers that
/// build a `Duration` from scratch are expected to pick one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    pub negative: bool,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Duration {
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.weeks == 0 && self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Builds a duration from a total (possibly negative) number of seconds.
    #[must_use]
    pub fn from_seconds(total: i64) -> Self {
        let negative = total < 0;
        let mut remaining = total.unsigned_abs();

        let days = remaining / 86400;
        remaining %= 86400;
        let hours = remaining / 3600;
        remaining %= 3600;
        let minutes = remaining / 60;
        let seconds = remaining % 60;

        Self {
            negative,
            weeks: 0,
            days: u32::try_from(days).unwrap_or(u32::MAX),
            hours: u32::try_from(hours).unwrap_or(0),
            minutes: u32::try_from(minutes).unwrap_or(0),
            seconds: u32::try_from(seconds).unwrap_or(0),
        }
    }

    /// Returns the signed total duration in seconds.
    #[must_use]
    pub fn total_seconds(&self) -> i64 {
        let magnitude = i64::from(self.weeks) * 604_800
            + i64::from(self.days) * 86_400
            + i64::from(self.hours) * 3600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);
        if self.negative { -magnitude } else { magnitude }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }

        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;

        if self.weeks > 0 {
            return write!(f, "{}W", self.weeks);
        }

        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }

        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            f.write_str("T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 {
                write!(f, "{}S", self.seconds)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_zero_is_canonical() {
        assert_eq!(Duration::zero().to_string(), "P0D");
        assert_eq!(Duration::from_seconds(0).to_string(), "P0D");
    }

    #[test]
    fn duration_from_seconds_roundtrip() {
        let dur = Duration::from_seconds(3661);
        assert_eq!(dur.to_string(), "PT1H1M1S");
        assert_eq!(dur.total_seconds(), 3661);
    }

    #[test]
    fn duration_negative() {
        let dur = Duration::from_seconds(-900);
        assert!(dur.negative);
        assert_eq!(dur.to_string(), "-PT15M");
    }
}
