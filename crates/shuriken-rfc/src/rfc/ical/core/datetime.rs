//! iCalendar date and time value types (RFC 5545 §3.3.4, §3.3.5, §3.3.12, §3.3.14).

use std::fmt;

/// A DATE value (RFC 5545 §3.3.4). Format: YYYYMMDD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// A TIME value (RFC 5545 §3.3.12). Format: HHMMSS[Z].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub is_utc: bool,
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
        if self.is_utc {
            f.write_str("Z")?;
        }
        Ok(())
    }
}

/// The temporal anchor of a DATE-TIME value: absolute UTC, floating (no
/// zone), or tied to a named timezone via a TZID parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateTimeForm {
    Utc,
    Floating,
    Zoned { tzid: String },
}

/// A DATE-TIME value (RFC 5545 §3.3.5). Format: YYYYMMDD"T"HHMMSS[Z].
///
/// TZID is a property parameter in the wire format, not part of the value
/// grammar itself, but we fold it into [`DateTimeForm::Zoned`] here since
/// every caller needs start/end zone together with the local fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub form: DateTimeForm,
}

impl DateTime {
    #[must_use]
    pub const fn floating(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Floating,
        }
    }

    #[must_use]
    pub const fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Utc,
        }
    }

    #[must_use]
    pub fn zoned(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        tzid: impl Into<String>,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Zoned { tzid: tzid.into() },
        }
    }

    #[must_use]
    pub fn from_date(date: Date, hour: u8, minute: u8, second: u8, form: DateTimeForm) -> Self {
        Self {
            year: date.year,
            month: date.month,
            day: date.day,
            hour,
            minute,
            second,
            form,
        }
    }

    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self.form, DateTimeForm::Utc)
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self.form, DateTimeForm::Floating)
    }

    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match &self.form {
            DateTimeForm::Zoned { tzid } => Some(tzid),
            DateTimeForm::Utc | DateTimeForm::Floating => None,
        }
    }

    #[must_use]
    pub const fn date(&self) -> Date {
        Date {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    #[must_use]
    pub const fn is_midnight(&self) -> bool {
        self.hour == 0 && self.minute == 0 && self.second == 0
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}T{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.is_utc() {
            f.write_str("Z")?;
        }
        Ok(())
    }
}

/// A UTC-OFFSET value (RFC 5545 §3.3.14). Format: (+|-)HHMM[SS].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    total_seconds: i32,
}

impl UtcOffset {
    #[must_use]
    pub const fn from_seconds(total_seconds: i32) -> Self {
        Self { total_seconds }
    }

    #[must_use]
    pub const fn total_seconds(self) -> i32 {
        self.total_seconds
    }

    #[must_use]
    pub const fn hours(self) -> i32 {
        self.total_seconds / 3600
    }

    #[must_use]
    pub const fn minutes(self) -> i32 {
        (self.total_seconds.abs() / 60) % 60
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.total_seconds < 0 { '-' } else { '+' };
        let abs = self.total_seconds.abs();
        write!(f, "{sign}{:02}{:02}", abs / 3600, (abs / 60) % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_display_utc() {
        let dt = DateTime::utc(2026, 1, 23, 12, 0, 0);
        assert_eq!(dt.to_string(), "20260123T120000Z");
    }

    #[test]
    fn datetime_display_floating() {
        let dt = DateTime::floating(2026, 1, 23, 12, 0, 0);
        assert_eq!(dt.to_string(), "20260123T120000");
    }

    #[test]
    fn utc_offset_roundtrip() {
        let offset = UtcOffset::from_seconds(-8 * 3600);
        assert_eq!(offset.to_string(), "-0800");
        assert_eq!(offset.hours(), -8);
    }
}
