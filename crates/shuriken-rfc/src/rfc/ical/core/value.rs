//! The typed iCalendar value union (RFC 5545 §3.3).

use std::fmt;

use super::{Date, DateTime, Duration, RRule, Time, UtcOffset};

/// A PERIOD value (RFC 5545 §3.3.9): either an explicit start/end pair or a
/// start plus a duration.
#[derive(Debug, Clone, PartialEq)]
pub enum Period {
    Explicit { start: DateTime, end: DateTime },
    Duration { start: DateTime, duration: Duration },
}

impl Period {
    #[must_use]
    pub const fn start(&self) -> &DateTime {
        match self {
            Self::Explicit { start, .. } | Self::Duration { start, .. } => start,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit { start, end } => write!(f, "{start}/{end}"),
            Self::Duration { start, duration } => write!(f, "{start}/{duration}"),
        }
    }
}

/// The resolved value of an iCalendar property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i32),
    Float(f64),
    Boolean(bool),
    Date(Date),
    DateList(Vec<Date>),
    DateTime(DateTime),
    DateTimeList(Vec<DateTime>),
    Duration(Duration),
    Period(Period),
    PeriodList(Vec<Period>),
    Recur(Box<RRule>),
    UtcOffset(UtcOffset),
    Time(Time),
    Uri(String),
    Binary(Vec<u8>),
    /// Raw, unresolved value (unknown or x-property).
    Unknown(String),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Uri(s) | Self::Unknown(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<i32> {
        if let Self::Integer(i) = self { Some(*i) } else { None }
    }

    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        if let Self::Boolean(b) = self { Some(*b) } else { None }
    }

    #[must_use]
    pub const fn as_datetime(&self) -> Option<&DateTime> {
        if let Self::DateTime(dt) = self { Some(dt) } else { None }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<&Date> {
        if let Self::Date(d) = self { Some(d) } else { None }
    }

    #[must_use]
    pub const fn as_duration(&self) -> Option<&Duration> {
        if let Self::Duration(d) = self { Some(d) } else { None }
    }

    #[must_use]
    pub const fn as_recur(&self) -> Option<&RRule> {
        if let Self::Recur(r) = self { Some(r) } else { None }
    }

    #[must_use]
    pub fn as_datetime_list(&self) -> Option<&[DateTime]> {
        match self {
            Self::DateTimeList(v) => Some(v),
            Self::DateTime(dt) => Some(std::slice::from_ref(dt)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date_list(&self) -> Option<&[Date]> {
        match self {
            Self::DateList(v) => Some(v),
            Self::Date(d) => Some(std::slice::from_ref(d)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_period_list(&self) -> Option<&[Period]> {
        match self {
            Self::PeriodList(v) => Some(v),
            Self::Period(p) => Some(std::slice::from_ref(p)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Uri(s) | Self::Unknown(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateList(list) => join_display(f, list),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::DateTimeList(list) => join_display(f, list),
            Self::Duration(d) => write!(f, "{d}"),
            Self::Period(p) => write!(f, "{p}"),
            Self::PeriodList(list) => join_display(f, list),
            Self::Recur(r) => write!(f, "{r}"),
            Self::UtcOffset(o) => write!(f, "{o}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::Binary(bytes) => {
                use base64::{Engine, engine::general_purpose::STANDARD};
                f.write_str(&STANDARD.encode(bytes))
            }
        }
    }
}

fn join_display<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
