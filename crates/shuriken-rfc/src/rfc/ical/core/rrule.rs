//! iCalendar RECUR value type (RFC 5545 §3.3.10, with the RFC 7529 RSCALE/SKIP extension).

use std::fmt;

use super::{Date, DateTime};

/// Recurrence frequency (RFC 5545 §3.3.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SECONDLY" => Some(Self::Secondly),
            "MINUTELY" => Some(Self::Minutely),
            "HOURLY" => Some(Self::Hourly),
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekday tag used in BYDAY and WKST (RFC 5545 §3.3.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MO" => Some(Self::Monday),
            "TU" => Some(Self::Tuesday),
            "WE" => Some(Self::Wednesday),
            "TH" => Some(Self::Thursday),
            "FR" => Some(Self::Friday),
            "SA" => Some(Self::Saturday),
            "SU" => Some(Self::Sunday),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A BYDAY entry: a weekday, optionally qualified with a signed ordinal
/// (e.g. `-1FR` = the last Friday of the period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayNum {
    pub ordinal: Option<i8>,
    pub weekday: Weekday,
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        write!(f, "{}", self.weekday)
    }
}

/// A BYMONTH entry: a month number, optionally flagged as a leap month
/// under RSCALE calendars that have them (RFC 7529).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRule {
    pub month: u8,
    pub leap: bool,
}

impl MonthRule {
    #[must_use]
    pub const fn plain(month: u8) -> Self {
        Self { month, leap: false }
    }
}

impl fmt::Display for MonthRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.month)?;
        if self.leap {
            f.write_str("L")?;
        }
        Ok(())
    }
}

/// The RRULE terminator: either COUNT or UNTIL, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RRuleUntil {
    Date(Date),
    DateTime(DateTime),
}

impl fmt::Display for RRuleUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

/// RSCALE SKIP behavior for dates that don't exist in the target calendar
/// scale (RFC 7529 §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Skip {
    Omit,
    Backward,
    Forward,
}

impl Skip {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OMIT" => Some(Self::Omit),
            "BACKWARD" => Some(Self::Backward),
            "FORWARD" => Some(Self::Forward),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Omit => "OMIT",
            Self::Backward => "BACKWARD",
            Self::Forward => "FORWARD",
        }
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A RECUR value (RFC 5545 §3.3.10 + RFC 7529 RSCALE/SKIP).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RRule {
    pub freq: Option<Frequency>,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub until: Option<RRuleUntil>,
    pub wkst: Option<Weekday>,
    pub rscale: Option<String>,
    pub skip: Option<Skip>,
    pub by_second: Vec<u8>,
    pub by_minute: Vec<u8>,
    pub by_hour: Vec<u8>,
    pub by_day: Vec<WeekdayNum>,
    pub by_monthday: Vec<i8>,
    pub by_yearday: Vec<i16>,
    pub by_weekno: Vec<i8>,
    pub by_month: Vec<MonthRule>,
    pub by_setpos: Vec<i16>,
}

impl RRule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for RRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if let Some(rscale) = &self.rscale {
            parts.push(format!("RSCALE={rscale}"));
        }
        if let Some(freq) = self.freq {
            parts.push(format!("FREQ={freq}"));
        }
        if let Some(interval) = self.interval
            && interval != 1
        {
            parts.push(format!("INTERVAL={interval}"));
        }
        if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }
        if let Some(until) = &self.until {
            parts.push(format!("UNTIL={until}"));
        }
        if let Some(wkst) = self.wkst {
            parts.push(format!("WKST={wkst}"));
        }
        if !self.by_month.is_empty() {
            parts.push(format!("BYMONTH={}", join(&self.by_month)));
        }
        if !self.by_weekno.is_empty() {
            parts.push(format!("BYWEEKNO={}", join(&self.by_weekno)));
        }
        if !self.by_yearday.is_empty() {
            parts.push(format!("BYYEARDAY={}", join(&self.by_yearday)));
        }
        if !self.by_monthday.is_empty() {
            parts.push(format!("BYMONTHDAY={}", join(&self.by_monthday)));
        }
        if !self.by_day.is_empty() {
            parts.push(format!("BYDAY={}", join(&self.by_day)));
        }
        if !self.by_hour.is_empty() {
            parts.push(format!("BYHOUR={}", join(&self.by_hour)));
        }
        if !self.by_minute.is_empty() {
            parts.push(format!("BYMINUTE={}", join(&self.by_minute)));
        }
        if !self.by_second.is_empty() {
            parts.push(format!("BYSECOND={}", join(&self.by_second)));
        }
        if !self.by_setpos.is_empty() {
            parts.push(format!("BYSETPOS={}", join(&self.by_setpos)));
        }
        if let Some(skip) = self.skip {
            parts.push(format!("SKIP={skip}"));
        }

        f.write_str(&parts.join(";"))
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(std::string::ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rrule_display_basic() {
        let mut rule = RRule::new();
        rule.freq = Some(Frequency::Weekly);
        rule.count = Some(4);
        rule.by_day = vec![WeekdayNum {
            ordinal: None,
            weekday: Weekday::Monday,
        }];
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;COUNT=4;BYDAY=MO");
    }

    #[test]
    fn rrule_display_omits_interval_one() {
        let mut rule = RRule::new();
        rule.freq = Some(Frequency::Daily);
        rule.interval = Some(1);
        assert_eq!(rule.to_string(), "FREQ=DAILY");
    }

    #[test]
    fn month_rule_leap_suffix() {
        let leap = MonthRule { month: 3, leap: true };
        assert_eq!(leap.to_string(), "3L");
    }
}
