//! VTIMEZONE parsing and local-time resolution (RFC 5545 §3.6.5).

use chrono::NaiveDateTime;

use crate::rfc::ical::core::{Component, ComponentKind};

/// A single STANDARD or DAYLIGHT observance within a VTIMEZONE.
#[derive(Debug, Clone)]
struct Observance {
    /// Local (pre-transition) DTSTART of this observance.
    onset: NaiveDateTime,
    /// UTC offset in effect before this observance, in seconds.
    offset_from: i32,
    /// UTC offset in effect during this observance, in seconds.
    offset_to: i32,
}

/// Error parsing a VTIMEZONE component.
#[derive(Debug, thiserror::Error)]
pub enum VTimezoneError {
    #[error("VTIMEZONE is missing a TZID property")]
    MissingTzid,

    #[error("VTIMEZONE observance is missing DTSTART, TZOFFSETFROM, or TZOFFSETTO")]
    IncompleteObservance,
}

/// A parsed VTIMEZONE, usable to convert local times into UTC without
/// consulting the system timezone database.
#[derive(Debug, Clone)]
pub struct VTimezone {
    pub tzid: String,
    observances: Vec<Observance>,
}

impl VTimezone {
    /// ## Errors
    /// Returns an error if the component has no TZID or its observances are
    /// missing required properties.
    pub fn parse(component: &Component) -> Result<Self, VTimezoneError> {
        let tzid = component
            .get_property("TZID")
            .and_then(|p| p.as_text())
            .ok_or(VTimezoneError::MissingTzid)?
            .to_string();

        let mut observances = Vec::new();
        for child in &component.children {
            if !matches!(child.kind, Some(ComponentKind::Standard | ComponentKind::Daylight)) {
                continue;
            }

            let onset = child
                .get_property("DTSTART")
                .and_then(|p| p.as_datetime())
                .ok_or(VTimezoneError::IncompleteObservance)?;
            let offset_from = parse_offset(child, "TZOFFSETFROM")?;
            let offset_to = parse_offset(child, "TZOFFSETTO")?;

            observances.push(Observance {
                onset: chrono::NaiveDate::from_ymd_opt(
                    i32::from(onset.year),
                    u32::from(onset.month),
                    u32::from(onset.day),
                )
                .and_then(|d| {
                    d.and_hms_opt(
                        u32::from(onset.hour),
                        u32::from(onset.minute),
                        u32::from(onset.second),
                    )
                })
                .ok_or(VTimezoneError::IncompleteObservance)?,
                offset_from,
                offset_to,
            });
        }

        observances.sort_by_key(|o| o.onset);

        Ok(Self { tzid, observances })
    }

    /// Converts a floating local datetime to UTC using the most recent
    /// observance whose onset precedes it (falling back to the earliest
    /// observance, or a zero offset if none are defined).
    #[must_use]
    pub fn to_utc(&self, local: NaiveDateTime) -> NaiveDateTime {
        let offset = self
            .observances
            .iter()
            .rev()
            .find(|o| o.onset <= local)
            .or_else(|| self.observances.first())
            .map_or(0, |o| o.offset_to);

        local - chrono::Duration::seconds(i64::from(offset))
    }
}

fn parse_offset(component: &Component, name: &str) -> Result<i32, VTimezoneError> {
    let raw = component
        .get_property(name)
        .ok_or(VTimezoneError::IncompleteObservance)?
        .as_text()
        .ok_or(VTimezoneError::IncompleteObservance)?;

    crate::rfc::ical::parse::parse_utc_offset(raw, 0, 0)
        .map(|o| o.total_seconds())
        .map_err(|_| VTimezoneError::IncompleteObservance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{DateTime, Property};

    fn fixed_vtimezone(tzid: &str, offset: &str) -> Component {
        let mut timezone = Component::new(ComponentKind::Timezone);
        timezone.add_property(Property::text("TZID", tzid));

        let mut standard = Component::new(ComponentKind::Standard);
        standard.add_property(Property::datetime(
            "DTSTART",
            DateTime::floating(2000, 1, 1, 0, 0, 0),
        ));
        standard.add_property(Property::text("TZOFFSETFROM", offset));
        standard.add_property(Property::text("TZOFFSETTO", offset));
        timezone.add_child(standard);

        timezone
    }

    #[test]
    fn parse_and_convert_fixed_offset() {
        let component = fixed_vtimezone("Test/Fixed", "+0200");
        let vtimezone = VTimezone::parse(&component).expect("should parse");
        assert_eq!(vtimezone.tzid, "Test/Fixed");

        let local = chrono::NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let utc = vtimezone.to_utc(local);
        assert_eq!(utc.time().hour(), 8);
    }

    use chrono::Timelike;

    #[test]
    fn missing_tzid_errors() {
        let component = Component::new(ComponentKind::Timezone);
        assert!(matches!(
            VTimezone::parse(&component),
            Err(VTimezoneError::MissingTzid)
        ));
    }
}
