//! Full iCalendar document serialization with canonical property ordering.

use super::escape::escape_param_value;
use super::fold::fold_line;
use crate::rfc::ical::core::{Component, ICalendar, Property};

/// Serializes a full iCalendar document, including the VCALENDAR wrapper.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    let mut out = String::new();
    serialize_component_into(&ical.root, &mut out);
    out
}

/// Serializes a single component (and its children) as content lines.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut out = String::new();
    serialize_component_into(component, &mut out);
    out
}

fn serialize_component_into(component: &Component, out: &mut String) {
    push_line(out, &format!("BEGIN:{}", component.name));

    for property in &component.properties {
        out.push_str(&serialize_property(property));
    }

    for child in &component.children {
        serialize_component_into(child, out);
    }

    push_line(out, &format!("END:{}", component.name));
}

/// Serializes a single property as one (possibly folded) content line,
/// including its trailing CRLF.
#[must_use]
pub fn serialize_property(property: &Property) -> String {
    let mut line = property.name.clone();

    for param in &property.params {
        line.push(';');
        line.push_str(&param.name);
        line.push('=');
        line.push_str(
            &param
                .values
                .iter()
                .map(|v| escape_param_value(v))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    line.push(':');
    line.push_str(&property.raw_value);

    let mut out = fold_line(&line);
    out.push_str("\r\n");
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{ComponentKind, Parameter};

    #[test]
    fn serialize_minimal_calendar() {
        let ical = ICalendar::new("-//Test//Test//EN");
        let out = serialize(&ical);
        assert!(out.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(out.contains("VERSION:2.0\r\n"));
        assert!(out.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn serialize_property_with_params() {
        let mut prop = Property::text("DTSTART", "20260123T120000");
        prop.add_param(Parameter::tzid("America/New_York"));
        let line = serialize_property(&prop);
        assert_eq!(line, "DTSTART;TZID=America/New_York:20260123T120000\r\n");
    }

    #[test]
    fn serialize_event_roundtrip_shape() {
        let mut ical = ICalendar::new("-//Test//Test//EN");
        let mut event = Component::new(ComponentKind::Event);
        event.add_property(Property::text("UID", "abc-123"));
        event.add_property(Property::text("SUMMARY", "Team Meeting"));
        ical.add_event(event);

        let out = serialize(&ical);
        assert!(out.contains("BEGIN:VEVENT\r\n"));
        assert!(out.contains("UID:abc-123\r\n"));
        assert!(out.contains("END:VEVENT\r\n"));
    }
}
