//! Translation between iCalendar components and the JEVENT JSON document
//! model (a JSCalendar-shaped representation of a VEVENT and its recurrence
//! exceptions).
//!
//! ## Overview
//! [`to_document`] reads a VCALENDAR (or a bare VEVENT) into one
//! [`EventDocument`], folding `RECURRENCE-ID` siblings into its
//! `recurrence_overrides` table as flat JSON merge patches. [`to_component`]
//! is the inverse: it expands the overrides table back into sibling VEVENTs
//! with `RECURRENCE-ID` set, alongside plain `RDATE`/`EXDATE` entries for
//! overrides that only add or remove an occurrence.
//!
//! ## Usage
//! ```
//! use shuriken_rfc::rfc::ical;
//!
//! let calendar = ical::parse(
//!     "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\n\
//!      BEGIN:VEVENT\r\nUID:1@example.com\r\nDTSTART:20260201T090000Z\r\n\
//!      SUMMARY:Standup\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
//! )
//! .unwrap();
//!
//! let doc = ical::jevent::to_document(&calendar.root).unwrap();
//! assert_eq!(doc.title, "Standup");
//!
//! let mut ctx = ical::jevent::context::ConversionContext::new(
//!     ical::jevent::context::Direction::Write,
//!     ical::jevent::context::Mutation::Create,
//! );
//! let roundtripped = ical::jevent::to_component(&doc, None, &mut ctx).unwrap();
//! assert_eq!(roundtripped.events()[0].uid(), Some("1@example.com"));
//! ```
//!
//! ## Submodules
//! - [`model`]: the JEVENT document types.
//! - [`context`]: the conversion context and invalid-property JSON Pointer stack.
//! - [`xparams`]: private `X-` parameter names used to round-trip JEVENT-only fields.
//! - [`read`]: the ICAL -> JEVENT direction.
//! - [`write`]: the JEVENT -> ICAL direction.
//! - [`patch`]: flat JSON merge-patch helpers for the overrides table.

pub mod context;
pub mod model;
pub mod patch;
pub mod read;
pub mod write;
pub mod xparams;

pub use context::{ConversionError, ErrorCode};
pub use model::EventDocument;
pub use read::to_document;
pub use write::to_component;

/// Parses a JEVENT document from its canonical JSON representation.
///
/// ## Errors
/// Returns a [`serde_json::Error`] if `json` does not match the
/// [`EventDocument`] shape.
pub fn from_json(json: &str) -> serde_json::Result<EventDocument> {
    serde_json::from_str(json)
}

/// Serializes a JEVENT document to its canonical JSON representation.
///
/// ## Errors
/// Returns a [`serde_json::Error`] if serialization fails (this should not
/// happen for a well-formed [`EventDocument`]).
pub fn to_json(doc: &EventDocument) -> serde_json::Result<String> {
    serde_json::to_string(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "BEGIN:VCALENDAR\r\n\
        VERSION:2.0\r\n\
        PRODID:-//Test//EN\r\n\
        BEGIN:VEVENT\r\n\
        UID:1@example.com\r\n\
        DTSTART:20260201T090000Z\r\n\
        DTEND:20260201T093000Z\r\n\
        SUMMARY:Standup\r\n\
        END:VEVENT\r\n\
        END:VCALENDAR\r\n";

    #[test]
    fn round_trips_a_simple_event() {
        let calendar = crate::rfc::ical::parse(SIMPLE).expect("parses");
        let doc = to_document(&calendar.root).expect("translates");

        assert_eq!(doc.uid, "1@example.com");
        assert_eq!(doc.title, "Standup");
        assert_eq!(doc.duration, "PT30M");
        assert_eq!(doc.time_zone.as_deref(), Some("Etc/UTC"));

        let mut ctx = context::ConversionContext::new(context::Direction::Write, context::Mutation::Create);
        let container = to_component(&doc, None, &mut ctx).expect("valid document should build");
        let event = &container.events()[0];
        assert_eq!(event.uid(), Some("1@example.com"));
        assert_eq!(event.summary(), Some("Standup"));
    }

    #[test]
    fn json_round_trip_preserves_shape() {
        let calendar = crate::rfc::ical::parse(SIMPLE).expect("parses");
        let doc = to_document(&calendar.root).expect("translates");

        let json = to_json(&doc).expect("serializes");
        let reparsed = from_json(&json).expect("deserializes");
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn missing_uid_is_rejected() {
        let bare = crate::rfc::ical::core::Component::event();
        let err = to_document(&bare).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingUid);
    }
}
