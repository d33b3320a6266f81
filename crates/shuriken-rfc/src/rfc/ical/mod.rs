//! iCalendar implementation (RFC 5545) and the JEVENT translation layer built on it.
//!
//! ## Overview
//!
//! iCalendar is the wire format used by CalDAV for VEVENT/VTODO/VJOURNAL/VFREEBUSY
//! resources. This module provides parsing, serialization, and timezone expansion for
//! that format, plus a bidirectional translator (`jevent`) between iCalendar components
//! and the JSON-based JEVENT calendar event document model.
//!
//! ## Usage
//!
//! ```rust
//! use shuriken_rfc::rfc::ical::{parse, build::serialize};
//!
//! let input = "\
//! BEGIN:VCALENDAR\r\n\
//! VERSION:2.0\r\n\
//! PRODID:-//Test//Test//EN\r\n\
//! BEGIN:VEVENT\r\n\
//! UID:test@example.com\r\n\
//! DTSTAMP:19970901T130000Z\r\n\
//! DTSTART:19970903T163000Z\r\n\
//! SUMMARY:Meeting\r\n\
//! END:VEVENT\r\n\
//! END:VCALENDAR\r\n";
//!
//! let ical = parse(input).unwrap();
//! let out = serialize(&ical);
//! assert!(out.contains("SUMMARY:Meeting"));
//! ```
//!
//! ## Submodules
//!
//! - [`core`] - Core types (`ICalendar`, `Component`, `Property`, `Value`, `RRule`, ...)
//! - [`parse`] - Lexer and value parsers
//! - [`build`] - Serialization with canonical property ordering
//! - [`expand`] - Timezone resolution and UTC conversion
//! - [`jevent`] - JEVENT document translation

pub mod build;
pub mod core;
pub mod expand;
pub mod jevent;
pub mod parse;

#[cfg(test)]
mod tests;

pub use build::serialize;
pub use core::{Component, ComponentKind, ICalendar};
pub use parse::parse;
