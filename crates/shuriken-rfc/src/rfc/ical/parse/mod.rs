//! iCalendar parsing (RFC 5545).
//!
//! This module provides parsers for iCalendar content:
//! - Lexer: line unfolding and content-line tokenization
//! - Values: typed value parsers (DATE, DATE-TIME, DURATION, RECUR, ...)
//! - Parser: full document parsing into [`crate::rfc::ical::core::ICalendar`]

mod error;
mod lexer;
mod parser;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{parse_content_line, split_lines, unfold};
pub use parser::parse;
pub use values::{
    parse_boolean, parse_date, parse_datetime, parse_duration, parse_float, parse_integer,
    parse_period, parse_rrule, parse_utc_offset, parse_time, unescape_text,
};
