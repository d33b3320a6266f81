//! Parse error types for the iCalendar parser.

use std::fmt;

/// The kind of failure encountered while lexing or parsing iCalendar text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingBegin,
    MissingEnd,
    MismatchedComponent,
    MissingPropertyName,
    InvalidPropertyName,
    InvalidParameter,
    UnclosedQuote,
    MissingColon,
    InvalidValue,
    InvalidDate,
    InvalidTime,
    InvalidDateTime,
    InvalidUtcOffset,
    InvalidDuration,
    InvalidPeriod,
    InvalidRRule,
    InvalidFrequency,
    InvalidWeekday,
    UntilCountConflict,
    InvalidBoolean,
    InvalidInteger,
    InvalidFloat,
}

impl ParseErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingBegin => "missing BEGIN",
            Self::MissingEnd => "missing END",
            Self::MismatchedComponent => "mismatched component",
            Self::MissingPropertyName => "missing property name",
            Self::InvalidPropertyName => "invalid property name",
            Self::InvalidParameter => "invalid parameter",
            Self::UnclosedQuote => "unclosed quote",
            Self::MissingColon => "missing colon",
            Self::InvalidValue => "invalid value",
            Self::InvalidDate => "invalid DATE value",
            Self::InvalidTime => "invalid TIME value",
            Self::InvalidDateTime => "invalid DATE-TIME value",
            Self::InvalidUtcOffset => "invalid UTC-OFFSET value",
            Self::InvalidDuration => "invalid DURATION value",
            Self::InvalidPeriod => "invalid PERIOD value",
            Self::InvalidRRule => "invalid RECUR value",
            Self::InvalidFrequency => "invalid FREQ value",
            Self::InvalidWeekday => "invalid weekday",
            Self::UntilCountConflict => "COUNT and UNTIL are mutually exclusive",
            Self::InvalidBoolean => "invalid BOOLEAN value",
            Self::InvalidInteger => "invalid INTEGER value",
            Self::InvalidFloat => "invalid FLOAT value",
        }
    }
}

/// A parse error, located by line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub col: usize,
    pub context: Option<String>,
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, line: usize, col: usize) -> Self {
        Self {
            kind,
            line,
            col,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.kind.as_str(),
            self.line,
            self.col
        )?;
        if let Some(context) = &self.context {
            write!(f, ": {context}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
