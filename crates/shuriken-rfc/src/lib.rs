//! RFC protocol implementations for calendaring: iCalendar parsing, serialization,
//! timezone expansion, and translation to and from the JEVENT document model.

pub mod error;
pub mod rfc;

pub use error::{RfcError, RfcResult};
