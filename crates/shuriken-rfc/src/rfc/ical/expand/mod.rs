//! Timezone expansion and UTC normalization for iCalendar date-times.

mod timezone;
mod vtimezone;

pub use timezone::{
    build_timezone_resolver, convert_to_utc, ConversionError, TimeZoneResolver,
};
pub use vtimezone::{VTimezone, VTimezoneError};
