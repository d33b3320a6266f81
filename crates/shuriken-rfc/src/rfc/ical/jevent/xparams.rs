//! Private `X-` parameter names used to round-trip JEVENT-only fields through
//! ICAL properties. These are stable wire identifiers; never rename one that
//! has shipped.

pub const EVENT_ID: &str = "X-JEVENT-ID";
pub const PARTICIPANT_ID: &str = "X-JEVENT-PARTICIPANT-ID";
pub const LOCATION_ID: &str = "X-JEVENT-LOCATION-ID";
pub const LINK_ID: &str = "X-JEVENT-LINK-ID";
pub const ROLES: &str = "X-JEVENT-ROLES";
pub const CID: &str = "X-JEVENT-CID";
pub const TITLE: &str = "X-JEVENT-TITLE";
pub const REL: &str = "X-JEVENT-REL";
pub const GEO: &str = "X-JEVENT-GEO";
pub const DESCRIPTION: &str = "X-JEVENT-DESCRIPTION";
pub const TZID: &str = "X-JEVENT-TZID";
pub const FEATURES: &str = "X-JEVENT-FEATURES";
pub const PROPERTIES: &str = "X-JEVENT-PROPERTIES";
pub const SEQUENCE: &str = "X-JEVENT-SEQUENCE";
pub const DTSTAMP: &str = "X-JEVENT-DTSTAMP";
pub const USE_DEFAULT_ALERTS: &str = "X-JEVENT-USE-DEFAULT-ALERTS";
pub const WEB_RSVP: &str = "X-JEVENT-WEB-RSVP";
pub const URI: &str = "X-JEVENT-URI";

/// Private property name used for a location that doesn't fit LOCATION,
/// GEO, or CONFERENCE.
pub const LOCATION_PROPERTY: &str = "X-LOCATION";
/// Private property name used for a link/attachment alongside ATTACH.
pub const ATTACH_PROPERTY: &str = "X-ATTACH";
