//! Shared iCalendar fixtures for parser/serializer tests.

pub const VEVENT_MINIMAL: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:minimal-event@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T163000Z\r\n\
SUMMARY:Minimal event\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_RECURRING: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:recurring-event@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T163000Z\r\n\
SUMMARY:Weekly meeting\r\n\
RRULE:FREQ=WEEKLY;COUNT=10;BYDAY=MO,WE,FR\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VTODO_BASIC: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VTODO\r\n\
UID:todo-basic@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
SUMMARY:Finish report\r\n\
DUE:19970915T000000Z\r\n\
PRIORITY:1\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

pub const VJOURNAL_BASIC: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VJOURNAL\r\n\
UID:journal-basic@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T000000Z\r\n\
SUMMARY:Daily notes\r\n\
DESCRIPTION:Met with the team to discuss the schedule.\r\n\
END:VJOURNAL\r\n\
END:VCALENDAR\r\n";

pub const VFREEBUSY_REQUEST: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VFREEBUSY\r\n\
UID:freebusy-request@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19971001T000000Z\r\n\
DTEND:19971002T000000Z\r\n\
FREEBUSY:19971001T120000Z/19971001T130000Z,19971001T160000Z/PT1H\r\n\
END:VFREEBUSY\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_WITH_ALARM: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:event-with-alarm@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T163000Z\r\n\
SUMMARY:Dentist appointment\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
DESCRIPTION:Reminder\r\n\
TRIGGER:-PT15M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_WITH_ALARM_REPEAT: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:event-with-alarm-repeat@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T163000Z\r\n\
SUMMARY:Conference call\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
DESCRIPTION:Reminder\r\n\
TRIGGER:-PT15M\r\n\
REPEAT:3\r\n\
DURATION:PT5M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VTODO_WITH_ALARM_AUDIO: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VTODO\r\n\
UID:todo-with-alarm-audio@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
SUMMARY:Submit taxes\r\n\
DUE:19970915T000000Z\r\n\
BEGIN:VALARM\r\n\
ACTION:AUDIO\r\n\
TRIGGER:-P1D\r\n\
END:VALARM\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_WITH_TIMEZONE: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:America/New_York\r\n\
BEGIN:STANDARD\r\n\
DTSTART:20071104T020000\r\n\
TZOFFSETFROM:-0400\r\n\
TZOFFSETTO:-0500\r\n\
TZNAME:EST\r\n\
END:STANDARD\r\n\
BEGIN:DAYLIGHT\r\n\
DTSTART:20070311T020000\r\n\
TZOFFSETFROM:-0500\r\n\
TZOFFSETTO:-0400\r\n\
TZNAME:EDT\r\n\
END:DAYLIGHT\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
UID:event-with-timezone@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART;TZID=America/New_York:19970903T163000\r\n\
SUMMARY:Zoned event\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_WITH_ATTENDEES: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:event-with-attendees@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T163000Z\r\n\
SUMMARY:Project sync\r\n\
ORGANIZER;CN=Alice:mailto:alice@example.com\r\n\
ATTENDEE;CN=Bob;PARTSTAT=ACCEPTED;ROLE=REQ-PARTICIPANT:mailto:bob@example.com\r\n\
ATTENDEE;CN=Carol;PARTSTAT=NEEDS-ACTION;RSVP=TRUE:mailto:carol@example.com\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_ALL_DAY: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:event-all-day@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART;VALUE=DATE:19971003\r\n\
DTEND;VALUE=DATE:19971004\r\n\
SUMMARY:Company holiday\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_WITH_GEO: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:event-with-geo@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T163000Z\r\n\
SUMMARY:Offsite\r\n\
LOCATION:Conference Center\r\n\
GEO:37.386013;-122.082932\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

pub const VEVENT_WITH_EXDATE: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:event-with-exdate@example.com\r\n\
DTSTAMP:19970901T130000Z\r\n\
DTSTART:19970903T163000Z\r\n\
SUMMARY:Weekly standup\r\n\
RRULE:FREQ=WEEKLY;COUNT=8\r\n\
EXDATE:19970910T163000Z,19970917T163000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
