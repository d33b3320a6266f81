//! JEVENT -> ICAL write path (§4.2-§4.8 of the calendaring translation design).

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDateTime;

use crate::rfc::ical::core::{
    Component, ComponentKind, Date, DateTime as IcalDateTime, Duration as IcalDuration,
    Frequency as IcalFrequency, MonthRule, Parameter, Property, RRule, RRuleUntil, Skip as IcalSkip,
    Value, Weekday, WeekdayNum,
};

use super::context::{with_path, ConversionContext, Direction, Mutation};
use super::model::*;
use super::xparams;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Property names this translator owns outright: every call purges these
/// from the base component (fresh or cloned from an `existing` one) before
/// rewriting them, so update mode never leaves a stale duplicate behind
/// while properties it doesn't model pass through untouched.
const KNOWN_PROPERTY_NAMES: &[&str] = &[
    "UID",
    "SUMMARY",
    "DESCRIPTION",
    "COLOR",
    "CATEGORIES",
    "CLASS",
    "TRANSP",
    "STATUS",
    "PRIORITY",
    "SEQUENCE",
    "CREATED",
    "LAST-MODIFIED",
    "DTSTART",
    "DTEND",
    "DURATION",
    "RRULE",
    "RDATE",
    "EXDATE",
    "ORGANIZER",
    "ATTENDEE",
    "LOCATION",
    "GEO",
    "CONFERENCE",
    "ATTACH",
    "RELATED-TO",
    xparams::LOCATION_PROPERTY,
    xparams::ATTACH_PROPERTY,
    xparams::PARTICIPANT_ID,
];

fn purge_known_properties(component: &mut Component) {
    for name in KNOWN_PROPERTY_NAMES {
        component.remove_properties(name);
    }
    component.remove_children_of_kind(ComponentKind::Alarm);
}

/// Converts a JEVENT document into a VCALENDAR container holding the master
/// VEVENT and one sibling VEVENT per recurrence override that carries field
/// changes beyond a plain RDATE/EXDATE.
///
/// When `existing` is given, the master (and the calendar wrapper) are
/// cloned from it first and only the properties this translator owns are
/// purged and rewritten, so properties `existing` carries that this model
/// has no field for survive the round trip. Structural violations (for
/// example an RRULE with both `count` and `until`) are recorded on `ctx`
/// rather than rejected outright; if any were recorded, the call returns
/// `None` and no ICAL output is produced.
#[must_use]
#[tracing::instrument(skip(doc, existing, ctx), fields(uid = %doc.uid))]
pub fn to_component(doc: &EventDocument, existing: Option<&Component>, ctx: &mut ConversionContext) -> Option<Component> {
    ctx.mutation = if existing.is_some() { Mutation::Update } else { Mutation::Create };

    let mut calendar = existing
        .filter(|c| c.kind == Some(ComponentKind::Calendar))
        .cloned()
        .unwrap_or_else(Component::calendar);
    calendar.remove_children_of_kind(ComponentKind::Event);
    if calendar.get_property("PRODID").is_none() {
        let prod_id = if doc.prod_id.is_empty() {
            "-//JEVENT Translator//EN"
        } else {
            doc.prod_id.as_str()
        };
        calendar.add_property(Property::text("PRODID", prod_id));
        calendar.add_property(Property::text("VERSION", "2.0"));
    }

    let existing_master = existing.and_then(|c| match c.kind {
        Some(ComponentKind::Calendar) => c.events().into_iter().find(|e| e.get_property("RECURRENCE-ID").is_none()).cloned(),
        _ => Some(c.clone()),
    });

    let mut master = write_single(existing_master.unwrap_or_else(Component::event), doc, ctx);
    write_recurrence_rule(&mut master, doc.recurrence_rule.as_ref(), ctx);

    let master_value = serde_json::to_value(doc).unwrap_or(serde_json::Value::Null);

    let mut rdates = Vec::new();
    let mut exdates = Vec::new();
    let mut exceptions = Vec::new();

    for (key, patch) in &doc.recurrence_overrides {
        if is_excluded(patch) {
            exdates.push(key.clone());
        } else if patch.is_empty() {
            rdates.push(key.clone());
        } else {
            exceptions.push((key.clone(), patch.clone()));
        }
    }

    if !rdates.is_empty() {
        master.add_property(build_date_list_property("RDATE", &rdates, doc.is_all_day));
    }
    if !exdates.is_empty() {
        master.add_property(build_date_list_property("EXDATE", &exdates, doc.is_all_day));
    }

    calendar.add_child(master);

    tracing::debug!(rdates = rdates.len(), exdates = exdates.len(), exceptions = exceptions.len(), "materializing overrides");

    for (key, patch) in exceptions {
        let mut patch = patch;
        for forbidden in EventDocument::FORBIDDEN_OVERRIDE_KEYS {
            patch.remove(*forbidden);
        }

        let merged = super::patch::apply(&master_value, &patch);
        let Ok(mut override_doc) = serde_json::from_value::<EventDocument>(merged) else {
            tracing::warn!(%key, "override patch produced an invalid event document, skipping");
            continue;
        };
        override_doc.recurrence_overrides.clear();
        override_doc.recurrence_rule = None;

        let mut exception_ctx = ConversionContext::new(Direction::Write, Mutation::Create);
        exception_ctx.exception = true;
        let mut sibling = write_single(Component::event(), &override_doc, &mut exception_ctx);
        sibling.add_property(recurrence_id_property(&key, doc.is_all_day, doc.time_zone.as_deref()));
        calendar.add_child(sibling);

        let escaped_key = key.replace('~', "~0").replace('/', "~1");
        ctx.extend_invalid(&format!("/recurrenceOverrides/{escaped_key}"), &exception_ctx);
    }

    if ctx.has_errors() {
        tracing::warn!(count = ctx.invalid_properties().len(), "rejecting write due to invalid properties");
        return None;
    }

    Some(calendar)
}

fn is_excluded(patch: &serde_json::Map<String, serde_json::Value>) -> bool {
    patch.len() == 1 && patch.get("excluded").and_then(serde_json::Value::as_bool) == Some(true)
}

fn parse_local(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LOCAL_FORMAT).ok()
}

fn to_ical_datetime(naive: NaiveDateTime, time_zone: Option<&str>) -> IcalDateTime {
    use chrono::Timelike;
    let date = naive.date();
    let (year, month, day) = (
        u16::try_from(date.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
        date.format("%m").to_string().parse::<u8>().unwrap_or(1),
        date.format("%d").to_string().parse::<u8>().unwrap_or(1),
    );
    let (hour, minute, second) = (
        u8::try_from(naive.hour()).unwrap_or(0),
        u8::try_from(naive.minute()).unwrap_or(0),
        u8::try_from(naive.second()).unwrap_or(0),
    );

    match time_zone {
        Some("Etc/UTC" | "UTC") => IcalDateTime::utc(year, month, day, hour, minute, second),
        Some(tz) => IcalDateTime::zoned(year, month, day, hour, minute, second, tz),
        None => IcalDateTime::floating(year, month, day, hour, minute, second),
    }
}

fn recurrence_id_property(key: &str, is_all_day: bool, time_zone: Option<&str>) -> Property {
    if is_all_day {
        let Some(naive) = parse_local(key) else {
            return Property::text("RECURRENCE-ID", key);
        };
        let date = naive.date();
        return Property::date(
            "RECURRENCE-ID",
            Date {
                year: u16::try_from(date.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
                month: date.format("%m").to_string().parse().unwrap_or(1),
                day: date.format("%d").to_string().parse().unwrap_or(1),
            },
        );
    }

    let Some(naive) = parse_local(key) else {
        return Property::text("RECURRENCE-ID", key);
    };
    let dt = to_ical_datetime(naive, time_zone);
    let mut prop = Property::datetime("RECURRENCE-ID", dt);
    if let Some(tz) = time_zone.filter(|tz| *tz != "Etc/UTC" && *tz != "UTC") {
        prop.add_param(Parameter::tzid(tz));
    }
    prop
}

fn build_date_list_property(name: &str, keys: &[String], is_all_day: bool) -> Property {
    if is_all_day {
        let dates: Vec<Date> = keys
            .iter()
            .filter_map(|k| parse_local(k))
            .map(|naive| {
                let date = naive.date();
                Date {
                    year: u16::try_from(date.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
                    month: date.format("%m").to_string().parse().unwrap_or(1),
                    day: date.format("%d").to_string().parse().unwrap_or(1),
                }
            })
            .collect();
        let raw = dates.iter().map(std::string::ToString::to_string).collect::<Vec<_>>().join(",");
        return Property {
            name: name.to_string(),
            params: vec![Parameter::value_type("DATE")],
            value: Value::DateList(dates),
            raw_value: raw,
        };
    }

    let datetimes: Vec<IcalDateTime> = keys
        .iter()
        .filter_map(|k| parse_local(k))
        .map(|naive| to_ical_datetime(naive, None))
        .collect();
    let raw = datetimes.iter().map(std::string::ToString::to_string).collect::<Vec<_>>().join(",");
    Property {
        name: name.to_string(),
        params: Vec::new(),
        value: Value::DateTimeList(datetimes),
        raw_value: raw,
    }
}

/// Writes the fields common to master and exception components: everything
/// except the recurrence rule and the overrides table, which only the master
/// carries. `base` is either a fresh component or one cloned from an
/// `existing` component in update mode; the properties this translator owns
/// are purged from it before being rewritten.
fn write_single(mut base: Component, doc: &EventDocument, ctx: &mut ConversionContext) -> Component {
    purge_known_properties(&mut base);
    let mut event = base;

    if doc.priority > 9 {
        with_path(ctx, "priority", ConversionContext::record_invalid);
    }

    event.add_property(Property::text("UID", doc.uid.clone()));
    event.add_property(Property::text("SUMMARY", doc.title.clone()));

    let mut description = Property::text("DESCRIPTION", doc.description.clone());
    if let Some(html) = &doc.description_html {
        description.add_param(Parameter::new("ALTREP", format!("data:text/html,{html}")));
    }
    event.add_property(description);

    if let Some(color) = &doc.color {
        event.add_property(Property::text("COLOR", color.clone()));
    }
    if !doc.keywords.is_empty() {
        let joined = doc.keywords.iter().cloned().collect::<Vec<_>>().join(",");
        event.add_property(Property::text("CATEGORIES", joined));
    }

    event.add_property(Property::text("CLASS", privacy_to_class(doc.privacy)));
    event.add_property(Property::text("TRANSP", transparency_to_transp(doc.transparency)));
    event.add_property(Property::text("STATUS", status_to_status(doc.status)));
    event.add_property(Property::integer("PRIORITY", i32::from(doc.priority)));
    event.add_property(Property::integer("SEQUENCE", i32::try_from(doc.sequence).unwrap_or(i32::MAX)));

    event.add_property(Property::datetime(
        "CREATED",
        IcalDateTime::utc(
            u16::try_from(doc.created.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
            doc.created.format("%m").to_string().parse().unwrap_or(1),
            doc.created.format("%d").to_string().parse().unwrap_or(1),
            doc.created.format("%H").to_string().parse().unwrap_or(0),
            doc.created.format("%M").to_string().parse().unwrap_or(0),
            doc.created.format("%S").to_string().parse().unwrap_or(0),
        ),
    ));
    event.add_property(Property::datetime(
        "LAST-MODIFIED",
        IcalDateTime::utc(
            u16::try_from(doc.updated.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
            doc.updated.format("%m").to_string().parse().unwrap_or(1),
            doc.updated.format("%d").to_string().parse().unwrap_or(1),
            doc.updated.format("%H").to_string().parse().unwrap_or(0),
            doc.updated.format("%M").to_string().parse().unwrap_or(0),
            doc.updated.format("%S").to_string().parse().unwrap_or(0),
        ),
    ));

    write_temporal(&mut event, doc, ctx);
    write_participants(&mut event, doc);
    write_locations(&mut event, doc);
    write_links(&mut event, doc);
    write_alerts(&mut event, doc);

    for (uid, relation) in &doc.related_to {
        let mut prop = Property::text("RELATED-TO", uid.clone());
        prop.add_param(Parameter::new("RELTYPE", relation.to_ascii_uppercase()));
        event.add_property(prop);
    }

    if let Some(participant_id) = &doc.participant_id {
        event.add_property(Property::text(xparams::PARTICIPANT_ID, participant_id.clone()));
    }

    event
}

fn privacy_to_class(privacy: Privacy) -> &'static str {
    match privacy {
        Privacy::Public => "PUBLIC",
        Privacy::Private => "PRIVATE",
        Privacy::Secret => "CONFIDENTIAL",
    }
}

fn transparency_to_transp(transparency: Transparency) -> &'static str {
    match transparency {
        Transparency::Free => "TRANSPARENT",
        Transparency::Busy => "OPAQUE",
    }
}

fn status_to_status(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Confirmed => "CONFIRMED",
        EventStatus::Tentative => "TENTATIVE",
        EventStatus::Cancelled => "CANCELLED",
    }
}

// ---- temporal layer -----------------------------------------------------

/// The end-zone pseudo-location (`rel="end"`), if the document carries one.
/// Its `timeZone` field is the DTEND zone when it differs from DTSTART's.
fn end_location(doc: &EventDocument) -> Option<&Location> {
    doc.locations.values().find(|l| l.rel == LocationRel::End)
}

fn write_temporal(event: &mut Component, doc: &EventDocument, ctx: &mut ConversionContext) {
    if doc.is_all_day && doc.time_zone.is_some() {
        with_path(ctx, "timeZone", ConversionContext::record_invalid);
    }
    if doc.is_all_day && end_location(doc).is_some() {
        with_path(ctx, "locations", ConversionContext::record_invalid);
    }

    let Some(naive) = parse_local(&doc.start) else {
        return;
    };

    if doc.is_all_day {
        let date = naive.date();
        let start_date = Date {
            year: u16::try_from(date.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
            month: date.format("%m").to_string().parse().unwrap_or(1),
            day: date.format("%d").to_string().parse().unwrap_or(1),
        };
        event.add_property(Property::date("DTSTART", start_date));

        if let Ok(duration) = crate::rfc::ical::parse::parse_duration(&doc.duration, 0, 0) {
            let end_naive = naive + chrono::Duration::seconds(duration.total_seconds());
            let end_date = end_naive.date();
            event.add_property(Property::date(
                "DTEND",
                Date {
                    year: u16::try_from(end_date.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
                    month: end_date.format("%m").to_string().parse().unwrap_or(1),
                    day: end_date.format("%d").to_string().parse().unwrap_or(1),
                },
            ));
        }
        return;
    }

    let dt = to_ical_datetime(naive, doc.time_zone.as_deref());
    let mut start_prop = Property::datetime("DTSTART", dt);
    if let Some(tz) = doc.time_zone.as_deref().filter(|tz| *tz != "Etc/UTC" && *tz != "UTC") {
        start_prop.add_param(Parameter::tzid(tz));
    }
    event.add_property(start_prop);

    let end_time_zone = end_location(doc).and_then(|l| l.time_zone.as_deref()).or(doc.time_zone.as_deref());

    if let Ok(duration) = crate::rfc::ical::parse::parse_duration(&doc.duration, 0, 0) {
        let end_naive = naive + chrono::Duration::seconds(duration.total_seconds());
        let end_dt = to_ical_datetime(end_naive, end_time_zone);
        let mut end_prop = Property::datetime("DTEND", end_dt);
        if let Some(tz) = end_time_zone.filter(|tz| *tz != "Etc/UTC" && *tz != "UTC") {
            end_prop.add_param(Parameter::tzid(tz));
        }
        event.add_property(end_prop);
    }
}

// ---- recurrence rule ------------------------------------------------------

fn write_recurrence_rule(event: &mut Component, rule: Option<&RecurrenceRule>, ctx: &mut ConversionContext) {
    let Some(rule) = rule else {
        return;
    };

    with_path(ctx, "recurrenceRule", |ctx| {
        if rule.interval < 1 {
            with_path(ctx, "interval", ConversionContext::record_invalid);
        }
        if rule.count.is_some() && rule.until.is_some() {
            with_path(ctx, "count", ConversionContext::record_invalid);
            with_path(ctx, "until", ConversionContext::record_invalid);
        }
        if rule.skip.is_some() && rule.rscale.is_none() {
            with_path(ctx, "skip", ConversionContext::record_invalid);
        }
    });

    let mut rrule = RRule::new();
    rrule.freq = Some(match rule.frequency {
        Frequency::Secondly => IcalFrequency::Secondly,
        Frequency::Minutely => IcalFrequency::Minutely,
        Frequency::Hourly => IcalFrequency::Hourly,
        Frequency::Daily => IcalFrequency::Daily,
        Frequency::Weekly => IcalFrequency::Weekly,
        Frequency::Monthly => IcalFrequency::Monthly,
        Frequency::Yearly => IcalFrequency::Yearly,
    });
    rrule.interval = Some(rule.interval);
    rrule.rscale.clone_from(&rule.rscale);
    rrule.skip = rule.skip.map(|s| match s {
        Skip::Omit => IcalSkip::Omit,
        Skip::Backward => IcalSkip::Backward,
        Skip::Forward => IcalSkip::Forward,
    });
    rrule.wkst = Weekday::parse(&rule.first_day_of_week);
    rrule.count = rule.count;
    rrule.until = rule.until.as_deref().and_then(parse_local).map(|naive| {
        RRuleUntil::DateTime(to_ical_datetime(naive, None))
    });

    rrule.by_day = rule
        .by_day
        .iter()
        .filter_map(|nday| {
            Some(WeekdayNum {
                ordinal: nday.nth_of_period.map(|n| i8::try_from(n).unwrap_or(0)),
                weekday: Weekday::parse(&nday.day)?,
            })
        })
        .collect();
    rrule.by_month = rule.by_month.iter().map(|s| parse_month_rule(s)).collect();
    rrule.by_monthday = rule.by_month_day.iter().map(|&v| i8::try_from(v).unwrap_or(0)).collect();
    rrule.by_yearday = rule.by_year_day.iter().map(|&v| i16::try_from(v).unwrap_or(0)).collect();
    rrule.by_weekno = rule.by_week_no.iter().map(|&v| i8::try_from(v).unwrap_or(0)).collect();
    rrule.by_hour.clone_from(&rule.by_hour);
    rrule.by_minute.clone_from(&rule.by_minute);
    rrule.by_second.clone_from(&rule.by_second);
    rrule.by_setpos = rule.by_set_position.iter().map(|&v| i16::try_from(v).unwrap_or(0)).collect();

    let raw = rrule.to_string();
    event.add_property(Property {
        name: "RRULE".to_string(),
        params: Vec::new(),
        value: Value::Recur(Box::new(rrule)),
        raw_value: raw,
    });
}

fn parse_month_rule(s: &str) -> MonthRule {
    if let Some(stripped) = s.strip_suffix('L').or_else(|| s.strip_suffix('l')) {
        MonthRule {
            month: stripped.parse().unwrap_or(1),
            leap: true,
        }
    } else {
        MonthRule::plain(s.parse().unwrap_or(1))
    }
}

// ---- participation layer -------------------------------------------------

fn write_participants(event: &mut Component, doc: &EventDocument) {
    if let Some(reply_to) = &doc.reply_to
        && let Some(imip) = &reply_to.imip
    {
        let mut organizer = Property::text("ORGANIZER", format!("mailto:{imip}"));
        if let Some(web) = &reply_to.web {
            organizer.add_param(Parameter::new(xparams::WEB_RSVP, web.clone()));
        }
        event.add_property(organizer);
    }

    for participant in doc.participants.values() {
        let Some(email) = &participant.email else {
            continue;
        };
        let mut attendee = Property::text("ATTENDEE", format!("mailto:{email}"));
        attendee.add_param(Parameter::new(xparams::PARTICIPANT_ID, participant.id.clone()));

        if let Some(name) = &participant.name {
            attendee.add_param(Parameter::new("CN", name.clone()));
        }

        attendee.add_param(Parameter::new(
            "CUTYPE",
            match participant.kind {
                ParticipantKind::Individual => "INDIVIDUAL",
                ParticipantKind::Group => "GROUP",
                ParticipantKind::Resource => "RESOURCE",
                ParticipantKind::Location => "ROOM",
                ParticipantKind::Unknown => "UNKNOWN",
            },
        ));
        attendee.add_param(Parameter::new(
            "ROLE",
            match participant.participation {
                Participation::Required => "REQ-PARTICIPANT",
                Participation::Optional => "OPT-PARTICIPANT",
                Participation::NonParticipant => "NON-PARTICIPANT",
            },
        ));
        attendee.add_param(Parameter::new(
            "PARTSTAT",
            match participant.rsvp_response {
                RsvpResponse::NeedsAction => "NEEDS-ACTION",
                RsvpResponse::Accepted => "ACCEPTED",
                RsvpResponse::Declined => "DECLINED",
                RsvpResponse::Tentative => "TENTATIVE",
            },
        ));
        attendee.add_param(Parameter::new("RSVP", if participant.rsvp_wanted { "TRUE" } else { "FALSE" }));

        if !participant.roles.is_empty() {
            attendee.add_param(Parameter::new(
                xparams::ROLES,
                participant.roles.iter().cloned().collect::<Vec<_>>().join(","),
            ));
        }
        if !participant.delegated_to.is_empty() {
            attendee.add_param(Parameter::with_values(
                "DELEGATED-TO",
                participant.delegated_to.iter().map(|e| format!("mailto:{e}")).collect(),
            ));
        }
        if !participant.delegated_from.is_empty() {
            attendee.add_param(Parameter::with_values(
                "DELEGATED-FROM",
                participant.delegated_from.iter().map(|e| format!("mailto:{e}")).collect(),
            ));
        }
        if !participant.member_of.is_empty() {
            attendee.add_param(Parameter::with_values(
                "MEMBER",
                participant.member_of.iter().map(|e| format!("mailto:{e}")).collect(),
            ));
        }

        if participant.schedule_sequence != 0 {
            attendee.add_param(Parameter::new(xparams::SEQUENCE, participant.schedule_sequence.to_string()));
        }
        if let Some(schedule_updated) = participant.schedule_updated {
            attendee.add_param(Parameter::new(xparams::DTSTAMP, format_utc_param(schedule_updated)));
        }
        if let Some(location_id) = &participant.location_id {
            attendee.add_param(Parameter::new(xparams::LOCATION_ID, location_id.clone()));
        }

        event.add_property(attendee);
    }
}

fn format_utc_param(dt: chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

// ---- locations -----------------------------------------------------------

/// Purges LOCATION/GEO/CONFERENCE/X-LOCATION, then re-emits `doc.locations`
/// picking the ICAL property kind per occurrence order: end-zone
/// pseudo-locations are skipped (the temporal layer owns them), a
/// coordinates-only location becomes a native GEO property, the first
/// remaining location becomes LOCATION, a later virtual location with a uri
/// becomes CONFERENCE, and anything left over falls back to the private
/// X-LOCATION extension.
fn write_locations(event: &mut Component, doc: &EventDocument) {
    let mut location_written = false;

    for location in doc.locations.values() {
        if location.rel == LocationRel::End {
            continue;
        }

        if let Some(coordinates) = &location.coordinates {
            if location.name.is_none() && location.uri.is_none() {
                let raw = coordinates.strip_prefix("geo:").unwrap_or(coordinates);
                let mut prop = Property::text("GEO", raw);
                prop.add_param(Parameter::new(xparams::LOCATION_ID, location.id.clone()));
                event.add_property(prop);
                continue;
            }
        }

        if !location_written {
            let mut prop = Property::text("LOCATION", location.name.clone().unwrap_or_default());
            prop.add_param(Parameter::new(xparams::LOCATION_ID, location.id.clone()));
            if let Some(uri) = &location.uri {
                prop.add_param(Parameter::new(xparams::URI, uri.clone()));
            }
            if let Some(description) = &location.description {
                prop.add_param(Parameter::new(xparams::DESCRIPTION, description.clone()));
            }
            event.add_property(prop);
            location_written = true;
            continue;
        }

        if location.rel == LocationRel::Virtual && location.uri.is_some() {
            let mut prop = Property::text("CONFERENCE", location.uri.clone().unwrap_or_default());
            prop.add_param(Parameter::new(xparams::LOCATION_ID, location.id.clone()));
            if !location.features.is_empty() {
                prop.add_param(Parameter::new("FEATURE", location.features.iter().cloned().collect::<Vec<_>>().join(",")));
            }
            event.add_property(prop);
            continue;
        }

        let mut prop = Property::text(xparams::LOCATION_PROPERTY, location.name.clone().unwrap_or_default());
        prop.add_param(Parameter::new(xparams::LOCATION_ID, location.id.clone()));
        prop.add_param(Parameter::new(
            xparams::REL,
            match location.rel {
                LocationRel::Virtual => "virtual",
                LocationRel::End => "end",
                LocationRel::Unknown => "unknown",
            },
        ));
        if let Some(coordinates) = &location.coordinates {
            prop.add_param(Parameter::new(xparams::GEO, coordinates.clone()));
        }
        if let Some(tz) = &location.time_zone {
            prop.add_param(Parameter::new(xparams::TZID, tz.clone()));
        }
        event.add_property(prop);
    }
}

// ---- links -----------------------------------------------------------

fn write_links(event: &mut Component, doc: &EventDocument) {
    for link in doc.links.values() {
        let mut prop = Property::text("ATTACH", link.href.clone());
        prop.add_param(Parameter::new(xparams::LINK_ID, link.id.clone()));
        if let Some(content_type) = &link.content_type {
            prop.add_param(Parameter::new("FMTTYPE", content_type.clone()));
        }
        if let Some(size) = link.size {
            prop.add_param(Parameter::new("SIZE", size.to_string()));
        }
        if let Some(title) = &link.title {
            prop.add_param(Parameter::new(xparams::TITLE, title.clone()));
        }
        if let Some(rel) = &link.rel {
            prop.add_param(Parameter::new(xparams::REL, rel.clone()));
        }
        if let Some(cid) = &link.cid {
            prop.add_param(Parameter::new(xparams::CID, cid.clone()));
        }
        if let Some(properties) = &link.properties
            && let Ok(encoded) = serde_json::to_vec(properties)
        {
            prop.add_param(Parameter::new(xparams::PROPERTIES, STANDARD.encode(encoded)));
        }
        event.add_property(prop);
    }
}

// ---- alerts -----------------------------------------------------------

fn write_alerts(event: &mut Component, doc: &EventDocument) {
    for alert in doc.alerts.values() {
        let mut alarm = Component::alarm();
        alarm.add_property(Property::text("UID", alert.id.clone()));

        let duration = crate::rfc::ical::parse::parse_duration(&alert.offset, 0, 0).unwrap_or(IcalDuration::zero());
        let mut trigger_duration = duration;
        trigger_duration.negative = matches!(alert.relative_to, RelativeTo::BeforeStart | RelativeTo::BeforeEnd);

        let mut trigger = Property {
            name: "TRIGGER".to_string(),
            params: Vec::new(),
            value: Value::Duration(trigger_duration),
            raw_value: trigger_duration.to_string(),
        };
        if matches!(alert.relative_to, RelativeTo::BeforeEnd | RelativeTo::AfterEnd) {
            trigger.add_param(Parameter::new("RELATED", "END"));
        }
        alarm.add_property(trigger);

        match &alert.action {
            Action::Display { media_links } => {
                alarm.add_property(Property::text("ACTION", "DISPLAY"));
                alarm.add_property(Property::text("DESCRIPTION", doc.title.clone()));
                if let Some(links) = media_links {
                    for link in links.values() {
                        let mut attach = Property::text("ATTACH", link.href.clone());
                        attach.add_param(Parameter::new(xparams::LINK_ID, link.id.clone()));
                        alarm.add_property(attach);
                    }
                }
            }
            Action::Email {
                to,
                subject,
                text_body,
                html_body,
                attachments,
            } => {
                alarm.add_property(Property::text("ACTION", "EMAIL"));
                alarm.add_property(Property::text("SUMMARY", subject.clone()));
                let mut description = Property::text("DESCRIPTION", text_body.clone());
                if let Some(html) = html_body {
                    description.add_param(Parameter::new("ALTREP", format!("data:text/html,{html}")));
                }
                alarm.add_property(description);
                for recipient in to {
                    let mut attendee = Property::text("ATTENDEE", format!("mailto:{}", recipient.email));
                    if let Some(name) = &recipient.name {
                        attendee.add_param(Parameter::new("CN", name.clone()));
                    }
                    alarm.add_property(attendee);
                }
                for attachment in attachments {
                    let mut attach = Property::text("ATTACH", attachment.href.clone());
                    attach.add_param(Parameter::new(xparams::LINK_ID, attachment.id.clone()));
                    alarm.add_property(attach);
                }
            }
        }

        if let Some(acknowledged) = alert.acknowledged {
            alarm.add_property(Property::datetime(
                "ACKNOWLEDGED",
                IcalDateTime::utc(
                    u16::try_from(acknowledged.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
                    acknowledged.format("%m").to_string().parse().unwrap_or(1),
                    acknowledged.format("%d").to_string().parse().unwrap_or(1),
                    acknowledged.format("%H").to_string().parse().unwrap_or(0),
                    acknowledged.format("%M").to_string().parse().unwrap_or(0),
                    acknowledged.format("%S").to_string().parse().unwrap_or(0),
                ),
            ));
        }

        event.add_child(alarm);

        if let Some(snoozed) = alert.snoozed {
            let mut snooze_alarm = Component::alarm();
            let mut related = Property::text("RELATED-TO", alert.id.clone());
            related.add_param(Parameter::new("RELTYPE", "SNOOZE"));
            snooze_alarm.add_property(related);
            snooze_alarm.add_property(Property::text("ACTION", "DISPLAY"));
            snooze_alarm.add_property(Property::datetime(
                "TRIGGER",
                IcalDateTime::utc(
                    u16::try_from(snoozed.format("%Y").to_string().parse::<i32>().unwrap_or(1970)).unwrap_or(1970),
                    snoozed.format("%m").to_string().parse().unwrap_or(1),
                    snoozed.format("%d").to_string().parse().unwrap_or(1),
                    snoozed.format("%H").to_string().parse().unwrap_or(0),
                    snoozed.format("%M").to_string().parse().unwrap_or(0),
                    snoozed.format("%S").to_string().parse().unwrap_or(0),
                ),
            ));
            event.add_child(snooze_alarm);
        }
    }
}
