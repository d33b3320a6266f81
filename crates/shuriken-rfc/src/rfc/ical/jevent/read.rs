//! ICAL -> JEVENT read path (§4.2-§4.8 of the calendaring translation design).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveDateTime, Utc};
use sha1::{Digest, Sha1};

use crate::rfc::ical::core::{Component, ComponentKind, DateTime as IcalDateTime, Property, Value};
use crate::rfc::ical::expand::{self, TimeZoneResolver};

use super::context::{ConversionContext, ConversionError, Direction, ErrorCode, Mutation};
use super::model::*;
use super::xparams;

/// Reads a top-level ICAL container (a VCALENDAR, or a single VEVENT/VTODO)
/// into a JEVENT document, folding recurrence exception siblings into the
/// master's override table.
///
/// ## Errors
/// Returns `ErrorCode::MissingUid` if no event component with a UID can be
/// found.
#[tracing::instrument(skip(container))]
pub fn to_document(container: &Component) -> Result<EventDocument, ConversionError> {
    let (master, siblings) = find_master_and_siblings(container);
    let master = master.ok_or_else(|| ConversionError::fatal(ErrorCode::MissingUid))?;

    if master.uid().is_none() {
        tracing::warn!("master event has no UID");
        return Err(ConversionError::fatal(ErrorCode::MissingUid));
    }

    tracing::debug!(sibling_count = siblings.len(), "found master and exception siblings");

    let mut resolver = build_resolver(container);
    let prod_id = container
        .get_property("PRODID")
        .and_then(Property::as_text)
        .unwrap_or_default()
        .to_string();

    let mut ctx = ConversionContext::new(Direction::Read, Mutation::Create);
    let mut doc = translate_single(master, &mut resolver, &mut ctx);
    doc.prod_id = prod_id;
    doc.recurrence_rule = read_recurrence_rule(master);
    doc.recurrence_overrides = read_overrides(master, &siblings, &doc, &mut resolver);

    Ok(doc)
}

/// Locates the master event (no `RECURRENCE-ID`) and its exception siblings
/// inside a container. A single bare component (not a VCALENDAR) is treated
/// as its own master with no siblings.
fn find_master_and_siblings<'a>(container: &'a Component) -> (Option<&'a Component>, Vec<&'a Component>) {
    if container.kind != Some(ComponentKind::Calendar) {
        return (Some(container), Vec::new());
    }

    let events = container.events();
    let master = events
        .iter()
        .find(|event| event.get_property("RECURRENCE-ID").is_none())
        .copied();
    let uid = master.and_then(Component::uid);

    let siblings = events
        .iter()
        .filter(|event| event.get_property("RECURRENCE-ID").is_some() && event.uid() == uid)
        .copied()
        .collect();

    (master, siblings)
}

fn build_resolver(container: &Component) -> TimeZoneResolver {
    if container.kind == Some(ComponentKind::Calendar) {
        let ical = crate::rfc::ical::core::ICalendar {
            root: container.clone(),
        };
        expand::build_timezone_resolver(&ical).unwrap_or_default()
    } else {
        TimeZoneResolver::new()
    }
}

/// Translates one event component (master or exception sibling), without
/// touching the recurrence rule or overrides table (those are the master's
/// concern alone).
fn translate_single(event: &Component, resolver: &mut TimeZoneResolver, ctx: &mut ConversionContext) -> EventDocument {
    let (start, time_zone, is_all_day, duration) = read_temporal(event, resolver);
    let (participants, reply_to) = read_participants(event);
    let locations = read_locations(event, time_zone.as_deref());

    EventDocument {
        kind_marker: "Event".to_string(),
        uid: event.uid().unwrap_or_default().to_string(),
        title: event.summary().unwrap_or_default().to_string(),
        description: event.description().unwrap_or_default().to_string(),
        description_html: read_description_html(event),
        color: event.get_property("COLOR").and_then(Property::as_text).map(str::to_string),
        keywords: read_keywords(event),
        locale: event
            .get_property("SUMMARY")
            .and_then(|p| p.get_param_value("LANGUAGE"))
            .map(str::to_string),
        privacy: read_privacy(event),
        transparency: read_transparency(event),
        status: read_status(event),
        priority: event
            .get_property("PRIORITY")
            .and_then(Property::as_integer)
            .map_or(0, |v| v.clamp(0, 9) as u8),
        sequence: event
            .get_property("SEQUENCE")
            .and_then(Property::as_integer)
            .map_or(0, |v| v.max(0) as u32),
        created: read_timestamp(event, "CREATED").unwrap_or_else(|| read_timestamp(event, "DTSTAMP").unwrap_or_else(Utc::now)),
        updated: read_timestamp(event, "LAST-MODIFIED").unwrap_or_else(|| read_timestamp(event, "DTSTAMP").unwrap_or_else(Utc::now)),
        prod_id: String::new(),
        start,
        time_zone,
        duration,
        is_all_day,
        recurrence_rule: None,
        recurrence_overrides: BTreeMap::new(),
        participants,
        reply_to,
        participant_id: event.get_property(xparams::PARTICIPANT_ID).and_then(Property::as_text).map(str::to_string),
        locations,
        links: read_links(event),
        alerts: read_alerts(event, ctx),
        related_to: read_related_to(event),
    }
}

// ---- event shell -----------------------------------------------------

fn read_keywords(event: &Component) -> BTreeSet<String> {
    event
        .get_properties("CATEGORIES")
        .into_iter()
        .flat_map(|p| p.as_text().unwrap_or_default().split(','))
        .map(|s| crate::rfc::ical::parse::unescape_text(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn read_privacy(event: &Component) -> Privacy {
    match event.get_property("CLASS").and_then(Property::as_text).map(str::to_ascii_uppercase).as_deref() {
        Some("PRIVATE") => Privacy::Private,
        Some("CONFIDENTIAL") => Privacy::Secret,
        _ => Privacy::Public,
    }
}

fn read_transparency(event: &Component) -> Transparency {
    match event.get_property("TRANSP").and_then(Property::as_text).map(str::to_ascii_uppercase).as_deref() {
        Some("TRANSPARENT") => Transparency::Free,
        _ => Transparency::Busy,
    }
}

fn read_status(event: &Component) -> EventStatus {
    match event.get_property("STATUS").and_then(Property::as_text).map(str::to_ascii_uppercase).as_deref() {
        Some("TENTATIVE") => EventStatus::Tentative,
        Some("CANCELLED") => EventStatus::Cancelled,
        _ => EventStatus::Confirmed,
    }
}

fn read_timestamp(event: &Component, name: &str) -> Option<ChronoDateTime<Utc>> {
    ical_datetime_to_chrono(event.get_property(name)?.as_datetime()?)
}

fn read_related_to(event: &Component) -> BTreeMap<String, String> {
    event
        .get_properties("RELATED-TO")
        .into_iter()
        .filter_map(|p| {
            let uid = p.as_text()?.to_string();
            let relation = p.get_param_value("RELTYPE").unwrap_or("PARENT").to_ascii_lowercase();
            Some((uid, relation))
        })
        .collect()
}

/// Converts a UTC-anchored ICAL datetime into a `chrono` instant. Non-UTC
/// values are treated as already being in UTC, matching the lenient
/// read-path policy of degrading rather than rejecting.
fn ical_datetime_to_chrono(dt: &IcalDateTime) -> Option<ChronoDateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?;
    let naive = date.and_hms_opt(u32::from(dt.hour), u32::from(dt.minute), u32::from(dt.second))?;
    Some(ChronoDateTime::from_naive_utc_and_offset(naive, Utc))
}

// ---- temporal layer ----------------------------------------------------

fn read_temporal(event: &Component, resolver: &mut TimeZoneResolver) -> (String, Option<String>, bool, String) {
    let Some(dtstart) = event.get_property("DTSTART") else {
        return (String::new(), None, false, "P0D".to_string());
    };

    let is_all_day = matches!(dtstart.value, Value::Date(_));

    let (start, time_zone, start_moment) = match &dtstart.value {
        Value::Date(date) => (
            format!("{:04}-{:02}-{:02}T00:00:00", date.year, date.month, date.day),
            None,
            resolve_date_utc(*date),
        ),
        Value::DateTime(dt) => {
            let tz = resolve_zone(dt);
            let start_moment = resolve_utc(dt, resolver);
            (format_local(dt), tz, start_moment)
        }
        _ => (String::new(), None, Utc::now()),
    };

    let duration = compute_duration(event, start_moment, resolver);

    (start, time_zone, is_all_day, duration)
}

fn resolve_zone(dt: &IcalDateTime) -> Option<String> {
    match dt.tzid() {
        Some(tzid) => Some(tzid.to_string()),
        None if dt.is_utc() => Some("Etc/UTC".to_string()),
        None => None,
    }
}

fn resolve_date_utc(date: crate::rfc::ical::core::Date) -> ChronoDateTime<Utc> {
    NaiveDate::from_ymd_opt(i32::from(date.year), u32::from(date.month), u32::from(date.day))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or_else(Utc::now, |naive| ChronoDateTime::from_naive_utc_and_offset(naive, Utc))
}

fn resolve_utc(dt: &IcalDateTime, resolver: &mut TimeZoneResolver) -> ChronoDateTime<Utc> {
    let naive = NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))
        .and_then(|d| d.and_hms_opt(u32::from(dt.hour), u32::from(dt.minute), u32::from(dt.second)));
    let Some(naive) = naive else {
        return Utc::now();
    };

    match dt.tzid() {
        Some(tzid) => expand::convert_to_utc(naive, tzid, resolver)
            .unwrap_or_else(|_| ChronoDateTime::from_naive_utc_and_offset(naive, Utc)),
        None => ChronoDateTime::from_naive_utc_and_offset(naive, Utc),
    }
}

/// Formats a floating local datetime as JEVENT expects it: no zone suffix.
fn format_local(dt: &IcalDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
    )
}

fn compute_duration(event: &Component, start_moment: ChronoDateTime<Utc>, resolver: &mut TimeZoneResolver) -> String {
    if let Some(dtend) = event.get_property("DTEND") {
        let end_moment = match &dtend.value {
            Value::Date(date) => resolve_date_utc(*date),
            Value::DateTime(dt) => resolve_utc(dt, resolver),
            _ => start_moment,
        };
        let seconds = (end_moment - start_moment).num_seconds().max(0);
        return crate::rfc::ical::core::Duration::from_seconds(seconds).to_string();
    }

    if let Some(duration) = event.get_property("DURATION").and_then(|p| p.as_duration()) {
        return duration.to_string();
    }

    "P0D".to_string()
}

// ---- recurrence rule ----------------------------------------------------

fn read_recurrence_rule(master: &Component) -> Option<RecurrenceRule> {
    let rrule = master.get_property("RRULE")?.value.as_recur()?;

    let frequency = match rrule.freq? {
        crate::rfc::ical::core::Frequency::Secondly => Frequency::Secondly,
        crate::rfc::ical::core::Frequency::Minutely => Frequency::Minutely,
        crate::rfc::ical::core::Frequency::Hourly => Frequency::Hourly,
        crate::rfc::ical::core::Frequency::Daily => Frequency::Daily,
        crate::rfc::ical::core::Frequency::Weekly => Frequency::Weekly,
        crate::rfc::ical::core::Frequency::Monthly => Frequency::Monthly,
        crate::rfc::ical::core::Frequency::Yearly => Frequency::Yearly,
    };

    let mut by_day: Vec<NDay> = rrule
        .by_day
        .iter()
        .map(|wn| NDay {
            day: wn.weekday.as_str().to_ascii_lowercase(),
            nth_of_period: wn.ordinal.map(i32::from),
        })
        .collect();
    by_day.sort_by(|a, b| a.day.cmp(&b.day).then(a.nth_of_period.cmp(&b.nth_of_period)));

    let mut by_month: Vec<String> = rrule.by_month.iter().map(std::string::ToString::to_string).collect();
    by_month.sort();

    let mut by_month_day: Vec<i32> = rrule.by_monthday.iter().map(|&v| i32::from(v)).collect();
    by_month_day.sort_unstable();
    let mut by_year_day: Vec<i32> = rrule.by_yearday.iter().map(|&v| i32::from(v)).collect();
    by_year_day.sort_unstable();
    let mut by_week_no: Vec<i32> = rrule.by_weekno.iter().map(|&v| i32::from(v)).collect();
    by_week_no.sort_unstable();
    let mut by_set_position: Vec<i32> = rrule.by_setpos.iter().map(|&v| i32::from(v)).collect();
    by_set_position.sort_unstable();
    let mut by_hour = rrule.by_hour.clone();
    by_hour.sort_unstable();
    let mut by_minute = rrule.by_minute.clone();
    by_minute.sort_unstable();
    let mut by_second = rrule.by_second.clone();
    by_second.sort_unstable();

    let until = rrule.until.as_ref().map(|until| match until {
        crate::rfc::ical::core::RRuleUntil::Date(d) => format!("{:04}-{:02}-{:02}T00:00:00", d.year, d.month, d.day),
        crate::rfc::ical::core::RRuleUntil::DateTime(dt) => format_local(dt),
    });

    Some(RecurrenceRule {
        frequency,
        interval: rrule.interval.unwrap_or(1),
        rscale: rrule.rscale.clone(),
        skip: rrule.skip.map(|s| match s {
            crate::rfc::ical::core::Skip::Omit => Skip::Omit,
            crate::rfc::ical::core::Skip::Backward => Skip::Backward,
            crate::rfc::ical::core::Skip::Forward => Skip::Forward,
        }),
        first_day_of_week: rrule.wkst.map_or_else(|| "mo".to_string(), |w| w.as_str().to_ascii_lowercase()),
        by_day,
        by_month,
        by_month_day,
        by_year_day,
        by_week_no,
        by_hour,
        by_minute,
        by_second,
        by_set_position,
        count: rrule.count,
        until,
    })
}

// ---- overrides ----------------------------------------------------------

fn local_key(dt: &IcalDateTime) -> String {
    format_local(dt)
}

fn local_key_date(date: &crate::rfc::ical::core::Date) -> String {
    format!("{:04}-{:02}-{:02}T00:00:00", date.year, date.month, date.day)
}

fn read_overrides(
    master: &Component,
    siblings: &[&Component],
    master_doc: &EventDocument,
    resolver: &mut TimeZoneResolver,
) -> BTreeMap<String, serde_json::Map<String, serde_json::Value>> {
    let mut overrides = BTreeMap::new();

    for rdate in master.get_properties("RDATE") {
        match &rdate.value {
            Value::DateTimeList(list) => {
                for dt in list {
                    overrides.insert(local_key(dt), serde_json::Map::new());
                }
            }
            Value::DateList(list) => {
                for date in list {
                    overrides.insert(local_key_date(date), serde_json::Map::new());
                }
            }
            Value::PeriodList(list) => {
                for period in list {
                    let key = local_key(period.start());
                    let mut patch = serde_json::Map::new();
                    if let crate::rfc::ical::core::Period::Duration { duration, .. } = period {
                        patch.insert("duration".to_string(), serde_json::json!(duration.to_string()));
                    }
                    overrides.insert(key, patch);
                }
            }
            _ => {}
        }
    }

    for exdate in master.get_properties("EXDATE") {
        match &exdate.value {
            Value::DateTimeList(list) => {
                for dt in list {
                    overrides.insert(local_key(dt), excluded_patch());
                }
            }
            Value::DateList(list) => {
                for date in list {
                    overrides.insert(local_key_date(date), excluded_patch());
                }
            }
            _ => {}
        }
    }

    for sibling in siblings {
        let Some(recurrence_id) = sibling.get_property("RECURRENCE-ID").and_then(Property::as_datetime) else {
            continue;
        };
        let key = local_key(recurrence_id);

        let mut ctx = ConversionContext::new(Direction::Read, Mutation::Create);
        ctx.exception = true;
        let sibling_doc = translate_single(sibling, resolver, &mut ctx);

        let Ok(base) = serde_json::to_value(master_doc) else {
            continue;
        };
        let Ok(overlay) = serde_json::to_value(&sibling_doc) else {
            continue;
        };

        let mut patch = super::patch::diff(&base, &overlay);
        patch.remove("created");
        patch.remove("updated");
        if patch.get("start").and_then(serde_json::Value::as_str) == Some(key.as_str()) {
            patch.remove("start");
        }
        for forbidden in EventDocument::FORBIDDEN_OVERRIDE_KEYS {
            patch.remove(*forbidden);
        }

        overrides.insert(key, patch);
    }

    overrides
}

fn excluded_patch() -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    map.insert("excluded".to_string(), serde_json::json!(true));
    map
}

// ---- participation layer -------------------------------------------------

fn canonical_mail(uri: &str) -> String {
    let rest = if uri.len() >= 7 && uri[..7].eq_ignore_ascii_case("mailto:") {
        &uri[7..]
    } else {
        uri
    };

    match rest.split_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_ascii_lowercase()),
        None => rest.to_string(),
    }
}

fn read_participants(event: &Component) -> (BTreeMap<String, Participant>, Option<ReplyTo>) {
    let organizer = event.get_property("ORGANIZER");
    let organizer_uri = organizer.map(|p| p.raw_value.clone());

    let attendees: Vec<&Property> = event.get_properties("ATTENDEE");
    let by_uri: HashMap<&str, &Property> = attendees.iter().map(|p| (p.raw_value.as_str(), *p)).collect();

    let mut participants = BTreeMap::new();
    for attendee in &attendees {
        let uri = attendee.raw_value.as_str();
        let email = canonical_mail(uri);
        let id = attendee
            .get_param_value(xparams::PARTICIPANT_ID)
            .map(str::to_string)
            .unwrap_or_else(|| email.clone());

        let kind = match attendee.get_param_value("CUTYPE").map(str::to_ascii_uppercase).as_deref() {
            Some("GROUP") => ParticipantKind::Group,
            Some("RESOURCE") => ParticipantKind::Resource,
            Some("ROOM") => ParticipantKind::Location,
            Some("INDIVIDUAL") => ParticipantKind::Individual,
            _ => ParticipantKind::Unknown,
        };

        let participation = match attendee.get_param_value("ROLE").map(str::to_ascii_uppercase).as_deref() {
            Some("OPT-PARTICIPANT") => Participation::Optional,
            Some("NON-PARTICIPANT") => Participation::NonParticipant,
            _ => Participation::Required,
        };

        let mut roles: BTreeSet<String> = attendee
            .get_param_value(xparams::ROLES)
            .map(|v| v.split(',').map(|s| s.to_ascii_lowercase()).collect())
            .unwrap_or_default();
        if roles.is_empty() {
            roles.insert("attendee".to_string());
        }
        if organizer_uri.as_deref() == Some(uri) {
            roles.insert("owner".to_string());
        }

        let rsvp_response = resolve_rsvp(uri, &by_uri, 0);
        let rsvp_wanted = attendee
            .get_param_value("RSVP")
            .map(|v| v.eq_ignore_ascii_case("TRUE"))
            .unwrap_or(false);

        let delegated_to = split_emails(attendee.get_param_value("DELEGATED-TO"));
        let delegated_from = split_emails(attendee.get_param_value("DELEGATED-FROM"));
        let member_of = split_emails(attendee.get_param_value("MEMBER"));

        let schedule_sequence = attendee
            .get_param_value(xparams::SEQUENCE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let schedule_updated = attendee.get_param_value(xparams::DTSTAMP).and_then(parse_utc_param);
        let location_id = attendee.get_param_value(xparams::LOCATION_ID).map(str::to_string);

        participants.insert(
            id.clone(),
            Participant {
                id,
                email: Some(email),
                name: attendee.get_param_value("CN").map(str::to_string),
                kind,
                participation,
                roles,
                rsvp_response,
                rsvp_wanted,
                delegated_to,
                delegated_from,
                member_of,
                link_ids: BTreeSet::new(),
                schedule_sequence,
                schedule_updated,
                location_id,
            },
        );
    }

    let reply_to = organizer.map(|organizer_prop| ReplyTo {
        imip: Some(canonical_mail(&organizer_prop.raw_value)),
        web: organizer_prop.get_param_value(xparams::WEB_RSVP).map(str::to_string),
    });

    (participants, reply_to)
}

fn split_emails(value: Option<&str>) -> BTreeSet<String> {
    value
        .map(|v| v.split(',').map(canonical_mail).collect())
        .unwrap_or_default()
}

/// Parses an `X-JEVENT-DTSTAMP`-style param value (`%Y%m%dT%H%M%S`, with or
/// without a trailing `Z`) back into a UTC instant.
fn parse_utc_param(value: &str) -> Option<ChronoDateTime<Utc>> {
    let trimmed = value.strip_suffix('Z').unwrap_or(value);
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y%m%dT%H%M%S").ok()?;
    Some(ChronoDateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Resolves an attendee's effective RSVP response, following `DELEGATED-TO`
/// chains up to a depth of 64 (cycles fall through to `needs-action`).
fn resolve_rsvp(uri: &str, by_uri: &HashMap<&str, &Property>, depth: u32) -> RsvpResponse {
    if depth > 64 {
        return RsvpResponse::NeedsAction;
    }

    let Some(prop) = by_uri.get(uri) else {
        return RsvpResponse::NeedsAction;
    };

    let partstat = prop.get_param_value("PARTSTAT").unwrap_or("NEEDS-ACTION").to_ascii_uppercase();
    match partstat.as_str() {
        "ACCEPTED" => RsvpResponse::Accepted,
        "DECLINED" => RsvpResponse::Declined,
        "TENTATIVE" => RsvpResponse::Tentative,
        "DELEGATED" => prop
            .get_param_value("DELEGATED-TO")
            .and_then(|next| next.split(',').next())
            .map_or(RsvpResponse::NeedsAction, |next| resolve_rsvp(next, by_uri, depth + 1)),
        _ => RsvpResponse::NeedsAction,
    }
}

// ---- locations & conferencing --------------------------------------------

impl Location {
    fn blank(id: String) -> Self {
        Self {
            id,
            name: None,
            uri: None,
            rel: LocationRel::Unknown,
            features: BTreeSet::new(),
            description: None,
            time_zone: None,
            coordinates: None,
            link_ids: BTreeSet::new(),
        }
    }
}

fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

fn read_locations(event: &Component, start_tzid: Option<&str>) -> BTreeMap<String, Location> {
    let mut locations = BTreeMap::new();

    if let Some(loc) = event.get_property("LOCATION") {
        let id = loc.get_param_value(xparams::LOCATION_ID).map(str::to_string).unwrap_or_else(|| sha1_hex(&loc.raw_value));
        let mut location = Location::blank(id);
        location.name = loc.as_text().map(str::to_string);
        location.uri = loc.get_param_value(xparams::URI).map(str::to_string);
        location.description = loc.get_param_value(xparams::DESCRIPTION).map(str::to_string);
        locations.insert(location.id.clone(), location);
    }

    if let Some(geo) = event.get_property("GEO") {
        let id = geo.get_param_value(xparams::LOCATION_ID).map(str::to_string).unwrap_or_else(|| sha1_hex(&geo.raw_value));
        let mut location = Location::blank(id);
        location.coordinates = Some(format!("geo:{}", geo.raw_value));
        locations.insert(location.id.clone(), location);
    }

    for conference in event.get_properties("CONFERENCE") {
        let id = conference
            .get_param_value(xparams::LOCATION_ID)
            .map(str::to_string)
            .unwrap_or_else(|| sha1_hex(&conference.raw_value));
        let mut location = Location::blank(id);
        location.rel = LocationRel::Virtual;
        location.uri = Some(conference.raw_value.clone());
        location.features = conference
            .get_param_value("FEATURE")
            .map(|v| v.split(',').map(|s| s.to_ascii_lowercase()).collect())
            .unwrap_or_default();
        locations.insert(location.id.clone(), location);
    }

    for xlocation in event.get_properties(xparams::LOCATION_PROPERTY) {
        let id = xlocation
            .get_param_value(xparams::LOCATION_ID)
            .map(str::to_string)
            .unwrap_or_else(|| sha1_hex(&xlocation.raw_value));
        let mut location = Location::blank(id);
        location.name = xlocation.as_text().map(str::to_string);
        location.rel = match xlocation.get_param_value(xparams::REL) {
            Some("virtual") => LocationRel::Virtual,
            Some("end") => LocationRel::End,
            _ => LocationRel::Unknown,
        };
        location.coordinates = xlocation.get_param_value(xparams::GEO).map(str::to_string);
        locations.insert(location.id.clone(), location);
    }

    let end_tzid = event
        .get_property("DTEND")
        .and_then(Property::as_datetime)
        .and_then(|dt| dt.tzid().map(str::to_string));

    if let (Some(start_tz), Some(end_tz)) = (start_tzid, end_tzid.as_deref())
        && start_tz != end_tz
    {
        let id = format!("end-{end_tz}");
        let mut location = Location::blank(id);
        location.rel = LocationRel::End;
        location.time_zone = Some(end_tz.to_string());
        locations.insert(location.id.clone(), location);
    }

    locations
}

// ---- alerts ----------------------------------------------------------

fn read_alerts(event: &Component, _ctx: &mut ConversionContext) -> BTreeMap<String, Alert> {
    let alarms = event.alarms();
    let mut snooze_index: HashMap<String, &Component> = HashMap::new();
    let mut regular = Vec::new();

    for alarm in &alarms {
        let is_snooze = alarm
            .get_property("RELATED-TO")
            .is_some_and(|rel| rel.get_param_value("RELTYPE").is_some_and(|t| t.eq_ignore_ascii_case("SNOOZE")));

        if is_snooze {
            if let Some(parent_uid) = alarm.get_property("RELATED-TO").and_then(Property::as_text) {
                snooze_index.insert(parent_uid.to_string(), alarm);
            }
            continue;
        }
        regular.push(alarm);
    }

    let mut alerts = BTreeMap::new();
    for (index, alarm) in regular.iter().enumerate() {
        let id = alarm
            .get_property("UID")
            .and_then(Property::as_text)
            .map(str::to_string)
            .unwrap_or_else(|| format!("alert{index}"));

        let (offset, relative_to) = read_trigger(alarm);
        let action = read_alarm_action(alarm);

        let acknowledged = alarm.get_property("ACKNOWLEDGED").and_then(Property::as_datetime).and_then(ical_datetime_to_chrono);
        let snoozed = alarm
            .get_property("UID")
            .and_then(Property::as_text)
            .and_then(|uid| snooze_index.get(uid))
            .and_then(|snooze| snooze.get_property("TRIGGER"))
            .and_then(Property::as_datetime)
            .and_then(ical_datetime_to_chrono);

        alerts.insert(
            id.clone(),
            Alert {
                id,
                relative_to,
                offset,
                action,
                acknowledged,
                snoozed,
            },
        );
    }

    alerts
}

fn read_trigger(alarm: &Component) -> (String, RelativeTo) {
    let Some(trigger) = alarm.get_property("TRIGGER") else {
        return ("PT0S".to_string(), RelativeTo::BeforeStart);
    };

    let related_end = trigger.get_param_value("RELATED").is_some_and(|r| r.eq_ignore_ascii_case("END"));

    match &trigger.value {
        Value::Duration(duration) => {
            let before = duration.negative;
            let relative_to = match (before, related_end) {
                (true, false) => RelativeTo::BeforeStart,
                (false, false) => RelativeTo::AfterStart,
                (true, true) => RelativeTo::BeforeEnd,
                (false, true) => RelativeTo::AfterEnd,
            };
            let mut magnitude = *duration;
            magnitude.negative = false;
            (magnitude.to_string(), relative_to)
        }
        _ => ("PT0S".to_string(), RelativeTo::BeforeStart),
    }
}

fn read_alarm_action(alarm: &Component) -> Action {
    let action_name = alarm
        .get_property("ACTION")
        .and_then(Property::as_text)
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| "DISPLAY".to_string());

    if action_name == "EMAIL" {
        let to = alarm
            .get_properties("ATTENDEE")
            .into_iter()
            .map(|p| EmailRecipient {
                name: p.get_param_value("CN").map(str::to_string),
                email: canonical_mail(&p.raw_value),
            })
            .collect();

        Action::Email {
            to,
            subject: alarm.summary().unwrap_or_default().to_string(),
            text_body: alarm.description().unwrap_or_default().to_string(),
            html_body: read_description_html(alarm),
            attachments: read_links(alarm).into_values().collect(),
        }
    } else {
        let media_links = read_links(alarm);
        Action::Display {
            media_links: if media_links.is_empty() { None } else { Some(media_links) },
        }
    }
}

// ---- links -------------------------------------------------------------

fn read_links(event: &Component) -> BTreeMap<String, Link> {
    let mut links = BTreeMap::new();
    let mut counter = 0u32;

    let attachments = event
        .get_properties("ATTACH")
        .into_iter()
        .chain(event.get_properties(xparams::ATTACH_PROPERTY));

    for attach in attachments {
        if matches!(attach.value, Value::Binary(_)) {
            continue;
        }
        let Some(href) = attach.as_text().filter(|s| !s.is_empty()) else {
            continue;
        };

        let id = attach.get_param_value(xparams::LINK_ID).map(str::to_string).unwrap_or_else(|| {
            counter += 1;
            format!("link{counter}")
        });

        let size = attach.get_param_value("SIZE").and_then(|s| s.parse::<u64>().ok());
        let properties = attach
            .get_param_value(xparams::PROPERTIES)
            .and_then(decode_properties_blob);

        links.insert(
            id.clone(),
            Link {
                id,
                href: href.to_string(),
                content_type: attach.get_param_value("FMTTYPE").map(str::to_string),
                title: attach.get_param_value(xparams::TITLE).map(str::to_string),
                size,
                rel: attach.get_param_value(xparams::REL).map(str::to_string),
                cid: attach.get_param_value(xparams::CID).map(str::to_string),
                properties,
            },
        );
    }

    links
}

fn decode_properties_blob(encoded: &str) -> Option<serde_json::Value> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let bytes = STANDARD.decode(encoded).ok()?;
    serde_json::from_slice(&bytes).ok()
}

// ---- HTML description ---------------------------------------------------

fn read_description_html(event: &Component) -> Option<String> {
    let description = event.get_property("DESCRIPTION")?;
    let altrep = description.get_param_value("ALTREP")?;
    altrep.strip_prefix("data:text/html,").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_mail_lowercases_domain_only() {
        assert_eq!(canonical_mail("mailto:Alice@Example.COM"), "Alice@example.com");
        assert_eq!(canonical_mail("MAILTO:bob@example.com"), "bob@example.com");
    }

    #[test]
    fn resolve_rsvp_follows_delegation_chain() {
        let mut a = Property::text("ATTENDEE", "mailto:a@example.com");
        a.add_param(crate::rfc::ical::core::Parameter::new("PARTSTAT", "DELEGATED"));
        a.add_param(crate::rfc::ical::core::Parameter::new("DELEGATED-TO", "mailto:b@example.com"));

        let mut b = Property::text("ATTENDEE", "mailto:b@example.com");
        b.add_param(crate::rfc::ical::core::Parameter::new("PARTSTAT", "ACCEPTED"));

        let by_uri: HashMap<&str, &Property> =
            [("mailto:a@example.com", &a), ("mailto:b@example.com", &b)].into_iter().collect();

        assert_eq!(resolve_rsvp("mailto:a@example.com", &by_uri, 0), RsvpResponse::Accepted);
    }

    #[test]
    fn resolve_rsvp_caps_cycle_depth() {
        let mut a = Property::text("ATTENDEE", "mailto:a@example.com");
        a.add_param(crate::rfc::ical::core::Parameter::new("PARTSTAT", "DELEGATED"));
        a.add_param(crate::rfc::ical::core::Parameter::new("DELEGATED-TO", "mailto:a@example.com"));

        let by_uri: HashMap<&str, &Property> = [("mailto:a@example.com", &a)].into_iter().collect();

        assert_eq!(resolve_rsvp("mailto:a@example.com", &by_uri, 0), RsvpResponse::NeedsAction);
    }

    #[test]
    fn all_day_event_reads_no_timezone() {
        use crate::rfc::ical::core::{Component as Comp, Date};

        let mut event = Comp::event();
        event.add_property(Property::text("UID", "allday@example.com"));
        event.add_property(Property::date("DTSTART", Date { year: 2020, month: 1, day: 1 }));

        let mut calendar = Comp::calendar();
        calendar.add_property(Property::text("PRODID", "-//Test//Test//EN"));
        calendar.add_child(event);

        let doc = to_document(&calendar).expect("should translate");
        assert!(doc.is_all_day);
        assert_eq!(doc.time_zone, None);
        assert_eq!(doc.duration, "P0D");
    }
}
