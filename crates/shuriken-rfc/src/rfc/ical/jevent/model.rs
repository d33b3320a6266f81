//! The JEVENT document model: a JSON-shaped calendar event representation
//! translated to and from iCalendar components.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document classification (RFC 5545 CLASS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Private,
    Secret,
}

impl Default for Privacy {
    fn default() -> Self {
        Self::Public
    }
}

/// Free/busy transparency (RFC 5545 TRANSP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    Free,
    Busy,
}

impl Default for Transparency {
    fn default() -> Self {
        Self::Busy
    }
}

/// Scheduling status (RFC 5545 STATUS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl Default for EventStatus {
    fn default() -> Self {
        Self::Confirmed
    }
}

/// The full JEVENT document for one event occurrence (master or a
/// materialized override).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(rename = "@type")]
    pub kind_marker: String,

    pub uid: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub keywords: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    pub privacy: Privacy,
    pub transparency: Transparency,
    pub status: EventStatus,
    pub priority: u8,
    pub sequence: u32,

    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub prod_id: String,

    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    pub duration: String,
    pub is_all_day: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub recurrence_overrides: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub participants: BTreeMap<String, Participant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyTo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, Location>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alerts: BTreeMap<String, Alert>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub related_to: BTreeMap<String, String>,
}

impl EventDocument {
    /// The set of top-level keys an override patch may never carry; these
    /// belong to the master and are silently dropped if present.
    pub const FORBIDDEN_OVERRIDE_KEYS: &'static [&'static str] = &[
        "uid",
        "relatedTo",
        "prodId",
        "isAllDay",
        "recurrenceRule",
        "recurrenceOverrides",
        "replyTo",
        "participantId",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skip {
    Omit,
    Backward,
    Forward,
}

/// One `byDay` entry: a weekday tag with an optional signed ordinal
/// ("2nd Tuesday", "last Friday").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NDay {
    pub day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth_of_period: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<Skip>,
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_day: Vec<NDay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_month: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_month_day: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_year_day: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_week_no: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_hour: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_minute: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_second: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_set_position: Vec<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

fn default_interval() -> u32 {
    1
}

fn default_first_day_of_week() -> String {
    "mo".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Individual,
    Group,
    Resource,
    Location,
    Unknown,
}

impl Default for ParticipantKind {
    fn default() -> Self {
        Self::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Participation {
    Required,
    Optional,
    NonParticipant,
}

impl Default for Participation {
    fn default() -> Self {
        Self::Required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RsvpResponse {
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
}

impl Default for RsvpResponse {
    fn default() -> Self {
        Self::NeedsAction
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: ParticipantKind,
    #[serde(default)]
    pub participation: Participation,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub rsvp_response: RsvpResponse,
    #[serde(default)]
    pub rsvp_wanted: bool,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub delegated_to: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub delegated_from: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub member_of: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub link_ids: BTreeSet<String>,
    #[serde(default)]
    pub schedule_sequence: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyTo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationRel {
    Unknown,
    Virtual,
    End,
}

impl Default for LocationRel {
    fn default() -> Self {
        Self::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default)]
    pub rel: LocationRel,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub features: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub link_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeTo {
    BeforeStart,
    AfterStart,
    BeforeEnd,
    AfterEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum Action {
    Display {
        #[serde(skip_serializing_if = "Option::is_none")]
        media_links: Option<BTreeMap<String, Link>>,
    },
    Email {
        to: Vec<EmailRecipient>,
        subject: String,
        text_body: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        html_body: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<Link>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub relative_to: RelativeTo,
    pub offset: String,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snoozed: Option<DateTime<Utc>>,
}
