//! Event records and the identities attached to them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Opaque identifier of an event record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    /// Draw a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated identity behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PrincipalId(id.into()),
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Academic,
    Cultural,
    Sports,
    Technology,
    Workshop,
    Conference,
    Competition,
    Social,
    Hackathon,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        EventType::Academic,
        EventType::Cultural,
        EventType::Sports,
        EventType::Technology,
        EventType::Workshop,
        EventType::Conference,
        EventType::Competition,
        EventType::Social,
        EventType::Hackathon,
        EventType::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventType::Academic => "Academic",
            EventType::Cultural => "Cultural",
            EventType::Sports => "Sports",
            EventType::Technology => "Technology",
            EventType::Workshop => "Workshop",
            EventType::Conference => "Conference",
            EventType::Competition => "Competition",
            EventType::Social => "Social",
            EventType::Hackathon => "Hackathon",
            EventType::Other => "Other",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownEventType(s.to_string()))
    }
}

/// A catalog entry.
///
/// `id` and `created_by` are fixed when the record is created; every other
/// field can be overwritten through an [`EventPatch`].
///
/// `kind`, `date` and `time` hold the text exactly as stored (`"Sports"`,
/// `"2025-03-01"`, `"08:00"`). Forms check them before they get here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub organizer: String,
    pub image_url: String,
    pub created_by: PrincipalId,
}

impl Event {
    /// Build the stored record for a draft.
    pub fn from_draft(id: EventId, draft: NewEvent, created_by: PrincipalId) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            organizer: draft.organizer,
            image_url: draft.image_url,
            created_by,
        }
    }

    /// The category, if the stored name is a known one.
    pub fn event_type(&self) -> Option<EventType> {
        self.kind.parse().ok()
    }

    /// The editable part of this record.
    pub fn draft(&self) -> NewEvent {
        NewEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            organizer: self.organizer.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// The caller-supplied fields of a new event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub organizer: String,
    #[serde(default)]
    pub image_url: String,
}

/// A partial update. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub image_url: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the set fields into `event`.
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(kind) = self.kind {
            event.kind = kind;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(organizer) = self.organizer {
            event.organizer = organizer;
        }
        if let Some(image_url) = self.image_url {
            event.image_url = image_url;
        }
    }
}
