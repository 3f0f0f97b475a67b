use chrono::{DateTime, Utc};
use std::fmt;

/// Kind of chat an event was observed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[default]
    Unknown,
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatKind::Private => write!(f, "private"),
            ChatKind::Group => write!(f, "group"),
            ChatKind::Supergroup => write!(f, "supergroup"),
            ChatKind::Channel => write!(f, "channel"),
            ChatKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for ChatKind {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "private" => ChatKind::Private,
            "group" => ChatKind::Group,
            "supergroup" => ChatKind::Supergroup,
            "channel" => ChatKind::Channel,
            _ => ChatKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserInfo {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    pub is_bot: bool,
}

impl UserInfo {
    /// "First Last", skipping whichever part is missing
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `@username`, or the bare numeric id when the user has no username.
    pub fn handle(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => format!("@{name}"),
            _ => self.id.to_string(),
        }
    }

    /// Username without the `@`, or the numeric id.
    pub fn username_or_id(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatInfo {
    pub id: i64,
    pub title: String,
    pub kind: ChatKind,
}

/// The single attachment classification carried by an event
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Photo,
    Sticker { emoji: Option<String> },
    Document { file_name: Option<String>, mime_type: Option<String> },
    Voice { duration_seconds: u32 },
    Location { latitude: f64, longitude: f64 },
    Video { duration_seconds: u32 },
}

impl Media {
    pub fn kind(&self) -> &'static str {
        match self {
            Media::Photo => "photo",
            Media::Sticker { .. } => "sticker",
            Media::Document { .. } => "document",
            Media::Voice { .. } => "voice",
            Media::Location { .. } => "location",
            Media::Video { .. } => "video",
        }
    }
}

/// Normalized view of one observed chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEvent {
    pub timestamp: DateTime<Utc>,
    pub message_id: i32,
    pub from: UserInfo,
    pub chat: ChatInfo,
    pub text: Option<String>,
    pub media: Option<Media>,
    pub reply_to_id: Option<i32>,
    pub forward_from_user_id: Option<i64>,
}

impl ChatEvent {
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

// ── Inbound shapes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RawUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RawChat {
    pub id: i64,
    pub title: Option<String>,
    pub kind: ChatKind,
}

#[derive(Debug, Clone, Default)]
pub struct RawSticker {
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Attachment slots as the platform delivers them. More than one slot may be
/// populated; extraction keeps exactly one.
#[derive(Debug, Clone, Default)]
pub struct Attachments {
    pub photo: bool,
    pub sticker: Option<RawSticker>,
    pub document: Option<RawDocument>,
    /// Voice note duration in seconds
    pub voice: Option<u32>,
    pub location: Option<RawLocation>,
    /// Video duration in seconds
    pub video: Option<u32>,
}

/// A message as received from the chat platform binding.
///
/// The sender is not optional: conversions from platform types fail when the
/// sender is missing instead of inventing one.
#[derive(Debug, Clone, Default)]
pub struct RawMessage {
    pub message_id: i32,
    /// Unix timestamp in seconds
    pub date: i64,
    pub from: RawUser,
    pub chat: RawChat,
    pub text: Option<String>,
    pub attachments: Attachments,
    pub reply_to_message_id: Option<i32>,
    pub forward_from_user_id: Option<i64>,
}

// ── Deploy records ────────────────────────────────────────────────────────────

/// Keys that get a dedicated line in deploy notifications.
pub const WELL_KNOWN_DEPLOY_KEYS: [&str; 6] = [
    "version",
    "commit_hash",
    "branch",
    "deployer",
    "environment",
    "timestamp",
];

/// Flat key/value description of a release, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployRecord {
    entries: Vec<(String, String)>,
}

impl DeployRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, or `default` when absent or empty.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(v) if !v.is_empty() => v,
            _ => default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries that are not one of the well-known keys
    pub fn extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(k, _)| !WELL_KNOWN_DEPLOY_KEYS.contains(k))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeployRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = DeployRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
