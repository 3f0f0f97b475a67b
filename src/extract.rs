use chrono::{DateTime, Utc};

use crate::event::{
    Attachments, ChatEvent, ChatInfo, ChatKind, Media, RawMessage, RawUser, UserInfo,
};

/// Title used when neither the chat nor the sender offer one
pub const UNKNOWN_CHAT_TITLE: &str = "Unknown";

/// Convert a raw platform message into a [`ChatEvent`].
///
/// Never fails: missing optional fields stay missing. `kind_hint` is the chat
/// kind as the caller sees it and takes precedence over the raw chat kind.
pub fn extract(raw: &RawMessage, kind_hint: ChatKind) -> ChatEvent {
    let from = user_info(&raw.from);

    ChatEvent {
        timestamp: DateTime::<Utc>::from_timestamp(raw.date, 0).unwrap_or_default(),
        message_id: raw.message_id,
        chat: ChatInfo {
            id: raw.chat.id,
            title: chat_title(raw, &from, kind_hint),
            kind: kind_hint,
        },
        from,
        text: non_empty(raw.text.as_deref()),
        media: classify_media(&raw.attachments),
        reply_to_id: raw.reply_to_message_id,
        forward_from_user_id: raw.forward_from_user_id,
    }
}

fn user_info(user: &RawUser) -> UserInfo {
    UserInfo {
        id: user.id,
        first_name: non_empty(Some(&user.first_name)),
        last_name: non_empty(user.last_name.as_deref()),
        username: non_empty(user.username.as_deref()),
        language_code: non_empty(user.language_code.as_deref()),
        is_bot: user.is_bot,
    }
}

fn chat_title(raw: &RawMessage, from: &UserInfo, kind: ChatKind) -> String {
    if let Some(title) = raw.chat.title.as_deref().filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    if kind == ChatKind::Private {
        let name = from.full_name();
        if !name.is_empty() {
            return name;
        }
    }
    UNKNOWN_CHAT_TITLE.to_string()
}

/// Pick one media kind: photo, sticker, document, voice, location, video.
pub fn classify_media(slots: &Attachments) -> Option<Media> {
    if slots.photo {
        return Some(Media::Photo);
    }
    if let Some(sticker) = &slots.sticker {
        return Some(Media::Sticker {
            emoji: sticker.emoji.clone(),
        });
    }
    if let Some(doc) = &slots.document {
        return Some(Media::Document {
            file_name: doc.file_name.clone(),
            mime_type: doc.mime_type.clone(),
        });
    }
    if let Some(duration) = slots.voice {
        return Some(Media::Voice {
            duration_seconds: duration,
        });
    }
    if let Some(loc) = slots.location {
        return Some(Media::Location {
            latitude: loc.latitude,
            longitude: loc.longitude,
        });
    }
    slots.video.map(|duration| Media::Video {
        duration_seconds: duration,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{RawChat, RawDocument, RawLocation, RawSticker};

    fn raw(chat_title: Option<&str>) -> RawMessage {
        RawMessage {
            message_id: 7,
            date: 1_700_000_000,
            from: RawUser {
                id: 456,
                first_name: "John".to_string(),
                last_name: Some("Doe".to_string()),
                username: Some("johndoe".to_string()),
                ..Default::default()
            },
            chat: RawChat {
                id: 789,
                title: chat_title.map(str::to_string),
                kind: ChatKind::Private,
            },
            text: Some("Hello, world!".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_copies_identity_fields() {
        let event = extract(&raw(Some("Test Chat")), ChatKind::Group);
        assert_eq!(event.message_id, 7);
        assert_eq!(event.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(event.from.id, 456);
        assert_eq!(event.from.username.as_deref(), Some("johndoe"));
        assert_eq!(event.chat.title, "Test Chat");
        assert_eq!(event.chat.kind, ChatKind::Group);
        assert_eq!(event.text.as_deref(), Some("Hello, world!"));
        assert!(event.media.is_none());
    }

    #[test]
    fn test_private_chat_title_uses_sender_name() {
        let event = extract(&raw(None), ChatKind::Private);
        assert_eq!(event.chat.title, "John Doe");
    }

    #[test]
    fn test_group_without_title_is_unknown() {
        let event = extract(&raw(Some("")), ChatKind::Group);
        assert_eq!(event.chat.title, UNKNOWN_CHAT_TITLE);
    }

    #[test]
    fn test_empty_optionals_become_absent() {
        let mut message = raw(None);
        message.text = Some(String::new());
        message.from.username = Some(String::new());
        let event = extract(&message, ChatKind::Private);
        assert!(event.text.is_none());
        assert!(event.from.username.is_none());
    }

    #[test]
    fn test_media_priority_first_match_wins() {
        let mut slots = Attachments {
            photo: true,
            sticker: Some(RawSticker {
                emoji: Some("😎".to_string()),
            }),
            document: Some(RawDocument::default()),
            voice: Some(3),
            location: Some(RawLocation::default()),
            video: Some(9),
        };
        assert_eq!(classify_media(&slots), Some(Media::Photo));

        slots.photo = false;
        assert_eq!(classify_media(&slots).map(|m| m.kind()), Some("sticker"));
        slots.sticker = None;
        assert_eq!(classify_media(&slots).map(|m| m.kind()), Some("document"));
        slots.document = None;
        assert_eq!(
            classify_media(&slots),
            Some(Media::Voice {
                duration_seconds: 3
            })
        );
        slots.voice = None;
        assert_eq!(classify_media(&slots).map(|m| m.kind()), Some("location"));
        slots.location = None;
        assert_eq!(
            classify_media(&slots),
            Some(Media::Video {
                duration_seconds: 9
            })
        );
        slots.video = None;
        assert_eq!(classify_media(&slots), None);
    }
}
