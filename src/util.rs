use chrono::Local;

/// Largest payload the log chat accepts before truncation
pub const MAX_REMOTE_CHARS: usize = 4000;

/// Appended to payloads cut at [`MAX_REMOTE_CHARS`]
pub const TRUNCATION_MARKER: &str = "\n... (message truncated)";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time as `YYYY-MM-DD HH:MM:SS`
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// First `max_chars` characters of `text` followed by `...` when longer.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Like [`truncate_text`] but the result, ellipsis included, fits `max_chars`.
pub fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    truncate_text(text, max_chars.saturating_sub(3))
}

/// Placeholder for empty strings
pub fn safe_string(s: &str) -> &str {
    if s.is_empty() {
        "(empty)"
    } else {
        s
    }
}

/// Cap a remote payload at [`MAX_REMOTE_CHARS`], appending the marker.
pub fn truncate_payload(text: String) -> String {
    match text.char_indices().nth(MAX_REMOTE_CHARS) {
        Some((end, _)) => {
            let mut cut = text;
            cut.truncate(end);
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        None => text,
    }
}

fn html_entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    }
}

/// Escape text for HTML-marked payloads
pub fn escape_html(s: &str) -> String {
    escape_html_capped(s, usize::MAX)
}

/// Escape `s` for HTML so the escaped result fits in `max_chars`.
///
/// Longer input is cut between characters, never inside an entity, and ends
/// with `...` (counted in the limit).
pub fn escape_html_capped(s: &str, max_chars: usize) -> String {
    let escaped_len = |c: char| html_entity(c).map_or(1, str::len);
    if s.chars().map(escaped_len).sum::<usize>() <= max_chars {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match html_entity(c) {
                Some(entity) => out.push_str(entity),
                None => out.push(c),
            }
        }
        return out;
    }

    let budget = max_chars.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        used += escaped_len(c);
        if used > budget {
            break;
        }
        match html_entity(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out.push_str("...");
    out
}
