use chrono::{DateTime, Local, Utc};

// ============== Timestamp Helpers ==============

/// Human timestamp shown in control summaries and saved messages.
pub fn display_timestamp(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local)
        .format("%d.%m.%Y %H:%M:%S")
        .to_string()
}

// ============== Text Helpers ==============

/// Keep at most `max_chars` characters, appending `...` when something was cut.
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out = s.chars().take(max_chars).collect::<String>();
    out.push_str("...");
    out
}
