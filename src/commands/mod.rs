pub mod advance;
pub mod board;
pub mod dashboard;
pub mod login;
pub mod reports;
pub mod show;

/// Clip a display string to `max_chars` characters, never splitting a
/// multi-byte character.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
