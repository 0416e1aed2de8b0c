const MAX_PREVIEW_CHARS: usize = 100;

/// Shortens transcript text for log lines.
pub fn preview_transcript(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    if total <= MAX_PREVIEW_CHARS {
        return trimmed.to_string();
    }

    let head: String = trimmed.chars().take(MAX_PREVIEW_CHARS).collect();
    format!("{}... ({} chars total)", head, total)
}
