use std::time::Duration;

// Export music utilities
pub mod button_controls;
pub mod component_handlers;
pub mod embedded_messages;
pub mod event_handlers;
pub mod inactivity;
pub mod music_manager;
pub mod notifier;
pub mod queue_manager;
pub mod session;
pub mod songbird_voice;
pub mod voice;

/// Longest track name shown in embeds and menus, in characters.
pub const MAX_TITLE_LEN: usize = 45;

/// Format a duration into a human-readable string (e.g., "3:45" or "1:23:45")
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Cut `title` down to [`MAX_TITLE_LEN`] characters, marking the cut with "...".
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_LEN {
        return title.to_string();
    }
    let kept: String = title.chars().take(MAX_TITLE_LEN - 3).collect();
    format!("{kept}...")
}
