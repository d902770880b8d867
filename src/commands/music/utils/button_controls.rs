use super::queue_manager::{EntryId, QueueEntry};
use super::{format_duration, truncate_title};
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use serenity::all::{
    ButtonStyle, ComponentInteraction, ComponentInteractionDataKind, CreateActionRow,
    CreateButton, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption,
};

pub const CLEAR_BUTTON: &str = "music_clear";
pub const PLAY_PAUSE_BUTTON: &str = "music_play_pause";
pub const SKIP_BUTTON: &str = "music_skip";

/// Buttons handled by the global component handler.
pub const PLAYER_BUTTONS: [&str; 3] = [CLEAR_BUTTON, PLAY_PAUSE_BUTTON, SKIP_BUTTON];

pub const SEARCH_SELECT_PREFIX: &str = "search_pick";
pub const QUEUE_SELECT_PREFIX: &str = "queue_remove";

/// Creates a row of music control buttons
pub fn player_buttons() -> Vec<CreateActionRow> {
    let clear = CreateButton::new(CLEAR_BUTTON)
        .style(ButtonStyle::Danger)
        .label("⏹");

    let play_pause = CreateButton::new(PLAY_PAUSE_BUTTON)
        .style(ButtonStyle::Secondary)
        .label("⏸");

    let skip = CreateButton::new(SKIP_BUTTON)
        .style(ButtonStyle::Secondary)
        .label("⏭");

    vec![CreateActionRow::Buttons(vec![clear, play_pause, skip])]
}

/// Multi-select over search results; option values are result indices.
pub fn search_select(custom_id: &str, tracks: &[TrackMetadata]) -> Option<CreateActionRow> {
    let options: Vec<_> = tracks
        .iter()
        .take(25)
        .enumerate()
        .map(|(index, track)| {
            CreateSelectMenuOption::new(truncate_title(&track.title), index.to_string())
                .description(format_duration(track.duration))
        })
        .collect();

    select_row(custom_id, options, "Pick the songs to add !")
}

/// Multi-select over queued entries; option values are entry ids.
pub fn queue_remove_select(custom_id: &str, entries: &[QueueEntry]) -> Option<CreateActionRow> {
    let options: Vec<_> = entries
        .iter()
        .take(25)
        .enumerate()
        .map(|(index, entry)| {
            CreateSelectMenuOption::new(
                format!("#{} {}", index + 1, truncate_title(&entry.track.title)),
                entry.id.to_string(),
            )
            .description(format_duration(entry.track.duration))
        })
        .collect();

    select_row(custom_id, options, "Pick the songs to remove !")
}

fn select_row(
    custom_id: &str,
    options: Vec<CreateSelectMenuOption>,
    placeholder: &str,
) -> Option<CreateActionRow> {
    if options.is_empty() {
        return None;
    }
    let max = options.len() as u8;
    let menu = CreateSelectMenu::new(custom_id, CreateSelectMenuKind::String { options })
        .placeholder(placeholder)
        .min_values(1)
        .max_values(max);
    Some(CreateActionRow::SelectMenu(menu))
}

/// Values picked in a string select menu.
pub fn selected_values(interaction: &ComponentInteraction) -> &[String] {
    match &interaction.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => values.as_slice(),
        _ => &[],
    }
}

/// Map picked result indices back to tracks, ignoring anything out of range.
pub fn picked_tracks(tracks: &[TrackMetadata], values: &[String]) -> Vec<TrackMetadata> {
    values
        .iter()
        .filter_map(|value| value.parse::<usize>().ok())
        .filter_map(|index| tracks.get(index).cloned())
        .collect()
}

pub fn picked_entry_ids(values: &[String]) -> Vec<EntryId> {
    values
        .iter()
        .filter_map(|value| value.parse::<u64>().ok())
        .map(EntryId)
        .collect()
}
