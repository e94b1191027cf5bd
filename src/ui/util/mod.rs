pub mod handler;

use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::{
    style::{Modifier, Style},
    widgets::ListItem,
};

use crate::http::models::Track;
use crate::ui::context::AppContext;
use crate::util::colors;

/// Pulsing marker next to the playing track, static while paused.
pub fn active_track_icon(is_playing: bool) -> &'static str {
    if !is_playing {
        return "•";
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    match (now / 200) % 4 {
        0 | 3 => "·",
        1 => "•",
        _ => "●",
    }
}

/// Shared track-row rendering for the list views: marks the current
/// track, dims tracks without media.
pub fn track_list_items<'a>(tracks: &[Track], ctx: &AppContext) -> Vec<ListItem<'a>> {
    let current_url = ctx
        .player
        .current_track()
        .and_then(Track::playable_url)
        .map(str::to_string);
    let is_playing = ctx.player.is_playing();

    tracks
        .iter()
        .map(|track| {
            let is_current = track.playable_url().is_some()
                && track.playable_url() == current_url.as_deref();
            let prefix = if is_current {
                format!("{} ", active_track_icon(is_playing))
            } else {
                "  ".to_string()
            };

            let mut content = format!("{}{} - {}", prefix, track.title, track.display_artists());
            let mut item_style = Style::default().fg(colors::SECONDARY);
            if track.playable_url().is_none() {
                content.push_str("  (unavailable)");
                item_style = Style::default()
                    .fg(colors::NEUTRAL)
                    .add_modifier(Modifier::DIM);
            } else if is_current {
                item_style = Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD);
            }
            ListItem::new(content).style(item_style)
        })
        .collect()
}

/// Clamped list-selection movement shared by the views.
pub fn select_next(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(selected.map_or(0, |i| if i >= len - 1 { i } else { i + 1 }))
}

pub fn select_previous(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(selected.map_or(0, |i| i.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamps_at_both_ends() {
        assert_eq!(select_next(None, 3), Some(0));
        assert_eq!(select_next(Some(2), 3), Some(2));
        assert_eq!(select_previous(Some(0), 3), Some(0));
        assert_eq!(select_previous(Some(2), 3), Some(1));
        assert_eq!(select_next(Some(0), 0), None);
    }
}
