use async_trait::async_trait;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::event::events::Event;
use crate::http::models::Track;
use crate::ui::context::AppContext;
use crate::ui::router::NavigationTarget;
use crate::ui::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    PlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    /// Jump to a fraction of the current track.
    Seek(f32),
    /// Start (or toggle) a specific track picked in a view.
    Play(Track),
    Navigate(NavigationTarget),
    Back,
    Forward,
    OpenSearch,
    CloseOverlay,
    /// Search input changed; schedule a debounced fetch.
    SearchInput(String),
}

/// A routed screen or overlay. `?Send` because views live on the main
/// task alongside the audio output.
#[async_trait(?Send)]
pub trait View {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext);

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action>;

    async fn on_event(&mut self, _event: &Event, _ctx: &AppContext) {}
}
