use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::{
    audio::state::PlaybackState,
    event::events::{Event, ViewContent},
    http::models::Track,
    ui::{
        app::App,
        router::NavigationTarget,
        traits::{Action, View},
        tui::{TerminalEvent, Tui},
        views::{AlbumDetail, Home, PlaylistDetail, Search},
    },
};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<()> {
        if let Some(evt) = tui.next().await {
            Self::handle_terminal_event(app, evt, tui).await?;
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_app_event(app, evt).await;
        }

        Ok(())
    }

    async fn handle_terminal_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<()> {
        match evt {
            TerminalEvent::Tick => {
                if app.ctx.player.poll_finished() {
                    app.ctx.player.on_track_ended().await;
                }
            }
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Resize(..) => {}
        }
        Ok(())
    }

    async fn handle_key_event(app: &mut App, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            app.should_quit = true;
            return;
        }

        // Keystrokes touched by the status line clear it.
        app.state.status = None;

        let action = {
            let App {
                router, state, ctx, ..
            } = app;
            router.handle_input(key, state, ctx).await
        };
        if let Some(action) = action {
            Self::dispatch(app, action).await;
            return;
        }

        // An open overlay owns the keyboard (it is a text input).
        if app.router.has_overlay() {
            return;
        }

        if let Some(action) = global_action(key) {
            Self::dispatch(app, action).await;
        }
    }

    async fn dispatch(app: &mut App, action: Action) {
        match action {
            Action::Quit => app.should_quit = true,
            Action::PlayPause => app.ctx.player.play_pause().await,
            Action::NextTrack => app.ctx.player.next().await,
            Action::PreviousTrack => app.ctx.player.previous().await,
            Action::ToggleShuffle => app.ctx.player.toggle_shuffle(),
            Action::ToggleRepeat => app.ctx.player.toggle_repeat(),
            Action::ToggleMute => app.ctx.player.toggle_mute(),
            Action::VolumeUp => app.ctx.player.volume_up(),
            Action::VolumeDown => app.ctx.player.volume_down(),
            Action::Seek(fraction) => app.ctx.player.seek(fraction),
            Action::Play(track) => {
                app.router.clear_overlay();
                if let Err(e) = app.ctx.player.play_track(track).await {
                    app.state.status = Some(e.to_string());
                }
            }
            Action::Navigate(target) => {
                app.router.clear_overlay();
                Self::navigate(app, target, true);
            }
            Action::Back => {
                if let Some((target, generation)) = app.router.back() {
                    Self::spawn_view_fetch(app, target, generation);
                }
            }
            Action::Forward => {
                if let Some((target, generation)) = app.router.forward() {
                    Self::spawn_view_fetch(app, target, generation);
                }
            }
            Action::OpenSearch => app.router.set_overlay(Box::new(Search::new())),
            Action::CloseOverlay => app.router.clear_overlay(),
            Action::SearchInput(query) => Self::schedule_search(app, query),
        }
    }

    /// Kick off a navigation: bump the router and fetch the target's
    /// data in the background.
    pub fn navigate(app: &mut App, target: NavigationTarget, push_history: bool) {
        let generation = app.router.navigate(target.clone(), push_history);
        Self::spawn_view_fetch(app, target, generation);
    }

    fn spawn_view_fetch(app: &mut App, target: NavigationTarget, generation: u64) {
        let api = app.ctx.api.clone();
        let tx = app.event_tx.clone();
        app.task_manager.spawn(
            "view_fetch",
            tokio::spawn(async move {
                let result = match target {
                    NavigationTarget::Home => {
                        api.fetch_home_tracks().await.map(ViewContent::Home)
                    }
                    NavigationTarget::Album(id) => {
                        api.fetch_album(id).await.map(|album| ViewContent::Album(id, album))
                    }
                    NavigationTarget::Playlist(id) => api
                        .fetch_playlist(id)
                        .await
                        .map(|playlist| ViewContent::Playlist(id, playlist)),
                };
                match result {
                    Ok(content) => {
                        let _ = tx.send(Event::ViewLoaded {
                            generation,
                            content,
                        });
                    }
                    Err(e) => {
                        let _ = tx.send(Event::ViewFailed {
                            generation,
                            message: e.to_string(),
                        });
                    }
                }
            }),
        );
    }

    fn schedule_search(app: &mut App, query: String) {
        let tx = app.event_tx.clone();
        app.task_manager.spawn(
            "search_debounce",
            tokio::spawn(async move {
                tokio::time::sleep(SEARCH_DEBOUNCE).await;
                let _ = tx.send(Event::SearchRequested(query));
            }),
        );
    }

    async fn handle_app_event(app: &mut App, evt: Event) {
        {
            let App { router, ctx, .. } = app;
            router.on_event(&evt, ctx).await;
        }

        match evt {
            Event::PlaybackChanged => Self::push_listening_status(app),
            Event::ViewLoaded {
                generation,
                content,
            } => {
                let (view, tracks): (Box<dyn View>, Vec<Track>) = match content {
                    ViewContent::Home(tracks) => {
                        (Box::new(Home::new(tracks.clone())), tracks)
                    }
                    ViewContent::Album(_, album) => {
                        let tracks = album.tracks.clone();
                        (Box::new(AlbumDetail::new(album)), tracks)
                    }
                    ViewContent::Playlist(_, playlist) => {
                        let tracks = playlist.tracks.clone();
                        (Box::new(PlaylistDetail::new(playlist)), tracks)
                    }
                };
                // Installing a view replaces the queue with its tracks,
                // the same wholesale rebind the web UI does per render.
                if app.router.apply(generation, view) {
                    app.ctx.player.rebuild_queue(&tracks);
                }
            }
            Event::ViewFailed {
                generation,
                message,
            } => {
                app.router.apply_error(generation, message);
            }
            Event::SearchRequested(query) => {
                let api = app.ctx.api.clone();
                let tx = app.event_tx.clone();
                app.task_manager.spawn(
                    "search_fetch",
                    tokio::spawn(async move {
                        match api.search(&query).await {
                            Ok((albums, tracks)) => {
                                let _ = tx.send(Event::SearchResults {
                                    query,
                                    tracks,
                                    albums,
                                });
                            }
                            Err(e) => {
                                let _ = tx.send(Event::FetchError(e.to_string()));
                            }
                        }
                    }),
                );
            }
            // Consumed by the search overlay in on_event above.
            Event::SearchResults { .. } => {}
            Event::FriendActivity(friends) => app.state.friends = friends,
            Event::FetchError(message) => app.state.status = Some(message),
        }
    }

    /// Mirror the playback state to the server so friends see it. Fire
    /// and forget; the UI never waits on this.
    fn push_listening_status(app: &App) {
        let (title, listening) = match app.ctx.player.state() {
            PlaybackState::Playing(track) => (track.title.clone(), true),
            PlaybackState::Paused(track) => (track.title.clone(), false),
            PlaybackState::Stopped => (String::new(), false),
        };
        let api = app.ctx.api.clone();
        tokio::spawn(async move {
            if let Err(e) = api.update_listening_status(&title, listening).await {
                debug!("listening status push failed: {e}");
            }
        });
    }
}

fn global_action(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::PlayPause),
        KeyCode::Char('n') => Some(Action::NextTrack),
        KeyCode::Char('p') => Some(Action::PreviousTrack),
        KeyCode::Char('s') => Some(Action::ToggleShuffle),
        KeyCode::Char('r') => Some(Action::ToggleRepeat),
        KeyCode::Char('m') => Some(Action::ToggleMute),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::VolumeUp),
        KeyCode::Char('-') => Some(Action::VolumeDown),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('h') => Some(Action::Navigate(NavigationTarget::Home)),
        KeyCode::Backspace | KeyCode::Char('[') => Some(Action::Back),
        KeyCode::Char(']') => Some(Action::Forward),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            // 1 = 10% .. 9 = 90%, 0 = start of track.
            let digit = c.to_digit(10)? as f32;
            Some(Action::Seek(digit / 10.0))
        }
        _ => None,
    }
}
