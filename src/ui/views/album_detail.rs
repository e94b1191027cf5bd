use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListState, Padding, Paragraph},
};

use crate::http::models::Album;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};
use crate::ui::util::{select_next, select_previous, track_list_items};
use crate::util::colors;

pub struct AlbumDetail {
    album: Album,
    list_state: ListState,
}

impl AlbumDetail {
    pub fn new(album: Album) -> Self {
        let mut list_state = ListState::default();
        if !album.tracks.is_empty() {
            list_state.select(Some(0));
        }
        Self { album, list_state }
    }
}

#[async_trait(?Send)]
impl View for AlbumDetail {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                self.album.title.clone(),
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("By {}", self.album.artist_name)),
            Line::from(Span::styled(
                format!("{} tracks", self.album.tracks.len()),
                Style::default().fg(colors::NEUTRAL),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .padding(Padding::new(1, 1, 0, 0)),
        );
        f.render_widget(header, chunks[0]);

        let list = List::new(track_list_items(&self.album.tracks, ctx))
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let len = self.album.tracks.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let next = select_next(self.list_state.selected(), len);
                self.list_state.select(next);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let previous = select_previous(self.list_state.selected(), len);
                self.list_state.select(previous);
                None
            }
            KeyCode::Enter => {
                let track = self.album.tracks.get(self.list_state.selected()?)?;
                if track.playable_url().is_some() {
                    Some(Action::Play(track.clone()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
