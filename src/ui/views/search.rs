use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::event::events::Event;
use crate::http::models::{AlbumHit, Track};
use crate::http::MIN_QUERY_LEN;
use crate::ui::components::spinner::Spinner;
use crate::ui::context::AppContext;
use crate::ui::router::NavigationTarget;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};
use crate::ui::util::{select_next, select_previous, track_list_items};
use crate::util::colors;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SearchTab {
    Tracks,
    Albums,
}

/// Search overlay. Typing reschedules a debounced fetch; results are
/// dropped unless they answer the query currently in the input box.
pub struct Search {
    input: String,
    tab: SearchTab,
    tracks: Vec<Track>,
    albums: Vec<AlbumHit>,
    list_state: ListState,
    is_loading: bool,
}

impl Search {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            tab: SearchTab::Tracks,
            tracks: Vec::new(),
            albums: Vec::new(),
            list_state: ListState::default(),
            is_loading: false,
        }
    }

    fn result_len(&self) -> usize {
        match self.tab {
            SearchTab::Tracks => self.tracks.len(),
            SearchTab::Albums => self.albums.len(),
        }
    }

    fn query_changed(&mut self) -> Option<Action> {
        self.list_state.select(None);
        if self.input.trim().chars().count() < MIN_QUERY_LEN {
            self.tracks.clear();
            self.albums.clear();
            self.is_loading = false;
            return None;
        }
        self.is_loading = true;
        Some(Action::SearchInput(self.input.clone()))
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl View for Search {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let input = Paragraph::new(Line::from(vec![
            Span::styled("Search: ", Style::default().fg(colors::NEUTRAL)),
            Span::styled(
                self.input.clone(),
                Style::default().fg(colors::SECONDARY),
            ),
            Span::styled("█", Style::default().fg(colors::PRIMARY)),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(input, chunks[0]);

        let tab_style = |tab| {
            if self.tab == tab {
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::NEUTRAL)
            }
        };
        let tabs = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Tracks ({})", self.tracks.len()),
                tab_style(SearchTab::Tracks),
            ),
            Span::raw("   "),
            Span::styled(
                format!("Albums ({})", self.albums.len()),
                tab_style(SearchTab::Albums),
            ),
            Span::styled("   (Tab switches)", Style::default().fg(colors::NEUTRAL)),
        ]));
        f.render_widget(tabs, chunks[1]);

        if self.input.trim().chars().count() < MIN_QUERY_LEN {
            let hint = Paragraph::new(format!(
                "Type at least {MIN_QUERY_LEN} characters to search."
            ))
            .style(Style::default().fg(colors::NEUTRAL));
            f.render_widget(hint, chunks[2]);
            return;
        }

        if self.is_loading && self.result_len() == 0 {
            let spinner = Spinner::default()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label("Searching...");
            f.render_widget(spinner, chunks[2]);
            return;
        }

        match self.tab {
            SearchTab::Tracks => {
                let list = List::new(track_list_items(&self.tracks, ctx))
                    .highlight_style(
                        Style::default()
                            .fg(colors::PRIMARY)
                            .add_modifier(Modifier::BOLD),
                    )
                    .highlight_symbol("> ");
                f.render_stateful_widget(list, chunks[2], &mut self.list_state);
            }
            SearchTab::Albums => {
                let items: Vec<ListItem> = self
                    .albums
                    .iter()
                    .map(|album| {
                        let artist = album
                            .artist_name
                            .as_deref()
                            .map(|name| format!(" - {name}"))
                            .unwrap_or_default();
                        ListItem::new(format!("{}{artist}", album.title))
                            .style(Style::default().fg(colors::SECONDARY))
                    })
                    .collect();
                let list = List::new(items)
                    .highlight_style(
                        Style::default()
                            .fg(colors::PRIMARY)
                            .add_modifier(Modifier::BOLD),
                    )
                    .highlight_symbol("> ");
                f.render_stateful_widget(list, chunks[2], &mut self.list_state);
            }
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CloseOverlay),
            KeyCode::Tab => {
                self.tab = match self.tab {
                    SearchTab::Tracks => SearchTab::Albums,
                    SearchTab::Albums => SearchTab::Tracks,
                };
                self.list_state.select(None);
                None
            }
            KeyCode::Down => {
                let next = select_next(self.list_state.selected(), self.result_len());
                self.list_state.select(next);
                None
            }
            KeyCode::Up => {
                let previous = select_previous(self.list_state.selected(), self.result_len());
                self.list_state.select(previous);
                None
            }
            KeyCode::Enter => match self.tab {
                SearchTab::Tracks => {
                    let track = self.tracks.get(self.list_state.selected()?)?;
                    if track.playable_url().is_some() {
                        Some(Action::Play(track.clone()))
                    } else {
                        None
                    }
                }
                SearchTab::Albums => {
                    let album = self.albums.get(self.list_state.selected()?)?;
                    Some(Action::Navigate(NavigationTarget::Album(album.id)))
                }
            },
            KeyCode::Backspace => {
                self.input.pop();
                self.query_changed()
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.query_changed()
            }
            _ => None,
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        if let Event::SearchResults {
            query,
            tracks,
            albums,
        } = event
        {
            // A result for an outdated query is ignored; the newer
            // debounce will deliver the right one.
            if query.trim() != self.input.trim() {
                return;
            }
            self.tracks = tracks.clone();
            self.albums = albums.clone();
            self.is_loading = false;
            self.list_state.select(if self.result_len() > 0 { Some(0) } else { None });
        }
    }
}
