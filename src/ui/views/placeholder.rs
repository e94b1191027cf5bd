use async_trait::async_trait;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Wrap},
};

use crate::ui::components::spinner::Spinner;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};
use crate::util::colors;

/// Shown while a navigation fetch is in flight, or in place of a view
/// whose fetch failed.
pub struct Placeholder {
    error: Option<String>,
}

impl Placeholder {
    pub fn loading() -> Self {
        Self { error: None }
    }

    pub fn error(message: String) -> Self {
        Self {
            error: Some(message),
        }
    }
}

#[async_trait(?Send)]
impl View for Placeholder {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, _ctx: &AppContext) {
        match &self.error {
            Some(message) => {
                let text = format!("Could not load this page: {message}\nPress Backspace to go back.");
                let paragraph = Paragraph::new(text)
                    .style(Style::default().fg(colors::ERROR))
                    .wrap(Wrap { trim: true })
                    .centered();
                f.render_widget(paragraph, area);
            }
            None => {
                let spinner = Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label("Loading...");
                f.render_widget(spinner, area);
            }
        }
    }

    async fn handle_input(
        &mut self,
        _key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        None
    }
}
