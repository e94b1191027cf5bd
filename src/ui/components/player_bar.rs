use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::audio::player::Player;
use crate::ui::state::AppState;
use crate::util::{colors, text::format_time};

/// Bottom bar: current track, progress gauge and the toggle indicators.
pub struct PlayerBarWidget<'a> {
    player: &'a Player,
    state: &'a AppState,
}

impl<'a> PlayerBarWidget<'a> {
    pub fn new(player: &'a Player, state: &'a AppState) -> Self {
        Self { player, state }
    }

    fn track_line(&self) -> Line<'static> {
        match self.player.current_track() {
            Some(track) => {
                let icon = if self.player.is_playing() { "▶" } else { "⏸" };
                Line::from(vec![
                    Span::styled(format!("{icon} "), Style::default().fg(colors::PRIMARY)),
                    Span::styled(
                        track.title.clone(),
                        Style::default().fg(colors::SECONDARY).bold(),
                    ),
                    Span::styled(
                        format!("  {}", track.display_artists()),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                ])
            }
            None => Line::from(Span::styled(
                "Nothing playing",
                Style::default().fg(colors::NEUTRAL),
            )),
        }
    }

    fn toggles_line(&self) -> Line<'static> {
        let on = Style::default().fg(colors::PRIMARY);
        let off = Style::default().fg(colors::NEUTRAL);
        let flag = |active: bool| if active { on } else { off };

        let volume = if self.player.is_muted() {
            Span::styled("muted".to_string(), on)
        } else {
            Span::styled(
                format!("vol {:>3.0}%", self.player.volume() * 100.0),
                off,
            )
        };

        Line::from(vec![
            Span::styled("[s]huffle", flag(self.player.shuffle())),
            Span::raw("  "),
            Span::styled("[r]epeat", flag(self.player.repeat())),
            Span::raw("  "),
            volume,
        ])
    }
}

impl Widget for PlayerBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        Paragraph::new(self.track_line()).render(rows[0], buf);

        let (position, duration) = self.player.progress();
        let (ratio, label) = match duration {
            Some(total) if !total.is_zero() => (
                (position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0),
                format!("{} / {}", format_time(position), format_time(total)),
            ),
            _ => (0.0, format_time(position)),
        };
        Gauge::default()
            .gauge_style(Style::default().fg(colors::PRIMARY).bg(colors::NEUTRAL))
            .ratio(ratio)
            .label(label)
            .use_unicode(true)
            .render(rows[1], buf);

        let status_line = match &self.state.status {
            Some(message) => Line::from(Span::styled(
                message.clone(),
                Style::default().fg(colors::ERROR),
            )),
            None => self.toggles_line(),
        };
        Paragraph::new(status_line).render(rows[2], buf);
    }
}
