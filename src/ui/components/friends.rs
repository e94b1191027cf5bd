use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Widget},
};

use crate::http::models::FriendStatus;
use crate::util::{colors, text::truncate_to_width};

/// Side panel mirroring the web app's friend activity column.
pub struct FriendPanelWidget<'a> {
    friends: &'a [FriendStatus],
}

impl<'a> FriendPanelWidget<'a> {
    pub fn new(friends: &'a [FriendStatus]) -> Self {
        Self { friends }
    }
}

impl Widget for FriendPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::LEFT)
            .title(" Friends ")
            .title_style(Style::default().fg(colors::SECONDARY).bold());

        if self.friends.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            buf.set_string(
                inner.x + 1,
                inner.y,
                "No one is around",
                Style::default().fg(colors::NEUTRAL),
            );
            return;
        }

        let width = area.width.saturating_sub(3) as usize;
        let items: Vec<ListItem> = self
            .friends
            .iter()
            .map(|friend| {
                let activity = match friend.listeningto.as_deref() {
                    Some(title) => Line::from(Span::styled(
                        truncate_to_width(&format!("  ♪ {title}"), width),
                        Style::default().fg(colors::PRIMARY),
                    )),
                    None => Line::from(Span::styled(
                        "  idle",
                        Style::default().fg(colors::NEUTRAL),
                    )),
                };
                ListItem::new(vec![
                    Line::from(Span::styled(
                        truncate_to_width(&friend.username, width),
                        Style::default().fg(colors::SECONDARY),
                    )),
                    activity,
                ])
            })
            .collect();

        List::new(items).block(block).render(area, buf);
    }
}
