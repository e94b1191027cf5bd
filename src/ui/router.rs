use std::fmt;

use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};
use crate::ui::views::placeholder::Placeholder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Home,
    Album(i64),
    Playlist(i64),
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Album(id) => write!(f, "Album {id}"),
            Self::Playlist(id) => write!(f, "Playlist {id}"),
        }
    }
}

/// Owns the visible view and the navigation history, with browser
/// semantics: navigating after going back truncates the forward tail.
///
/// Every navigation bumps a generation counter; a fetched view is only
/// installed when it still carries the latest generation, so slow
/// responses can never clobber a newer screen.
pub struct Router {
    history: Vec<NavigationTarget>,
    position: usize,
    generation: u64,
    view: Box<dyn View>,
    overlay: Option<Box<dyn View>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            position: 0,
            generation: 0,
            view: Box::new(Placeholder::loading()),
            overlay: None,
        }
    }

    /// Begin a navigation. Returns the generation the eventual fetch
    /// result must present to be applied.
    pub fn navigate(&mut self, target: NavigationTarget, push_history: bool) -> u64 {
        if push_history {
            if !self.history.is_empty() {
                self.history.truncate(self.position + 1);
            }
            self.history.push(target);
            self.position = self.history.len() - 1;
        } else if let Some(entry) = self.history.get_mut(self.position) {
            *entry = target;
        } else {
            self.history.push(target);
            self.position = self.history.len() - 1;
        }
        self.view = Box::new(Placeholder::loading());
        self.generation += 1;
        self.generation
    }

    pub fn back(&mut self) -> Option<(NavigationTarget, u64)> {
        if self.history.is_empty() || self.position == 0 {
            return None;
        }
        self.position -= 1;
        let target = self.history[self.position].clone();
        self.view = Box::new(Placeholder::loading());
        self.generation += 1;
        Some((target, self.generation))
    }

    pub fn forward(&mut self) -> Option<(NavigationTarget, u64)> {
        if self.history.is_empty() || self.position + 1 >= self.history.len() {
            return None;
        }
        self.position += 1;
        let target = self.history[self.position].clone();
        self.view = Box::new(Placeholder::loading());
        self.generation += 1;
        Some((target, self.generation))
    }

    pub fn current_target(&self) -> Option<&NavigationTarget> {
        self.history.get(self.position)
    }

    /// Install a finished view. Returns false (and drops the view) when
    /// a newer navigation has started since the fetch began.
    pub fn apply(&mut self, generation: u64, view: Box<dyn View>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.view = view;
        true
    }

    pub fn apply_error(&mut self, generation: u64, message: String) -> bool {
        self.apply(generation, Box::new(Placeholder::error(message)))
    }

    pub fn set_overlay(&mut self, view: Box<dyn View>) {
        self.overlay = Some(view);
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        if let Some(overlay) = &mut self.overlay {
            overlay.render(f, area, state, ctx);
        } else {
            self.view.render(f, area, state, ctx);
        }
    }

    pub async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        if let Some(overlay) = &mut self.overlay {
            overlay.handle_input(key, state, ctx).await
        } else {
            self.view.handle_input(key, state, ctx).await
        }
    }

    pub async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        self.view.on_event(event, ctx).await;
        if let Some(overlay) = &mut self.overlay {
            overlay.on_event(event, ctx).await;
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub() -> Box<dyn View> {
        Box::new(Placeholder::loading())
    }

    #[test]
    fn back_and_forward_replay_history() {
        let mut router = Router::new();
        let g = router.navigate(NavigationTarget::Home, true);
        assert!(router.apply(g, stub()));
        router.navigate(NavigationTarget::Album(5), true);
        router.navigate(NavigationTarget::Playlist(9), true);

        let (target, _) = router.back().unwrap();
        assert_eq!(target, NavigationTarget::Album(5));
        let (target, _) = router.back().unwrap();
        assert_eq!(target, NavigationTarget::Home);
        assert!(router.back().is_none());

        let (target, _) = router.forward().unwrap();
        assert_eq!(target, NavigationTarget::Album(5));
        assert_eq!(router.current_target(), Some(&NavigationTarget::Album(5)));
    }

    #[test]
    fn navigating_after_back_truncates_the_forward_tail() {
        let mut router = Router::new();
        router.navigate(NavigationTarget::Home, true);
        router.navigate(NavigationTarget::Album(1), true);
        router.back().unwrap();

        router.navigate(NavigationTarget::Album(2), true);
        assert!(router.forward().is_none());
        assert_eq!(router.current_target(), Some(&NavigationTarget::Album(2)));
        let (target, _) = router.back().unwrap();
        assert_eq!(target, NavigationTarget::Home);
    }

    #[test]
    fn stale_fetch_results_are_dropped() {
        let mut router = Router::new();
        let first = router.navigate(NavigationTarget::Album(1), true);
        let second = router.navigate(NavigationTarget::Album(2), true);

        // Responses arrive out of order; only the latest wins.
        assert!(router.apply(second, stub()));
        assert!(!router.apply(first, stub()));
        assert!(!router.apply_error(first, "timeout".into()));
        assert_eq!(router.current_target(), Some(&NavigationTarget::Album(2)));
    }

    #[test]
    fn back_issues_a_fresh_generation() {
        let mut router = Router::new();
        let g1 = router.navigate(NavigationTarget::Home, true);
        router.navigate(NavigationTarget::Album(1), true);
        let (_, g3) = router.back().unwrap();
        assert_ne!(g1, g3);
        assert!(router.apply(g3, stub()));
    }

    #[test]
    fn replace_keeps_history_depth() {
        let mut router = Router::new();
        router.navigate(NavigationTarget::Home, true);
        router.navigate(NavigationTarget::Album(1), true);
        router.navigate(NavigationTarget::Album(2), false);
        assert_eq!(router.current_target(), Some(&NavigationTarget::Album(2)));
        let (target, _) = router.back().unwrap();
        assert_eq!(target, NavigationTarget::Home);
    }
}
