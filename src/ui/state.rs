use crate::http::models::FriendStatus;

/// UI state shared across views.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub friends: Vec<FriendStatus>,
    /// Transient message shown in the player bar, e.g. a fetch error.
    pub status: Option<String>,
}
