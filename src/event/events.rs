use crate::http::models::{Album, AlbumHit, FriendStatus, Playlist, Track};

/// Application events carried over the flume channel from background
/// tasks into the main loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// The playback state changed (track, play/pause, stop).
    PlaybackChanged,
    /// A view fetch finished. Only applied when `generation` still matches
    /// the router's latest navigation.
    ViewLoaded {
        generation: u64,
        content: ViewContent,
    },
    /// A view fetch failed.
    ViewFailed { generation: u64, message: String },
    /// The search debounce window elapsed for this query.
    SearchRequested(String),
    /// Search results, tagged with the query they answer.
    SearchResults {
        query: String,
        tracks: Vec<Track>,
        albums: Vec<AlbumHit>,
    },
    /// Fresh friend listening activity.
    FriendActivity(Vec<FriendStatus>),
    /// A background fetch failed outside of a navigation.
    FetchError(String),
}

/// Payload of a finished view fetch.
#[derive(Debug, Clone)]
pub enum ViewContent {
    Home(Vec<Track>),
    Album(i64, Album),
    Playlist(i64, Playlist),
}
