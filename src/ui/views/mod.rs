pub mod album_detail;
pub mod home;
pub mod placeholder;
pub mod playlist_detail;
pub mod search;

pub use album_detail::AlbumDetail;
pub use home::Home;
pub use placeholder::Placeholder;
pub use playlist_detail::PlaylistDetail;
pub use search::Search;
