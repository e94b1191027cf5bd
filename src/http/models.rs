use serde::{Deserialize, Serialize};

/// A single track as the server returns it. The different endpoints use
/// slightly different field names for the same data, hence the aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, alias = "track_id")]
    pub id: i64,
    pub title: String,
    #[serde(default, alias = "artist")]
    pub artist_name: String,
    #[serde(default)]
    pub artist_name2: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default, alias = "image_url_or_default")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub album_id: Option<i64>,
    #[serde(default)]
    pub album_title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Track {
    /// Media URL if the track is actually playable. An absent or empty
    /// `file_url` means the upload is missing on the server.
    pub fn playable_url(&self) -> Option<&str> {
        match self.file_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Some(url),
            _ => None,
        }
    }

    /// "Artist" or "Artist, Second Artist".
    pub fn display_artists(&self) -> String {
        match self.artist_name2.as_deref() {
            Some(second) if !second.trim().is_empty() => {
                format!("{}, {}", self.artist_name, second)
            }
            _ => self.artist_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Album {
    pub title: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    pub playlist_id: i64,
    pub name: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub owner_username: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Album entry in combined search results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlbumHit {
    #[serde(alias = "album_id")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtistSummary {
    #[serde(alias = "artist_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub artist_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArtistInfo {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub artist_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArtistDetail {
    #[serde(default)]
    pub artist: ArtistInfo,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FriendStatus {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Title of the track the friend is listening to right now, if any.
    #[serde(default)]
    pub listeningto: Option<String>,
}

// Response envelopes. The server wraps most payloads in a `success` flag.

#[derive(Debug, Deserialize)]
pub(crate) struct TracksResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchTracksResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub albums: Vec<AlbumHit>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistDetailResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub artist: ArtistInfo,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FriendsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub friends: Vec<FriendStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailCheckResponse {
    #[serde(default)]
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_from_feed_json() {
        let json = r#"{
            "id": 12,
            "title": "Night Drive",
            "artist_name": "Neon Coast",
            "artist_name2": "Mira",
            "file_url": "/media/tracks/night-drive.mp3",
            "image_url": "/media/covers/night-drive.jpg",
            "genre": "synthwave"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id, 12);
        assert_eq!(track.playable_url(), Some("/media/tracks/night-drive.mp3"));
        assert_eq!(track.display_artists(), "Neon Coast, Mira");
    }

    #[test]
    fn track_from_search_json_uses_aliases() {
        let json = r#"{
            "track_id": 3,
            "title": "Glass",
            "artist": "Hollow Tide",
            "file_url": "/media/tracks/glass.mp3",
            "image_url_or_default": "/media/covers/glass.jpg"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id, 3);
        assert_eq!(track.artist_name, "Hollow Tide");
        assert_eq!(track.image_url.as_deref(), Some("/media/covers/glass.jpg"));
    }

    #[test]
    fn missing_or_empty_file_url_is_unplayable() {
        let absent: Track = serde_json::from_str(r#"{"title": "A"}"#).unwrap();
        assert_eq!(absent.playable_url(), None);

        let empty: Track =
            serde_json::from_str(r#"{"title": "B", "file_url": "  "}"#).unwrap();
        assert_eq!(empty.playable_url(), None);
    }

    #[test]
    fn playlist_tracks_carry_album_links() {
        let json = r#"{
            "playlist_id": 7,
            "name": "late nights",
            "cover_image_url": null,
            "owner_username": "ana",
            "tracks": [{
                "id": 1,
                "title": "Glass",
                "artist_name": "Hollow Tide",
                "file_url": "/media/tracks/glass.mp3",
                "album_id": 4,
                "album_title": "Undertow"
            }]
        }"#;
        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.playlist_id, 7);
        assert_eq!(playlist.owner_username, "ana");
        assert_eq!(playlist.tracks[0].album_id, Some(4));
        assert_eq!(playlist.tracks[0].album_title.as_deref(), Some("Undertow"));
    }

    #[test]
    fn search_response_albums() {
        let json = r#"{
            "success": true,
            "albums": [{"album_id": 9, "title": "Undertow"}],
            "tracks": []
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.albums[0].id, 9);
    }

    #[test]
    fn friend_status_with_idle_friend() {
        let json = r#"{
            "success": true,
            "friends": [
                {"id": 2, "username": "ben", "icon_url": null, "listeningto": "Glass"},
                {"id": 5, "username": "ana", "listeningto": null}
            ]
        }"#;
        let response: FriendsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.friends.len(), 2);
        assert_eq!(response.friends[0].listeningto.as_deref(), Some("Glass"));
        assert_eq!(response.friends[1].listeningto, None);
    }
}
