pub mod models;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use models::{
    Album, AlbumHit, ArtistDetail, ArtistDetailResponse, ArtistSummary, AuthResponse,
    EmailCheckResponse, FriendStatus, FriendsResponse, MutationResponse, Playlist,
    SearchResponse, SearchTracksResponse, Track, TracksResponse,
};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

/// Queries shorter than this return no results; the server enforces the
/// same bound, this just saves the round trip.
pub const MIN_QUERY_LEN: usize = 2;

const MAX_ICON_URL_LEN: usize = 999;
const MAX_USERNAME_LEN: usize = 150;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Validation(String),
}

/// Thin typed client for the streaming server's JSON API. Holds a cookie
/// store so the session survives across calls after `login`.
pub struct ApiService {
    client: reqwest::Client,
    base_url: String,
}

impl ApiService {
    /// Reads the server address from `SONICA_SERVER`, falling back to the
    /// local development default.
    pub fn new() -> Result<Self, ApiError> {
        let base_url =
            std::env::var("SONICA_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!("api service targeting {base_url}");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(self.endpoint(path)).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// POST that treats the body's `success`/`error` fields as the source
    /// of truth. The server pairs failure bodies with 4xx statuses, so the
    /// body is parsed before the status is consulted.
    async fn mutate(&self, path: &str, body: &impl Serialize) -> Result<(), ApiError> {
        let response = self.client.post(self.endpoint(path)).json(body).send().await?;
        let status = response.status();
        match response.json::<MutationResponse>().await {
            Ok(body) if body.success => Ok(()),
            Ok(body) => Err(ApiError::Server(
                body.error.unwrap_or_else(|| format!("request rejected ({status})")),
            )),
            Err(_) if !status.is_success() => Err(ApiError::Status(status)),
            Err(e) => Err(ApiError::Http(e)),
        }
    }

    pub async fn fetch_home_tracks(&self) -> Result<Vec<Track>, ApiError> {
        let response: TracksResponse = self.get_json("/api/tracks/").await?;
        if !response.success {
            return Err(ApiError::Server("track feed unavailable".into()));
        }
        Ok(response.tracks)
    }

    pub async fn fetch_album(&self, id: i64) -> Result<Album, ApiError> {
        self.get_json(&format!("/api/album/{id}/")).await
    }

    pub async fn fetch_playlist(&self, id: i64) -> Result<Playlist, ApiError> {
        self.get_json(&format!("/api/playlist/{id}/")).await
    }

    pub async fn fetch_artists(&self) -> Result<Vec<ArtistSummary>, ApiError> {
        self.get_json("/api/artists/").await
    }

    pub async fn fetch_artist(&self, id: i64) -> Result<ArtistDetail, ApiError> {
        let response: ArtistDetailResponse =
            self.get_json(&format!("/api/artist/{id}/")).await?;
        if !response.success {
            return Err(ApiError::Server("artist not found".into()));
        }
        Ok(ArtistDetail {
            artist: response.artist,
            tracks: response.tracks,
        })
    }

    /// Track-only search, used when adding tracks to a playlist.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<Track>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        let response = self
            .client
            .get(self.endpoint("/api/search_tracks/"))
            .query(&[("query", query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        let body: SearchTracksResponse = response.json().await?;
        Ok(body.tracks)
    }

    /// Combined album + track search backing the search overlay.
    pub async fn search(&self, query: &str) -> Result<(Vec<AlbumHit>, Vec<Track>), ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok((Vec::new(), Vec::new()));
        }
        let response = self
            .client
            .get(self.endpoint("/api/search/"))
            .query(&[("q", query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        let body: SearchResponse = response.json().await?;
        if !body.success {
            return Err(ApiError::Server("search unavailable".into()));
        }
        Ok((body.albums, body.tracks))
    }

    pub async fn create_playlist(
        &self,
        name: &str,
        cover_image_url: Option<&str>,
    ) -> Result<(), ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("playlist name is required".into()));
        }
        self.mutate(
            "/api/create_playlist/",
            &json!({ "name": name, "cover_image_url": cover_image_url }),
        )
        .await
    }

    pub async fn update_playlist(
        &self,
        playlist_id: i64,
        name: &str,
        cover_image_url: Option<&str>,
    ) -> Result<(), ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("playlist name is required".into()));
        }
        self.mutate(
            "/api/update_playlist/",
            &json!({
                "playlist_id": playlist_id,
                "name": name,
                "cover_image_url": cover_image_url,
            }),
        )
        .await
    }

    pub async fn delete_playlist(&self, playlist_id: i64) -> Result<(), ApiError> {
        self.mutate("/api/delete_playlist/", &json!({ "playlist_id": playlist_id }))
            .await
    }

    pub async fn add_track_to_playlist(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<(), ApiError> {
        self.mutate(
            "/api/add_track_to_playlist/",
            &json!({ "playlist_id": playlist_id, "track_id": track_id }),
        )
        .await
    }

    pub async fn remove_track_from_playlist(
        &self,
        playlist_id: i64,
        track_id: i64,
    ) -> Result<(), ApiError> {
        self.mutate(
            "/api/remove_track_from_playlist/",
            &json!({ "playlist_id": playlist_id, "track_id": track_id }),
        )
        .await
    }

    pub async fn update_icon(&self, icon_url: &str) -> Result<(), ApiError> {
        let icon_url = icon_url.trim();
        if icon_url.is_empty() {
            return Err(ApiError::Validation("icon url is required".into()));
        }
        if icon_url.len() > MAX_ICON_URL_LEN {
            return Err(ApiError::Validation("icon url is too long".into()));
        }
        self.mutate("/api/update_icon/", &json!({ "icon_url": icon_url })).await
    }

    pub async fn update_username(&self, username: &str) -> Result<(), ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::Validation("username is required".into()));
        }
        if username.len() > MAX_USERNAME_LEN {
            return Err(ApiError::Validation("username is too long".into()));
        }
        self.mutate("/api/update_username/", &json!({ "username": username })).await
    }

    /// Reports whether playback is running and of what, shown to friends.
    pub async fn update_listening_status(
        &self,
        track_title: &str,
        listening: bool,
    ) -> Result<(), ApiError> {
        self.mutate(
            "/api/update_listening_status/",
            &json!({ "track_title": track_title, "listeningto_status": listening }),
        )
        .await
    }

    pub async fn fetch_active_friends(&self) -> Result<Vec<FriendStatus>, ApiError> {
        let response: FriendsResponse = self.get_json("/api/friends/active/").await?;
        if !response.success {
            return Err(ApiError::Server("friend activity unavailable".into()));
        }
        Ok(response.friends)
    }

    pub async fn check_email(&self, email: &str) -> Result<bool, ApiError> {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("invalid email address".into()));
        }
        let response = self
            .client
            .post(self.endpoint("/api/check_email/"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        let body: EmailCheckResponse = response.json().await?;
        Ok(body.exists)
    }

    /// Returns whether the account is a superuser on success. The session
    /// cookie is kept by the client for subsequent calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("invalid email address".into()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("password is required".into()));
        }
        self.auth("/api/login/", &json!({ "email": email, "password": password })).await
    }

    pub async fn signup(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("invalid email address".into()));
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::Validation("username is required".into()));
        }
        if password.chars().count() < 8 {
            return Err(ApiError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }
        self.auth(
            "/api/signup/",
            &json!({ "email": email, "username": username, "password": password }),
        )
        .await?;
        Ok(())
    }

    async fn auth(&self, path: &str, body: &impl Serialize) -> Result<bool, ApiError> {
        let response = self.client.post(self.endpoint(path)).json(body).send().await?;
        let status = response.status();
        match response.json::<AuthResponse>().await {
            Ok(body) if body.success => Ok(body.is_superuser),
            Ok(body) => Err(ApiError::Server(
                body.error.unwrap_or_else(|| format!("authentication failed ({status})")),
            )),
            Err(_) if !status.is_success() => Err(ApiError::Status(status)),
            Err(e) => Err(ApiError::Http(e)),
        }
    }

    /// Downloads raw media bytes. Track URLs from the API are
    /// server-relative (`/media/...`) and resolved against the base URL.
    pub async fn fetch_track_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let absolute = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.endpoint(url)
        };
        let response = self.client.get(absolute).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service() -> ApiService {
        // Port 9 (discard) is never routable from tests; anything that
        // reaches the network would fail differently than Validation.
        match ApiService::with_base_url("http://127.0.0.1:9") {
            Ok(service) => service,
            Err(e) => panic!("client build failed: {e}"),
        }
    }

    #[tokio::test]
    async fn short_queries_resolve_empty_without_network() {
        let service = offline_service();
        let tracks = service.search_tracks("a").await.unwrap();
        assert!(tracks.is_empty());
        let (albums, tracks) = service.search(" x ").await.unwrap();
        assert!(albums.is_empty() && tracks.is_empty());
    }

    #[tokio::test]
    async fn playlist_name_validation_aborts_before_send() {
        let service = offline_service();
        let err = service.create_playlist("   ", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = service.update_playlist(1, "", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn profile_validation_aborts_before_send() {
        let service = offline_service();
        assert!(matches!(
            service.update_icon("").await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            service.update_icon(&"x".repeat(1000)).await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            service.update_username("   ").await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn auth_validation_aborts_before_send() {
        let service = offline_service();
        assert!(matches!(
            service.login("not-an-email", "secret").await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            service.signup("a@b.co", "ana", "short").await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@music.example.co"));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email("ana@example.com@x.org"));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let service = ApiService::with_base_url("http://music.local:8000/").unwrap();
        assert_eq!(service.base_url(), "http://music.local:8000");
        assert_eq!(service.endpoint("/api/tracks/"), "http://music.local:8000/api/tracks/");
    }
}
