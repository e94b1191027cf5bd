use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::http::models::Track;

fn default_volume() -> f32 {
    1.0
}

/// Player state that survives restarts: the last played track's display
/// data, the shuffle/repeat toggles and the volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub last_played: Option<LastPlayed>,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            last_played: None,
            shuffle: false,
            repeat: false,
            volume: default_volume(),
        }
    }
}

/// Just enough of a track to show it in the player bar after a restart.
/// Queue membership is re-resolved against whatever view loads next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastPlayed {
    pub track_url: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl LastPlayed {
    pub fn from_track(track: &Track) -> Option<Self> {
        Some(Self {
            track_url: track.playable_url()?.to_string(),
            title: track.title.clone(),
            artist: track.display_artists(),
            cover_url: track.image_url.clone(),
        })
    }

    pub fn into_track(self) -> Track {
        Track {
            title: self.title,
            artist_name: self.artist,
            file_url: Some(self.track_url),
            image_url: self.cover_url,
            ..Track::default()
        }
    }
}

/// JSON-file persistence for the snapshot. A missing or unreadable file
/// degrades to defaults; it never blocks startup.
pub struct PlayerStore {
    path: PathBuf,
}

impl PlayerStore {
    pub fn new() -> Self {
        let path = ProjectDirs::from("", "", "sonica")
            .map(|dirs| dirs.data_dir().join("player.json"))
            .unwrap_or_else(|| PathBuf::from("player.json"));
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> PlayerSnapshot {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return PlayerSnapshot::default(),
            Err(e) => {
                warn!("could not read {}: {e}", self.path.display());
                return PlayerSnapshot::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("corrupt player state at {}: {e}", self.path.display());
                PlayerSnapshot::default()
            }
        }
    }

    pub fn save(&self, snapshot: &PlayerSnapshot) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, raw)
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> PlayerStore {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir()
            .join(format!("sonica-store-test-{}-{n}", std::process::id()))
            .join("player.json");
        PlayerStore::at(path)
    }

    #[test]
    fn round_trip() {
        let store = temp_store();
        let snapshot = PlayerSnapshot {
            last_played: Some(LastPlayed {
                track_url: "/media/tracks/1.mp3".into(),
                title: "Night Drive".into(),
                artist: "Neon Coast".into(),
                cover_url: Some("/media/covers/1.jpg".into()),
            }),
            shuffle: true,
            repeat: false,
            volume: 0.4,
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load(), snapshot);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = PlayerStore::at("/nonexistent/sonica/player.json");
        let snapshot = store.load();
        assert_eq!(snapshot, PlayerSnapshot::default());
        assert_eq!(snapshot.volume, 1.0);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let store = temp_store();
        fs::create_dir_all(store.path.parent().unwrap()).unwrap();
        fs::write(&store.path, "{not json").unwrap();
        assert_eq!(store.load(), PlayerSnapshot::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let store = temp_store();
        fs::create_dir_all(store.path.parent().unwrap()).unwrap();
        fs::write(&store.path, r#"{"shuffle": true}"#).unwrap();
        let snapshot = store.load();
        assert!(snapshot.shuffle);
        assert_eq!(snapshot.volume, 1.0);
        assert!(snapshot.last_played.is_none());
    }

    #[test]
    fn last_played_drops_unplayable_tracks() {
        let track = Track { title: "Ghost".into(), ..Track::default() };
        assert!(LastPlayed::from_track(&track).is_none());
    }
}
