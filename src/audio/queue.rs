use rand::Rng;

use crate::http::models::Track;

/// The play queue mirrors whatever track list is currently on screen.
/// Position is resolved by media URL at call time rather than stored, so
/// a rebuild (navigation) transparently re-anchors the current track.
#[derive(Debug, Default)]
pub struct TrackQueue {
    tracks: Vec<Track>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with the playable subset of a view's tracks.
    pub fn rebuild(&mut self, visible: &[Track]) {
        self.tracks = visible
            .iter()
            .filter(|track| track.playable_url().is_some())
            .cloned()
            .collect();
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn index_of(&self, track_url: &str) -> Option<usize> {
        self.tracks
            .iter()
            .position(|track| track.playable_url() == Some(track_url))
    }

    pub fn next_index(&self, current: usize) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some((current + 1) % self.tracks.len())
    }

    pub fn previous_index(&self, current: usize) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some((current + self.tracks.len() - 1) % self.tracks.len())
    }

    /// Random pick that never lands on `current` unless the queue has a
    /// single entry.
    pub fn shuffle_index(&self, current: Option<usize>) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        if self.tracks.len() == 1 {
            return Some(0);
        }
        let mut rng = rand::rng();
        loop {
            let candidate = rng.random_range(0..self.tracks.len());
            if current != Some(candidate) {
                return Some(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: i64) -> Track {
        Track {
            id,
            title: format!("Track {id}"),
            artist_name: "Artist".into(),
            file_url: Some(format!("/media/tracks/{id}.mp3")),
            ..Track::default()
        }
    }

    fn unavailable(id: i64) -> Track {
        Track {
            id,
            title: format!("Track {id}"),
            file_url: None,
            ..Track::default()
        }
    }

    #[test]
    fn rebuild_keeps_only_playable_tracks() {
        let mut queue = TrackQueue::new();
        queue.rebuild(&[track(1), unavailable(2), track(3)]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.index_of("/media/tracks/3.mp3"), Some(1));
        assert_eq!(queue.index_of("/media/tracks/2.mp3"), None);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut queue = TrackQueue::new();
        queue.rebuild(&[track(1), track(2), track(3)]);
        assert_eq!(queue.next_index(1), Some(2));
        assert_eq!(queue.next_index(2), Some(0));
        assert_eq!(queue.previous_index(1), Some(0));
        assert_eq!(queue.previous_index(0), Some(2));
    }

    #[test]
    fn empty_queue_has_no_neighbors() {
        let queue = TrackQueue::new();
        assert_eq!(queue.next_index(0), None);
        assert_eq!(queue.previous_index(0), None);
        assert_eq!(queue.shuffle_index(None), None);
    }

    #[test]
    fn shuffle_excludes_current() {
        let mut queue = TrackQueue::new();
        queue.rebuild(&[track(1), track(2), track(3), track(4)]);
        for _ in 0..200 {
            assert_ne!(queue.shuffle_index(Some(2)), Some(2));
        }
    }

    #[test]
    fn shuffle_on_single_track_returns_it() {
        let mut queue = TrackQueue::new();
        queue.rebuild(&[track(1)]);
        for _ in 0..10 {
            assert_eq!(queue.shuffle_index(Some(0)), Some(0));
        }
    }
}
