use std::time::Duration;

use flume::Sender;
use tracing::warn;

use crate::audio::controller::PlayerController;
use crate::audio::error::AudioError;
use crate::audio::output::AudioOutput;
use crate::audio::queue::TrackQueue;
use crate::audio::state::PlaybackState;
use crate::event::events::Event;
use crate::http::models::Track;
use crate::storage::{LastPlayed, PlayerSnapshot, PlayerStore};

const VOLUME_STEP: f32 = 0.05;

/// Facade over queue + controller + persisted toggles. This is the only
/// type the UI talks to for playback.
pub struct Player {
    controller: PlayerController,
    queue: TrackQueue,
    shuffle: bool,
    repeat: bool,
    store: PlayerStore,
}

impl Player {
    pub fn new(output: Box<dyn AudioOutput>, store: PlayerStore, event_tx: Sender<Event>) -> Self {
        Self {
            controller: PlayerController::new(output, event_tx),
            queue: TrackQueue::new(),
            shuffle: false,
            repeat: false,
            store,
        }
    }

    /// Restore toggles, volume and the last played track from disk.
    /// The track comes back paused; playback never resumes on its own.
    pub fn restore(&mut self) {
        let snapshot = self.store.load();
        self.shuffle = snapshot.shuffle;
        self.repeat = snapshot.repeat;
        self.controller.set_volume(snapshot.volume);
        if let Some(last) = snapshot.last_played {
            self.controller.install_resting(last.into_track());
        }
    }

    pub fn rebuild_queue(&mut self, visible: &[Track]) {
        self.queue.rebuild(visible);
    }

    /// User picked a track in a view. Same-track picks toggle, per the
    /// controller's contract.
    pub async fn play_track(&mut self, track: Track) -> Result<(), AudioError> {
        self.controller.play(track).await?;
        self.persist();
        Ok(())
    }

    pub async fn play_pause(&mut self) {
        match self.controller.state().clone() {
            PlaybackState::Playing(_) => self.controller.pause(),
            PlaybackState::Paused(track) => {
                // Resumes, or fetches a restored track that was never
                // loaded this session.
                if let Err(e) = self.controller.play(track).await {
                    warn!("resume failed: {e}");
                }
            }
            PlaybackState::Stopped => {}
        }
    }

    /// Skip forward. Repeat wins over shuffle, shuffle over sequential.
    pub async fn next(&mut self) {
        if self.repeat {
            if let Err(e) = self.controller.restart().await {
                warn!("repeat failed: {e}");
            }
            return;
        }
        let Some(index) = self.current_index() else {
            return;
        };
        let target = if self.shuffle {
            self.queue.shuffle_index(Some(index))
        } else {
            self.queue.next_index(index)
        };
        self.start_at(target).await;
    }

    /// Skip backward. Always sequential with wrap-around, even while
    /// shuffle is on.
    pub async fn previous(&mut self) {
        let Some(index) = self.current_index() else {
            return;
        };
        let target = self.queue.previous_index(index);
        self.start_at(target).await;
    }

    /// Natural end of a track. Same precedence as `next`, except that
    /// having nowhere to go stops playback instead of leaving the stale
    /// track in place.
    pub async fn on_track_ended(&mut self) {
        if self.repeat {
            if let Err(e) = self.controller.restart().await {
                warn!("repeat failed: {e}");
                self.controller.stop();
            }
            return;
        }
        let Some(index) = self.current_index() else {
            self.controller.stop();
            return;
        };
        let target = if self.shuffle {
            self.queue.shuffle_index(Some(index))
        } else {
            self.queue.next_index(index)
        };
        match target {
            Some(_) => self.start_at(target).await,
            None => self.controller.stop(),
        }
    }

    async fn start_at(&mut self, target: Option<usize>) {
        let Some(track) = target.and_then(|index| self.queue.get(index).cloned()) else {
            return;
        };
        // Landing on the already-current track (single-entry queue)
        // restarts it rather than triggering the toggle contract.
        let same = self.controller.current_track().and_then(Track::playable_url)
            == track.playable_url();
        let result = if same {
            self.controller.restart().await
        } else {
            self.controller.play(track).await
        };
        match result {
            Ok(()) => self.persist(),
            Err(e) => warn!("could not advance playback: {e}"),
        }
    }

    /// Queue position of the current track, resolved by URL. `None` when
    /// the current track is not part of the visible queue.
    pub fn current_index(&self) -> Option<usize> {
        let url = self.controller.current_track().and_then(Track::playable_url)?;
        self.queue.index_of(url)
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.persist();
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
        self.persist();
    }

    pub fn toggle_mute(&mut self) {
        self.controller.toggle_mute();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.controller.set_volume(volume);
        self.persist();
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.controller.volume() + VOLUME_STEP);
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.controller.volume() - VOLUME_STEP);
    }

    pub fn seek(&mut self, fraction: f32) {
        self.controller.seek(fraction);
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn is_muted(&self) -> bool {
        self.controller.is_muted()
    }

    pub fn volume(&self) -> f32 {
        self.controller.volume()
    }

    pub fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.controller.current_track()
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn progress(&self) -> (Duration, Option<Duration>) {
        self.controller.progress()
    }

    pub fn queue(&self) -> &TrackQueue {
        &self.queue
    }

    pub fn poll_finished(&self) -> bool {
        self.controller.poll_finished()
    }

    fn persist(&self) {
        let snapshot = PlayerSnapshot {
            last_played: self.controller.current_track().and_then(LastPlayed::from_track),
            shuffle: self.shuffle,
            repeat: self.repeat,
            volume: self.controller.volume(),
        };
        if let Err(e) = self.store.save(&snapshot) {
            warn!("could not persist player state: {e}");
        }
    }
}
