use std::time::Duration;

use flume::Sender;
use tracing::debug;

use crate::audio::error::AudioError;
use crate::audio::output::AudioOutput;
use crate::audio::state::PlaybackState;
use crate::event::events::Event;
use crate::http::models::Track;

/// Sole owner of the audio output. Every state change funnels through
/// `notify`, so the UI always observes transitions as `PlaybackChanged`
/// events regardless of what triggered them.
pub struct PlayerController {
    output: Box<dyn AudioOutput>,
    state: PlaybackState,
    /// URL of the media currently loaded in the output. `None` for a
    /// track restored from disk, which must be fetched before it can
    /// resume.
    loaded_url: Option<String>,
    volume: f32,
    muted: bool,
    pre_mute_volume: f32,
    event_tx: Sender<Event>,
}

impl PlayerController {
    pub fn new(output: Box<dyn AudioOutput>, event_tx: Sender<Event>) -> Self {
        Self {
            output,
            state: PlaybackState::Stopped,
            loaded_url: None,
            volume: 1.0,
            muted: false,
            pre_mute_volume: 1.0,
            event_tx,
        }
    }

    /// Start a track, or toggle pause/resume when it is already the
    /// loaded one. A track is never restarted from the beginning by
    /// playing it again.
    pub async fn play(&mut self, track: Track) -> Result<(), AudioError> {
        let url = track.playable_url().ok_or(AudioError::Unavailable)?.to_string();
        if self.loaded_url.as_deref() == Some(url.as_str()) {
            match self.state {
                PlaybackState::Playing(_) => self.pause(),
                _ => self.resume(),
            }
            return Ok(());
        }
        self.output.stop();
        self.output.load(&url).await?;
        self.output.set_volume(self.effective_volume());
        self.output.play();
        self.loaded_url = Some(url);
        self.state = PlaybackState::Playing(track);
        self.notify();
        Ok(())
    }

    /// Play the current track again from the start. Used by repeat and by
    /// single-track shuffle, where "advance" lands on the same track.
    pub async fn restart(&mut self) -> Result<(), AudioError> {
        let Some(track) = self.state.track().cloned() else {
            return Ok(());
        };
        if self.loaded_url.is_none() || self.output.is_finished() {
            // Nothing left in the output to rewind; fetch it again.
            self.loaded_url = None;
            return self.play(track).await;
        }
        if let Err(e) = self.output.try_seek(Duration::ZERO) {
            debug!("rewind failed: {e}");
        }
        self.output.play();
        self.state = PlaybackState::Playing(track);
        self.notify();
        Ok(())
    }

    pub fn pause(&mut self) {
        if let PlaybackState::Playing(track) = &self.state {
            let track = track.clone();
            self.output.pause();
            self.state = PlaybackState::Paused(track);
            self.notify();
        }
    }

    /// Resume a paused track. No-op for a restored track that was never
    /// loaded; `play` handles that path.
    pub fn resume(&mut self) {
        if self.loaded_url.is_none() {
            return;
        }
        if let PlaybackState::Paused(track) = &self.state {
            let track = track.clone();
            self.output.play();
            self.state = PlaybackState::Playing(track);
            self.notify();
        }
    }

    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.output.stop();
        self.loaded_url = None;
        self.state = PlaybackState::Stopped;
        self.notify();
    }

    /// Seek to a fraction of the track. Silently ignored while the media
    /// duration is unknown.
    pub fn seek(&mut self, fraction: f32) {
        let Some(duration) = self.output.duration() else {
            return;
        };
        let target = duration.mul_f32(fraction.clamp(0.0, 1.0));
        if let Err(e) = self.output.try_seek(target) {
            debug!("seek ignored: {e}");
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = false;
        self.output.set_volume(self.effective_volume());
    }

    /// Mute toggle. Unmuting restores the volume in effect when muting.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            self.volume = self.pre_mute_volume;
        } else {
            self.pre_mute_volume = self.volume;
            self.muted = true;
        }
        self.output.set_volume(self.effective_volume());
    }

    /// Install a restored track in paused, not-yet-loaded state. Playback
    /// only starts on an explicit play.
    pub fn install_resting(&mut self, track: Track) {
        self.loaded_url = None;
        self.state = PlaybackState::Paused(track);
        self.notify();
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.track()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn progress(&self) -> (Duration, Option<Duration>) {
        (self.output.position(), self.output.duration())
    }

    /// True when a playing track has run out, checked from the tick loop.
    pub fn poll_finished(&self) -> bool {
        self.state.is_playing() && self.output.is_finished()
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn notify(&self) {
        let _ = self.event_tx.send(Event::PlaybackChanged);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use flume::Receiver;

    use super::*;
    use crate::audio::output::testing::{FakeOutput, FakeState};

    fn controller() -> (PlayerController, Rc<RefCell<FakeState>>, Receiver<Event>) {
        let (output, state) = FakeOutput::new();
        let (tx, rx) = flume::unbounded();
        (PlayerController::new(Box::new(output), tx), state, rx)
    }

    fn track(id: i64) -> Track {
        Track {
            id,
            title: format!("Track {id}"),
            artist_name: "Artist".into(),
            file_url: Some(format!("/media/tracks/{id}.mp3")),
            ..Track::default()
        }
    }

    #[tokio::test]
    async fn playing_same_track_toggles_instead_of_restarting() {
        let (mut controller, fake, _rx) = controller();
        controller.play(track(1)).await.unwrap();
        assert!(controller.is_playing());
        assert_eq!(fake.borrow().loads.len(), 1);

        controller.play(track(1)).await.unwrap();
        assert!(!controller.is_playing());
        assert!(matches!(controller.state(), PlaybackState::Paused(_)));
        assert_eq!(fake.borrow().loads.len(), 1);
        assert_eq!(fake.borrow().pause_calls, 1);

        controller.play(track(1)).await.unwrap();
        assert!(controller.is_playing());
        assert_eq!(fake.borrow().loads.len(), 1);
    }

    #[tokio::test]
    async fn playing_a_different_track_loads_it() {
        let (mut controller, fake, _rx) = controller();
        controller.play(track(1)).await.unwrap();
        controller.play(track(2)).await.unwrap();
        assert_eq!(
            fake.borrow().loads,
            vec!["/media/tracks/1.mp3".to_string(), "/media/tracks/2.mp3".to_string()]
        );
        assert!(controller.is_playing());
    }

    #[tokio::test]
    async fn unavailable_track_is_rejected_without_state_change() {
        let (mut controller, fake, _rx) = controller();
        controller.play(track(1)).await.unwrap();

        let bare = Track { title: "Ghost".into(), ..Track::default() };
        let err = controller.play(bare).await.unwrap_err();
        assert!(matches!(err, AudioError::Unavailable));
        assert!(controller.is_playing());
        assert_eq!(controller.current_track().map(|t| t.id), Some(1));
        assert_eq!(fake.borrow().loads.len(), 1);
    }

    #[tokio::test]
    async fn pause_is_idempotent_and_resume_needs_loaded_media() {
        let (mut controller, _fake, _rx) = controller();
        controller.pause();
        assert_eq!(*controller.state(), PlaybackState::Stopped);

        controller.install_resting(track(1));
        controller.resume();
        assert!(!controller.is_playing());
    }

    #[tokio::test]
    async fn restored_track_is_fetched_fresh_on_play() {
        let (mut controller, fake, _rx) = controller();
        controller.install_resting(track(1));
        assert!(fake.borrow().loads.is_empty());

        controller.play(track(1)).await.unwrap();
        assert!(controller.is_playing());
        assert_eq!(fake.borrow().loads.len(), 1);
    }

    #[tokio::test]
    async fn seek_without_duration_is_ignored() {
        let (mut controller, fake, _rx) = controller();
        controller.play(track(1)).await.unwrap();
        controller.seek(0.5);
        assert!(fake.borrow().seeks.is_empty());

        fake.borrow_mut().duration = Some(Duration::from_secs(100));
        controller.seek(0.5);
        assert_eq!(fake.borrow().seeks, vec![Duration::from_secs(50)]);
    }

    #[tokio::test]
    async fn mute_restores_previous_volume() {
        let (mut controller, fake, _rx) = controller();
        controller.set_volume(0.7);
        assert_eq!(fake.borrow().volume, 0.7);

        controller.toggle_mute();
        assert!(controller.is_muted());
        assert_eq!(fake.borrow().volume, 0.0);

        controller.toggle_mute();
        assert!(!controller.is_muted());
        assert_eq!(controller.volume(), 0.7);
        assert_eq!(fake.borrow().volume, 0.7);
    }

    #[tokio::test]
    async fn setting_volume_unmutes() {
        let (mut controller, fake, _rx) = controller();
        controller.toggle_mute();
        controller.set_volume(0.4);
        assert!(!controller.is_muted());
        assert_eq!(fake.borrow().volume, 0.4);
    }

    #[tokio::test]
    async fn every_transition_emits_one_notification() {
        let (mut controller, _fake, rx) = controller();
        controller.play(track(1)).await.unwrap();
        controller.pause();
        controller.resume();
        controller.stop();
        assert_eq!(rx.drain().count(), 4);
    }

    #[tokio::test]
    async fn restart_after_finish_reloads_media() {
        let (mut controller, fake, _rx) = controller();
        controller.play(track(1)).await.unwrap();
        fake.borrow_mut().finished = true;
        controller.restart().await.unwrap();
        assert_eq!(fake.borrow().loads.len(), 2);
        assert!(controller.is_playing());
        assert_eq!(controller.current_track().map(|t| t.id), Some(1));
    }
}
