use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::debug;

use crate::audio::error::AudioError;
use crate::http::ApiService;

/// Seam between the playback controller and the actual audio device.
/// `?Send` because rodio's stream handles are not `Send`; the controller
/// lives on the main task.
#[async_trait(?Send)]
pub trait AudioOutput {
    /// Fetch and decode a track, replacing whatever was loaded before.
    /// Playback does not start until `play` is called.
    async fn load(&mut self, url: &str) -> Result<(), AudioError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn try_seek(&mut self, position: Duration) -> Result<(), AudioError>;
    /// Total duration of the loaded media, when the decoder knows it.
    fn duration(&self) -> Option<Duration>;
    fn position(&self) -> Duration;
    /// True once the loaded media has played to the end.
    fn is_finished(&self) -> bool;
}

/// Real device output. Media is fetched through the gateway and decoded
/// from memory, which keeps seeking cheap for the short tracks the
/// server hosts.
pub struct RodioOutput {
    _stream: OutputStream,
    sink: Sink,
    api: Arc<ApiService>,
    duration: Option<Duration>,
    loaded: bool,
}

impl RodioOutput {
    pub fn new(api: Arc<ApiService>) -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Output(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| AudioError::Output(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            sink,
            api,
            duration: None,
            loaded: false,
        })
    }
}

#[async_trait(?Send)]
impl AudioOutput for RodioOutput {
    async fn load(&mut self, url: &str) -> Result<(), AudioError> {
        let bytes = self
            .api
            .fetch_track_bytes(url)
            .await
            .map_err(|e| AudioError::Network(e.to_string()))?;
        debug!("loaded {} bytes from {url}", bytes.len());
        let decoder = Decoder::new(Cursor::new(bytes))
            .map_err(|e| AudioError::Decode(e.to_string()))?;
        self.sink.stop();
        self.duration = decoder.total_duration();
        self.sink.append(decoder);
        self.sink.pause();
        self.loaded = true;
        Ok(())
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.duration = None;
        self.loaded = false;
        self.sink.stop();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn try_seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.sink
            .try_seek(position)
            .map_err(|e| AudioError::Output(e.to_string()))
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_finished(&self) -> bool {
        self.loaded && self.sink.empty()
    }
}

/// Fallback when no audio device can be opened (headless session, CI).
/// The UI stays fully functional, playback is just silent and tracks
/// never finish on their own.
#[derive(Debug, Default)]
pub struct NullOutput {
    playing: bool,
}

impl NullOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl AudioOutput for NullOutput {
    async fn load(&mut self, _url: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn try_seek(&mut self, _position: Duration) -> Result<(), AudioError> {
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn is_finished(&self) -> bool {
        false
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Default)]
    pub struct FakeState {
        pub loads: Vec<String>,
        pub play_calls: usize,
        pub pause_calls: usize,
        pub stop_calls: usize,
        pub playing: bool,
        pub finished: bool,
        pub volume: f32,
        pub seeks: Vec<Duration>,
        pub duration: Option<Duration>,
    }

    /// Scripted output for controller and player tests. State is shared
    /// so tests can inspect calls and flip `finished`.
    #[derive(Debug, Default)]
    pub struct FakeOutput {
        state: Rc<RefCell<FakeState>>,
    }

    impl FakeOutput {
        pub fn new() -> (Self, Rc<RefCell<FakeState>>) {
            let state = Rc::new(RefCell::new(FakeState::default()));
            (Self { state: state.clone() }, state)
        }
    }

    #[async_trait(?Send)]
    impl AudioOutput for FakeOutput {
        async fn load(&mut self, url: &str) -> Result<(), AudioError> {
            let mut state = self.state.borrow_mut();
            state.loads.push(url.to_string());
            state.finished = false;
            Ok(())
        }

        fn play(&mut self) {
            let mut state = self.state.borrow_mut();
            state.play_calls += 1;
            state.playing = true;
        }

        fn pause(&mut self) {
            let mut state = self.state.borrow_mut();
            state.pause_calls += 1;
            state.playing = false;
        }

        fn stop(&mut self) {
            let mut state = self.state.borrow_mut();
            state.stop_calls += 1;
            state.playing = false;
            state.finished = false;
        }

        fn set_volume(&mut self, volume: f32) {
            self.state.borrow_mut().volume = volume;
        }

        fn try_seek(&mut self, position: Duration) -> Result<(), AudioError> {
            self.state.borrow_mut().seeks.push(position);
            Ok(())
        }

        fn duration(&self) -> Option<Duration> {
            self.state.borrow().duration
        }

        fn position(&self) -> Duration {
            Duration::ZERO
        }

        fn is_finished(&self) -> bool {
            self.state.borrow().finished
        }
    }
}
