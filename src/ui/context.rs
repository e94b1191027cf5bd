use std::sync::Arc;

use flume::Sender;

use crate::audio::player::Player;
use crate::event::events::Event;
use crate::http::ApiService;

pub struct AppContext {
    pub api: Arc<ApiService>,
    pub player: Player,
    pub event_tx: Sender<Event>,
}
