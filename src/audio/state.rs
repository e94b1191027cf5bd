use crate::http::models::Track;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing(Track),
    Paused(Track),
}

impl PlaybackState {
    pub fn track(&self) -> Option<&Track> {
        match self {
            Self::Stopped => None,
            Self::Playing(track) | Self::Paused(track) => Some(track),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing(_))
    }
}
