#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// The track has no media file on the server.
    #[error("track is unavailable")]
    Unavailable,
    #[error("audio output error: {0}")]
    Output(String),
    #[error("could not decode track: {0}")]
    Decode(String),
    #[error("could not fetch track: {0}")]
    Network(String),
}
