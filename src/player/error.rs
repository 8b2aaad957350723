use thiserror::Error;

/// Non-fatal playback failures surfaced to the UI
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Playback of song {song_id} failed: {reason}")]
    Device { song_id: i64, reason: String },
    #[error("Audio output unavailable: {0}")]
    Output(String),
}
