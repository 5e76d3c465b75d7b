//! Error types for the sentry_vision tracker.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("empty frame: {0}")]
    EmptyFrame(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("command transmission error: {0}")]
    Command(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
