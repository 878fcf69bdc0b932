/// Result alias that carries the custom [`SonarError`] type.
pub type Result<T> = std::result::Result<T, SonarError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SonarError {
    /// A configuration value was rejected before any frame was processed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Caller supplied data that cannot be turned into a scanline.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A buffer was submitted to a sink that has not been initialised.
    #[error("playback sink has not been initialised")]
    SinkNotInitialized,
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("wav output failed: {0}")]
    Wav(#[from] hound::Error),
    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fft: {0}")]
    Fft(#[from] realfft::FftError),
}

impl SonarError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
