use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ImageNormalizeError {
    #[error("Could not read the screenshot: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Could not compress the screenshot: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Invalid image data URI: {0}")]
    InvalidDataUri(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// The request never completed (connection refused, timeout, ...)
    #[error("Could not reach the coaching backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Backend response is missing `{0}`")]
    MissingField(&'static str),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Describe the move you want evaluated first")]
    EmptyMove,

    /// No HTTP client could be set up, so nothing was sent
    #[error("Coaching backend client unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Image(#[from] ImageNormalizeError),
}
