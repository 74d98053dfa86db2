use thiserror::Error;

/// Anything that stops the globe from initializing. None of these are
/// recovered from; the app shows the message instead of the globe.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid WKT: {0}")]
    InvalidWkt(String),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fetching {url} failed: {message}")]
    Fetch { url: String, message: String },
    #[error("topology has no object named `{0}`")]
    MissingObject(String),
    #[error("topology references arc {0}, which does not exist")]
    ArcOutOfRange(i64),
}
