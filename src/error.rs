use thiserror::Error;

/// Errors surfaced by the vibe pipeline and the remote services it talks to
#[derive(Error, Debug)]
pub enum VibeError {
    /// The language model returned something that does not match the search schema
    #[error("Model response did not match the search schema: {0}")]
    SchemaValidation(String),

    /// A remote endpoint answered with a non-success status (or an error body)
    #[error("Remote service error ({status}): {body}")]
    RemoteService { status: u16, body: String },

    /// The request never produced a response
    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing configuration: {0}")]
    Configuration(String),

    /// Playlist creation requested while no Deezer access token is configured
    #[error("Playlist creation is disabled: no Deezer access token configured")]
    ReadOnly,
}

pub type Result<T> = std::result::Result<T, VibeError>;
