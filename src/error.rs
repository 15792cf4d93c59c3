/// Errors surfaced by the assistant to its callers (HTTP, MCP, library).
#[derive(Debug, thiserror::Error)]
pub enum MuseError {
    #[error("{0}")]
    Validation(String),

    #[error("campaign not found: {0}")]
    NotFound(String),

    /// Copy generation failed; the message is the user-facing one, the cause is logged.
    #[error("AI generation failed. Please try again.")]
    CopyGeneration(#[source] anyhow::Error),

    #[error("invalid reference image: {0}")]
    InvalidReferenceImage(String),

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type MuseResult<T> = std::result::Result<T, MuseError>;

impl MuseError {
    pub fn missing_content() -> Self {
        Self::Validation("Missing content or concept.".to_string())
    }
}
