/// Convenience result type used across disco-doodle.
pub type DiscoResult<T> = Result<T, DiscoError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum DiscoError {
    /// Invalid user-provided data (strokes, configuration, render options).
    #[error("validation error: {0}")]
    Validation(String),

    /// The generative text service could not produce a persona.
    #[error("persona error: {0}")]
    Persona(String),

    /// Errors while synthesizing or writing audio.
    #[error("audio error: {0}")]
    Audio(String),

    /// Errors while rasterizing a dance floor frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing frames to an output sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DiscoError {
    /// Build a [`DiscoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DiscoError::Persona`] value.
    pub fn persona(msg: impl Into<String>) -> Self {
        Self::Persona(msg.into())
    }

    /// Build a [`DiscoError::Audio`] value.
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Build a [`DiscoError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DiscoError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`DiscoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
