/// Convenience result type used across the compositor.
pub type PostcardResult<T> = Result<T, PostcardError>;

/// Top-level error taxonomy used by compositor APIs.
#[derive(thiserror::Error, Debug)]
pub enum PostcardError {
    /// A required image source could not be fetched or decoded.
    #[error("image load error: '{source_key}': {reason}")]
    ImageLoad {
        /// Display form of the source identifier that failed.
        source_key: String,
        /// Underlying failure description.
        reason: String,
    },

    /// No drawing surface could be created for the requested dimensions.
    #[error("render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),

    /// Invalid configuration or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The encoder rejected the rendered frame.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PostcardError {
    /// Build a [`PostcardError::ImageLoad`] value.
    pub fn image_load(source_key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ImageLoad {
            source_key: source_key.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`PostcardError::RenderSurfaceUnavailable`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::RenderSurfaceUnavailable(msg.into())
    }

    /// Build a [`PostcardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PostcardError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Whether this error came from loading an image source.
    pub fn is_image_load(&self) -> bool {
        matches!(self, Self::ImageLoad { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
