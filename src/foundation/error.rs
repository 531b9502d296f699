/// Convenience result type used across the crate.
pub type HalftoneResult<T> = Result<T, HalftoneError>;

/// Top-level error taxonomy used by compositor and device APIs.
#[derive(thiserror::Error, Debug)]
pub enum HalftoneError {
    /// No rendering context could be obtained; the instance is unusable.
    #[error("context error: {0}")]
    Context(String),

    /// A shader source could not be loaded or a program failed to build.
    #[error("shader error: {0}")]
    Shader(String),

    /// Invalid caller-provided data (palette, pitch, offsets, indices, config).
    #[error("validation error: {0}")]
    Validation(String),

    /// Device-level failure while uploading, binding or drawing.
    #[error("render error: {0}")]
    Render(String),

    /// Source image could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HalftoneError {
    /// Build a [`HalftoneError::Context`] value.
    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }

    /// Build a [`HalftoneError::Shader`] value.
    pub fn shader(msg: impl Into<String>) -> Self {
        Self::Shader(msg.into())
    }

    /// Build a [`HalftoneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HalftoneError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`HalftoneError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
