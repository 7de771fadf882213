use thiserror::Error;

/// Failure while turning a layout into bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output library rejected an operation (font registration, serialization).
    #[error("render backend failed: {0}")]
    Backend(String),

    /// The layout cannot be drawn as described (e.g. cell spans wider than the table).
    #[error("invalid layout: {0}")]
    Layout(String),
}

impl RenderError {
    pub fn backend(err: impl core::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }
}
