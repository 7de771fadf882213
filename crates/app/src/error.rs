use std::path::Path;

use thiserror::Error;

use quotegen_core::DomainError;
use quotegen_document::RenderError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("{action} {}", path.display()), source)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the message is meant for the person who prepared the input.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Domain(err) => err.is_user_facing(),
            Self::Request(_) => true,
            _ => false,
        }
    }
}
