use std::path::PathBuf;

use thiserror::Error;

use stockroute_core::DomainError;

pub type InterchangeResult<T> = Result<T, InterchangeError>;

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("delivery contains no products")]
    EmptyDelivery,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl InterchangeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}
