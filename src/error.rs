use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a curation run.
///
/// Countries without a complete year and countries without a classification
/// match are not errors; they are handled (and logged) by the stages themselves.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or a non-success HTTP status from the provider.
    #[error("fetch failed for {url}: {message}")]
    ProviderFetch { url: String, message: String },

    /// The provider answered, but not with the shape we expect.
    #[error("unexpected payload from {url}: {message}")]
    ProviderPayload { url: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn payload(url: &str, message: impl Into<String>) -> Self {
        Error::ProviderPayload {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn fetch(url: &str, message: impl Into<String>) -> Self {
        Error::ProviderFetch {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
