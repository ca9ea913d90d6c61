use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExternalizeError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("failed to render bundler config: {message}")]
    Render { message: String },
}
