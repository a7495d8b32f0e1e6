use std::path::PathBuf;
use thiserror::Error;

/// The single startup failure: the entity mapping could not be obtained or
/// holds nothing to draw. Causes are kept apart for logging only.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("failed to read {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid mapping JSON: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("mapping contains no folders")]
    Empty,
}

impl MappingError {
    /// Message shown to the user, identical for every cause.
    pub fn user_message(&self) -> &'static str {
        "The JSON file is empty or invalid. Check the contents of functions.json."
    }
}
