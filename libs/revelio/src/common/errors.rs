//! Error type shared by every stage of an annotation run.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RevelioError>;

#[derive(Error, Debug)]
pub enum RevelioError {
    /// Image file missing or unreadable
    #[error("open {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No usable credential could be discovered
    #[error("could not find default credentials: {0}")]
    Auth(String),

    /// Network failure, non-success status or undecodable body
    #[error("annotate request failed: {0}")]
    Transport(String),

    /// The service answered but broke its own response contract
    #[error("malformed annotate response: {0}")]
    MalformedResponse(String),

    #[error("unrecognized revelio mode: {0:?} (expected text, label or face)")]
    UnrecognizedMode(String),
}

impl From<reqwest::Error> for RevelioError {
    fn from(err: reqwest::Error) -> Self {
        RevelioError::Transport(err.to_string())
    }
}
