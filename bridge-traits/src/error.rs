use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("No entry at {path}")]
    NotFound { path: PathBuf },

    #[error("Entry at {path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Entry at {path} is not a file")]
    NotAFile { path: PathBuf },

    #[error("Path {path} is outside the bridge sandbox")]
    OutsideSandbox { path: PathBuf },

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
