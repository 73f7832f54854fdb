use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to determine config directory")]
    ConfigDirResolution,

    #[error("Failed to create config directory '{0}'")]
    ConfigDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Config path '{0}' exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to read parameter file '{0}'")]
    ParamRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write parameter file '{0}'")]
    ParamWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode parameter file '{0}'")]
    ParamDecode(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode parameters")]
    ParamEncode(#[source] serde_json::Error),

    #[error("Failed to write measurements")]
    Sink(#[from] std::io::Error),

    #[error("No parser named '{0}' is registered")]
    UnknownParser(String),
}
