//! Error types for dictionary loading and quality calculation.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Popular password file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read popular password file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Popular password file is empty")]
    EmptyFile,
    #[error("Timed out after {0:?} while loading popular password file")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum QualityError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Quality calculator must be initialized before use")]
    Uninitialized,
    #[error("Failed to load popular passwords: {0}")]
    DictionaryLoad(#[from] DictionaryError),
}
