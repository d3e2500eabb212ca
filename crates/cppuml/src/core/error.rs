//! Core error types for the conversion pipeline
//!
//! Every variant here is terminal: the run stops and no output is kept.
//! Recoverable problems (an unrecoverable type spelling, say) are logged
//! as warnings instead and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Terminal errors raised while converting a C++ source into a diagram
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File {} not found.", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("{} is a directory.", path.display())]
    OutputIsDirectory { path: PathBuf },

    #[error("{} already exists. Use -f to overwrite.", path.display())]
    OutputExists { path: PathBuf },

    #[error("Front-end error: {message}")]
    FrontEndError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Create a new source-not-found error
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a new output-is-directory error
    pub fn output_is_directory(path: impl Into<PathBuf>) -> Self {
        Self::OutputIsDirectory { path: path.into() }
    }

    /// Create a new output-exists error
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create a new front-end error
    pub fn front_end_error(message: impl Into<String>) -> Self {
        Self::FrontEndError {
            message: message.into(),
        }
    }
}
