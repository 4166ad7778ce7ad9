use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the pattern detector library
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("token length must be at least 1, got {0}")]
    InvalidTokenLength(usize),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: malformed result line {content:?}", path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl DetectorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DetectorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;

/// Rejected answer to the token length prompt
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParamError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("token length must be at least 1")]
    Zero,
}
