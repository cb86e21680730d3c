//! Recoverable errors.
//!
//! Contract violations inside the engine (an invalid position handed to
//! `replace`, an out-of-range line) panic. The errors here cover the inputs a
//! host cannot fully control: config files and positions arriving from
//! outside the editor.

use std::io;
use std::path::PathBuf;

use codeview_buffer::{Position, TextRange};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    #[error("position {0} is outside the document")]
    InvalidPosition(Position),
    #[error("range {0} is outside the document")]
    InvalidRange(TextRange),
    #[error("line {0} is outside the document")]
    InvalidLine(usize),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type EditResult<T> = Result<T, EditError>;
