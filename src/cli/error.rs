//! CLI-level errors (wraps domain and config errors)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError<i64>),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("render json: {0}")]
    Render(#[source] serde_json::Error),

    #[error("write output: {0}")]
    Output(#[from] io::Error),

    #[error("forest is {depth} levels deep, rendering supports at most {limit}; use `walk` or `branches`")]
    TooDeep { depth: usize, limit: usize },

    #[error("current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("check failed: {duplicates} duplicate id(s), {detached} detached node(s)")]
    Check { duplicates: usize, detached: usize },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Tree(_)
            | CliError::Parse { .. }
            | CliError::Check { .. }
            | CliError::TooDeep { .. } => crate::exitcode::DATAERR,
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                crate::exitcode::NOINPUT
            }
            CliError::Io { .. } | CliError::CurrentDir(_) | CliError::Output(_) => {
                crate::exitcode::IOERR
            }
            CliError::Render(_) => crate::exitcode::SOFTWARE,
        }
    }
}
