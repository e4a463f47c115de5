// Error taxonomy for the selection pipeline.
//
// Every failure is surfaced to the caller. The only swallowed error in the
// crate is the best-effort working directory cleanup, which logs instead.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectionError>;

#[derive(Error, Debug)]
pub enum SelectionError {
    /// A corpus or vocabulary file could not be read.
    #[error("cannot read input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selection executable is not on PATH or is not executable.
    #[error("selection tool not found or not executable: {0}")]
    ToolNotFound(String),

    /// The selection executable ran and exited unsuccessfully.
    #[error("selection tool failed ({status}): {stderr}")]
    ExternalToolFailure { status: ExitStatus, stderr: String },

    /// The result file is missing, has a short line, or references a line
    /// that doesn't exist. Line 0 means the file as a whole.
    #[error("malformed selection output at line {line}: {reason}")]
    MalformedOutput { line: usize, reason: String },

    /// Writing an artifact into the working directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SelectionError {
    pub(crate) fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            line,
            reason: reason.into(),
        }
    }
}
