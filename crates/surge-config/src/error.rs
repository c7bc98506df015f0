//! Error types for preset loading, saving and resolution.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// File-system operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Reading a preset file.
    Read,
    /// Writing a preset file.
    Write,
    /// Creating a preset directory.
    CreateDir,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::CreateDir => "create directory",
        })
    }
}

/// Errors from preset files and setting overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file or directory operation failed
    #[error("cannot {op} '{path}': {source}")]
    Io {
        /// What was attempted.
        op: IoOp,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Preset text is not valid TOML or has the wrong shape
    #[error("invalid preset TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Preset could not be encoded
    #[error("cannot encode preset: {0}")]
    Encode(#[from] toml::ser::Error),

    /// No file or factory preset matches the name
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Override not in `key=value` form
    #[error("invalid override '{0}': expected key=value")]
    InvalidOverride(String),

    /// A setting failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Reading `path` failed.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::io(IoOp::Read, path, source)
    }

    /// Writing `path` failed.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::io(IoOp::Write, path, source)
    }

    /// Creating directory `path` failed.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::io(IoOp::CreateDir, path, source)
    }

    /// The failed file-system operation, if this is an I/O error.
    pub fn io_op(&self) -> Option<IoOp> {
        match self {
            ConfigError::Io { op, .. } => Some(*op),
            _ => None,
        }
    }
}
