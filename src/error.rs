//! Error types for the table viewer.
//!
//! Each layer has its own error enum; the command layer wraps them all in
//! [`CmdError`] so a failure can be shown as a single status line.

use thiserror::Error;

use crate::model::ColumnId;

/// Invalid formatter construction parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid formatter config: {0}")]
    InvalidConfig(String),
}

/// Failures of table model operations. The table is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no column: {0}")]
    NotFound(ColumnId),

    #[error("cannot delete last row")]
    LastRow,

    #[error("type mismatch in column {column}: expected {expected}, got {actual}")]
    TypeMismatch {
        column: ColumnId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Lookup failures against a computed layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("column {0} is not in the layout")]
    NotFound(usize),
}

/// Rejected view state changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("column already hidden: {0}")]
    AlreadyHidden(ColumnId),

    #[error("column already shown: {0}")]
    AlreadyVisible(ColumnId),

    #[error("no column: {0}")]
    NotFound(ColumnId),
}

/// Loading or saving delimited text.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no columns in input")]
    Empty,

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Problems reading the view configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Malformed key map definitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeymapError {
    #[error("combo {combo} but not prefix {prefix}")]
    MissingPrefix { combo: String, prefix: String },

    #[error("unknown command in key map: {0}")]
    UnknownCommand(String),
}

/// A command failed. Shown to the user as `error: <message>`.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error("{0}")]
    Failed(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Io(#[from] IoError),
}

impl CmdError {
    pub fn msg(message: impl Into<String>) -> Self {
        CmdError::Failed(message.into())
    }
}
