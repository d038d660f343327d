//! Application state for the table viewer.
//!
//! Groups the table, its view and the undo controller with the session
//! bookkeeping (file name, quit flag) and the status line messages.

use std::path::PathBuf;

use crate::controller::Controller;
use crate::model::Table;
use crate::view::ViewState;

/// Per-file session bookkeeping.
#[derive(Debug, Default)]
pub struct Session {
    /// Where `save` writes; `None` until loaded or saved as.
    pub filename: Option<PathBuf>,
    /// Unsaved edits exist.
    pub dirty: bool,
    pub quit: bool,
}

impl Session {
    pub fn new(filename: Option<PathBuf>) -> Self {
        Self {
            filename,
            ..Self::default()
        }
    }
}

/// The message line under the status bar. An error replaces any output.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusLine {
    output: Option<String>,
    error: Option<String>,
}

impl StatusLine {
    pub fn set_output(&mut self, msg: impl Into<String>) {
        self.output = Some(msg.into());
        self.error = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    pub fn clear(&mut self) {
        self.output = None;
        self.error = None;
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Everything a command can act on.
#[derive(Debug)]
pub struct App {
    pub table: Table,
    pub view: ViewState,
    pub controller: Controller,
    pub session: Session,
    pub status: StatusLine,
}

impl App {
    pub fn new(table: Table, view: ViewState, filename: Option<PathBuf>) -> Self {
        Self {
            table,
            view,
            controller: Controller::new(),
            session: Session::new(filename),
            status: StatusLine::default(),
        }
    }
}
