//! Dual-representation statement editor.
//!
//! One canonical statement list, two ways to edit it:
//!
//! - **Visual**: structured operations (set effect, toggle an action, ...)
//!   applied directly to the canonical list.
//! - **Raw**: a JSON text buffer, re-parsed on every edit. The canonical
//!   list only changes when the buffer parses and validates, so a half-typed
//!   edit never replaces the last good list.
//!
//! ```text
//!            switch_to_raw (always)
//!   Visual ───────────────────────────▶ Raw
//!     ▲                                  │
//!     └──────────────────────────────────┘
//!        switch_to_visual (buffer must parse + validate)
//! ```

mod raw;

pub use raw::{RawError, ShapeError, parse_statements, serialize_statements};

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Effect, Statement};
use crate::validate::{ValidationError, validate_list};

/// Which surface is currently editing the statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Visual,
    Raw,
}

/// Editor operation refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("operation requires {expected:?} mode")]
    WrongMode { expected: EditorMode },

    #[error("statement {} does not exist (policy has {len} statements)", .index + 1)]
    StatementOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Raw(#[from] RawError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialize statements: {0}")]
    Serialize(String),
}

/// Single mutation surface for a policy's statement list.
#[derive(Debug, Clone)]
pub struct PolicyEditor {
    mode: EditorMode,
    statements: Vec<Statement>,
    raw: String,
    raw_error: Option<RawError>,
}

impl PolicyEditor {
    /// Start in visual mode over an existing (possibly empty) list.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            mode: EditorMode::Visual,
            statements,
            raw: String::new(),
            raw_error: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The canonical (last accepted) statement list.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The raw buffer. Only meaningful in raw mode.
    pub fn raw_text(&self) -> Option<&str> {
        match self.mode {
            EditorMode::Raw => Some(&self.raw),
            EditorMode::Visual => None,
        }
    }

    /// Error from the most recent raw edit or refused transition.
    pub fn raw_error(&self) -> Option<&RawError> {
        self.raw_error.as_ref()
    }

    // ── Mode transitions ──

    /// Switch to raw mode, serializing the canonical list. Always permitted.
    ///
    /// The fresh buffer goes through the same gate as a raw edit, so an
    /// unfinished visual list shows its error in raw mode straight away.
    pub fn switch_to_raw(&mut self) -> Result<(), EditorError> {
        if self.mode == EditorMode::Raw {
            return Ok(());
        }
        self.raw = serialize_statements(&self.statements)
            .map_err(|e| EditorError::Serialize(e.to_string()))?;
        self.raw_error = parse_statements(&self.raw).err();
        self.mode = EditorMode::Raw;
        debug!(statements = self.statements.len(), "editor switched to raw");
        Ok(())
    }

    /// Switch back to visual mode. Refused while the raw buffer does not
    /// parse or validate; the buffer is kept so it can be fixed.
    pub fn switch_to_visual(&mut self) -> Result<(), EditorError> {
        if self.mode == EditorMode::Visual {
            return Ok(());
        }
        match parse_statements(&self.raw) {
            Ok(statements) => {
                self.statements = statements;
                self.raw_error = None;
                self.raw.clear();
                self.mode = EditorMode::Visual;
                debug!(statements = self.statements.len(), "editor switched to visual");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "refused switch to visual");
                self.raw_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    // ── Raw editing ──

    /// Replace the raw buffer. The canonical list is updated only when the
    /// new text is a valid statement list; otherwise the error is recorded
    /// and returned and the previous list is kept.
    pub fn edit_raw(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        self.require(EditorMode::Raw)?;
        self.raw = text.into();
        match parse_statements(&self.raw) {
            Ok(statements) => {
                self.statements = statements;
                self.raw_error = None;
                Ok(())
            }
            Err(e) => {
                self.raw_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    // ── Visual editing ──

    /// Append a statement; returns its index.
    pub fn add_statement(&mut self, statement: Statement) -> Result<usize, EditorError> {
        self.require(EditorMode::Visual)?;
        self.statements.push(statement);
        Ok(self.statements.len() - 1)
    }

    pub fn remove_statement(&mut self, index: usize) -> Result<Statement, EditorError> {
        self.require(EditorMode::Visual)?;
        self.check_index(index)?;
        Ok(self.statements.remove(index))
    }

    pub fn set_effect(&mut self, index: usize, effect: Effect) -> Result<(), EditorError> {
        self.statement_mut(index)?.effect = effect;
        Ok(())
    }

    pub fn set_sid(&mut self, index: usize, sid: Option<String>) -> Result<(), EditorError> {
        self.statement_mut(index)?.sid = sid;
        Ok(())
    }

    /// Returns whether the action is selected afterwards.
    pub fn toggle_action(&mut self, index: usize, action: &str) -> Result<bool, EditorError> {
        Ok(self.statement_mut(index)?.toggle_action(action))
    }

    /// Returns whether the resource is selected afterwards.
    pub fn toggle_resource(&mut self, index: usize, resource: &str) -> Result<bool, EditorError> {
        Ok(self.statement_mut(index)?.toggle_resource(resource))
    }

    pub fn set_resources(
        &mut self,
        index: usize,
        resources: Vec<String>,
    ) -> Result<(), EditorError> {
        self.statement_mut(index)?.resources = resources;
        Ok(())
    }

    // ── Save gate ──

    /// The error that currently blocks saving, if any.
    ///
    /// In raw mode this is the error of the latest buffer, even though the
    /// canonical list itself is still valid.
    pub fn validation_error(&self) -> Option<EditorError> {
        if self.mode == EditorMode::Raw {
            if let Some(e) = &self.raw_error {
                return Some(EditorError::Raw(e.clone()));
            }
        }
        validate_list(&self.statements).err().map(EditorError::Validation)
    }

    pub fn can_save(&self) -> bool {
        self.validation_error().is_none()
    }

    /// The statement list to persist, or the error blocking the save.
    pub fn save(&self) -> Result<Vec<Statement>, EditorError> {
        match self.validation_error() {
            Some(e) => Err(e),
            None => Ok(self.statements.clone()),
        }
    }

    fn require(&self, expected: EditorMode) -> Result<(), EditorError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(EditorError::WrongMode { expected })
        }
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.statements.len() {
            Ok(())
        } else {
            Err(EditorError::StatementOutOfRange {
                index,
                len: self.statements.len(),
            })
        }
    }

    fn statement_mut(&mut self, index: usize) -> Result<&mut Statement, EditorError> {
        self.require(EditorMode::Visual)?;
        self.check_index(index)?;
        Ok(&mut self.statements[index])
    }
}
