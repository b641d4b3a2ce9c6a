//! Open-clause bookkeeping.

use crate::clause::ClauseKind;
use crate::error::{BuilderError, BuilderResult};

/// Which clause, if any, is currently open on a builder.
///
/// At most one clause is open at a time; a clause must be ended with the same kind it
/// was started with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClauseState {
    current: Option<ClauseKind>,
    enabled: bool,
}

impl ClauseState {
    /// Create a tracker with no open clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the open clause.
    pub fn current(&self) -> Option<ClauseKind> {
        self.current
    }

    /// Whether the open clause is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether any clause is open.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Record `kind` as the open clause.
    pub fn start_clause(&mut self, kind: ClauseKind) -> BuilderResult<()> {
        if let Some(open) = self.current {
            return Err(BuilderError::invalid_operation(format!(
                "cannot start clause {kind} while clause {open} is still open"
            )));
        }
        self.current = Some(kind);
        self.enabled = true;
        Ok(())
    }

    /// Close the open clause, which must be of kind `kind`.
    pub fn end_clause(&mut self, kind: ClauseKind) -> BuilderResult<()> {
        match self.current {
            None => Err(BuilderError::invalid_operation(format!(
                "cannot end clause {kind}: no clause is open"
            ))),
            Some(open) if open != kind => Err(BuilderError::invalid_operation(format!(
                "cannot end clause {kind}: clause {open} is open"
            ))),
            Some(_) => {
                *self = Self::default();
                Ok(())
            }
        }
    }
}
