//! Task status state machine.
//!
//! Legal moves are held in a [`TransitionTable`] rather than implied by the
//! enum. Today the table is fully connected (including moving `done` back to
//! `todo`); restricting it later means building a different table, not
//! touching the code that consults it.

use crate::contract::ValidationFailure;
use crate::status::TaskStatus;
use crate::types::DbId;

const N: usize = TaskStatus::COUNT;

/// A move that the table does not permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cannot move a task from {from} to {to}")]
pub struct TransitionError {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl From<TransitionError> for ValidationFailure {
    fn from(err: TransitionError) -> Self {
        ValidationFailure::single("status", err.to_string())
    }
}

/// Finite table of permitted `from -> to` status moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    allowed: [[bool; N]; N],
}

impl TransitionTable {
    /// A table with no permitted moves.
    pub fn empty() -> Self {
        Self {
            allowed: [[false; N]; N],
        }
    }

    /// Every status may move to every status, itself included.
    pub fn fully_connected() -> Self {
        Self {
            allowed: [[true; N]; N],
        }
    }

    /// Build a table from explicit `(from, to)` pairs.
    pub fn from_pairs(pairs: &[(TaskStatus, TaskStatus)]) -> Self {
        let mut table = Self::empty();
        for &(from, to) in pairs {
            table.allowed[from.ordinal()][to.ordinal()] = true;
        }
        table
    }

    /// Return a copy with `from -> to` removed.
    pub fn without(mut self, from: TaskStatus, to: TaskStatus) -> Self {
        self.allowed[from.ordinal()][to.ordinal()] = false;
        self
    }

    pub fn allows(&self, from: TaskStatus, to: TaskStatus) -> bool {
        self.allowed[from.ordinal()][to.ordinal()]
    }

    pub fn check(&self, from: TaskStatus, to: TaskStatus) -> Result<(), TransitionError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }

    /// Statuses reachable from `from` in one move, in column order.
    pub fn targets(&self, from: TaskStatus) -> Vec<TaskStatus> {
        TaskStatus::ALL
            .iter()
            .copied()
            .filter(|&to| self.allows(from, to))
            .collect()
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::fully_connected()
    }
}

/// One authoritative status update derived from a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: DbId,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl StatusChange {
    /// Plan a move of `task_id` from `from` to `to`.
    ///
    /// Returns `Ok(None)` when the target equals the current status: staying
    /// in the same column is presentation-only and needs no update.
    pub fn plan(
        table: &TransitionTable,
        task_id: DbId,
        from: TaskStatus,
        to: TaskStatus,
    ) -> Result<Option<Self>, TransitionError> {
        if from == to {
            return Ok(None);
        }
        table.check(from, to)?;
        Ok(Some(Self { task_id, from, to }))
    }
}
