//! Error type shared by every stage of the roster pipeline.

use crate::milp::SolverStatus;
use thiserror::Error;

/// Failures surfaced by input decoding, model construction, solving,
/// and result extraction.
///
/// Every variant is detected at the boundary where it occurs and is
/// never retried: re-solving identical input is deterministic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterError {
    /// A matrix or table does not match the employee/day counts.
    #[error("{what} has shape {found:?}, expected {expected:?}")]
    DimensionMismatch {
        /// Which input disagreed (e.g. `"preference matrix"`).
        what: &'static str,
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        found: (usize, usize),
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A preference cell holds something other than the three canonical levels.
    #[error("invalid preference {text:?} at row {row}, column {col}")]
    InvalidPreference {
        row: usize,
        col: usize,
        text: String,
    },

    /// A connection cell is not an integer.
    #[error("invalid connection weight {text:?} at row {row}, column {col}")]
    InvalidConnection {
        row: usize,
        col: usize,
        text: String,
    },

    /// The same employee name appears twice in the input.
    #[error("duplicate employee name: {0}")]
    DuplicateEmployee(String),

    /// The solver terminated without a usable assignment.
    #[error("solver terminated with status {:?}{}", .status, detail(.message))]
    NotSolved {
        status: SolverStatus,
        message: Option<String>,
    },

    /// An attendance variable came back too far from 0 or 1.
    #[error("attendance value {value} for employee {employee} on day {day} is not binary")]
    Rounding {
        employee: usize,
        day: usize,
        value: f64,
    },
}

fn detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RosterError>;
