//! Decoding of solver output into an attendance grid.

use super::builder::RosterModel;
use crate::error::{Result, RosterError};
use crate::milp::{MilpSolution, SolverStatus};
use crate::model::{AttendanceAssignment, RosterProblem};
use tracing::warn;

/// Maximum distance from 0 or 1 accepted for an attendance value.
pub const BINARY_TOLERANCE: f64 = 1e-6;

/// Attendance grid recovered from a solution, with the objective
/// recomputed from it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub assignment: AttendanceAssignment,
    /// Objective recomputed from `assignment`. Authoritative.
    pub objective: i64,
    /// Objective as reported by the solver.
    pub reported_objective: Option<f64>,
}

/// Rounds `value` to 0/1 if it lies within [`BINARY_TOLERANCE`].
pub fn to_binary(value: f64) -> Option<bool> {
    if value.abs() <= BINARY_TOLERANCE {
        Some(false)
    } else if (value - 1.0).abs() <= BINARY_TOLERANCE {
        Some(true)
    } else {
        None
    }
}

/// Rebuilds the attendance grid from `solution`.
///
/// Only `attend` variables are read; link variables stay internal.
///
/// # Errors
///
/// - [`RosterError::NotSolved`] if the status carries no assignment or a
///   value is missing
/// - [`RosterError::Rounding`] if an attendance value is not within
///   tolerance of 0 or 1
pub fn extract_assignment(
    roster: &RosterModel,
    problem: &RosterProblem,
    solution: &MilpSolution,
) -> Result<Extraction> {
    if !solution.is_solution_found() {
        return Err(RosterError::NotSolved {
            status: solution.status,
            message: solution.message.clone(),
        });
    }

    let (n, d_count) = (roster.employees(), roster.days());
    let mut cells = Vec::with_capacity(n * d_count);
    for employee in 0..n {
        for day in 0..d_count {
            let var = roster.attend_var(employee, day);
            let value = solution
                .value(var)
                .ok_or_else(|| RosterError::NotSolved {
                    status: SolverStatus::Error,
                    message: Some(format!("no value for variable {}", var.index())),
                })?;
            let bit = to_binary(value).ok_or(RosterError::Rounding {
                employee,
                day,
                value,
            })?;
            cells.push(bit);
        }
    }

    let assignment = AttendanceAssignment::from_cells(n, d_count, cells);
    let objective = assignment.objective(problem);

    if let Some(reported) = solution.objective_value {
        let tolerance = BINARY_TOLERANCE * reported.abs().max(1.0);
        if (reported - objective as f64).abs() > tolerance {
            warn!(
                reported,
                recomputed = objective,
                "solver objective disagrees with recomputed objective"
            );
        }
    }

    Ok(Extraction {
        assignment,
        objective,
        reported_objective: solution.objective_value,
    })
}
