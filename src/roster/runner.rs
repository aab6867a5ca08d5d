//! End-to-end roster solve: build → solve → extract.

use super::builder::{build_model, RosterModel};
use super::extract::extract_assignment;
use crate::error::Result;
use crate::milp::{MicroLpSolver, MilpSolver, SolverConfig, SolverStatus};
use crate::model::{AttendanceAssignment, RosterConfig, RosterProblem};
use std::fmt;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of a successful roster solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterResult {
    /// `Optimal`, or `Feasible` if the solver stopped early.
    pub status: SolverStatus,

    /// Who comes in when.
    pub assignment: AttendanceAssignment,

    /// Objective recomputed from the assignment.
    pub objective: i64,

    /// Objective as reported by the solver.
    pub reported_objective: Option<f64>,

    /// Solver wall-clock time in milliseconds.
    pub solve_time_ms: u64,

    /// Row labels for display.
    pub employee_names: Vec<String>,

    /// Column labels for display.
    pub day_labels: Vec<String>,
}

impl RosterResult {
    /// Header row plus one `0`/`1` row per employee.
    pub fn to_table(&self) -> Vec<Vec<String>> {
        self.assignment.to_labeled_table(
            self.employee_names.iter().map(String::as_str),
            self.day_labels.iter().map(String::as_str),
        )
    }
}

impl fmt::Display for RosterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.to_table();
        let columns = table.first().map_or(0, Vec::len);
        let widths: Vec<usize> = (0..columns)
            .map(|c| {
                table
                    .iter()
                    .map(|row| row.get(c).map_or(0, |cell| cell.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in &table {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(c, (cell, &w))| {
                    if c == 0 {
                        format!("{cell:<w$}")
                    } else {
                        format!("{cell:>w$}")
                    }
                })
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }
        write!(f, "objective: {} ({:?})", self.objective, self.status)
    }
}

/// Executes the roster pipeline.
///
/// # Usage
///
/// ```
/// use u_roster::model::toy::{toy_config, toy_problem};
/// use u_roster::roster::RosterRunner;
///
/// let result = RosterRunner::solve(&toy_problem(), &toy_config()).unwrap();
/// assert_eq!(result.objective, 125);
/// ```
pub struct RosterRunner;

impl RosterRunner {
    /// Solves with the default [`MicroLpSolver`] and solver configuration.
    ///
    /// `MicroLpSolver` always runs to optimality.
    pub fn solve(problem: &RosterProblem, config: &RosterConfig) -> Result<RosterResult> {
        Self::solve_with(&MicroLpSolver::new(), problem, config, &SolverConfig::default())
    }

    /// Solves with a caller-chosen backend and solver configuration.
    ///
    /// Whether [`SolverConfig::time_limit`] is honored depends on the
    /// backend: [`MicroLpSolver`] has no time-limit support and ignores it
    /// with a warning; `HighsSolver` (feature `highs`) stops at the limit
    /// and returns its best incumbent as [`SolverStatus::Feasible`].
    pub fn solve_with<S: MilpSolver + ?Sized>(
        solver: &S,
        problem: &RosterProblem,
        config: &RosterConfig,
        solver_config: &SolverConfig,
    ) -> Result<RosterResult> {
        debug!(
            solver = solver.name(),
            employees = problem.employee_count(),
            days = problem.day_count(),
            "solving roster"
        );
        let roster = build_model(problem, config)?;
        let result = Self::solve_model(solver, &roster, problem, solver_config)?;
        debug_assert!(result.assignment.violations(config).is_empty());
        info!(
            objective = result.objective,
            attendance = result.assignment.total_attendance(),
            solve_time_ms = result.solve_time_ms,
            "roster solved"
        );
        Ok(result)
    }

    /// Solves an already built (and possibly extended) model.
    ///
    /// Use this to add constraints of your own through
    /// [`RosterModel::model_mut`] before solving.
    pub fn solve_model<S: MilpSolver + ?Sized>(
        solver: &S,
        roster: &RosterModel,
        problem: &RosterProblem,
        solver_config: &SolverConfig,
    ) -> Result<RosterResult> {
        let solution = solver.solve(roster.model(), solver_config);
        let extraction = extract_assignment(roster, problem, &solution)?;

        Ok(RosterResult {
            status: solution.status,
            assignment: extraction.assignment,
            objective: extraction.objective,
            reported_objective: extraction.reported_objective,
            solve_time_ms: solution.solve_time_ms,
            employee_names: problem.employees.iter().map(|e| e.name.clone()).collect(),
            day_labels: problem.days.iter().map(|d| d.label.clone()).collect(),
        })
    }

    /// Solves independent instances, each with its own solver call.
    ///
    /// With the `parallel` feature the instances run on rayon's thread
    /// pool. Results come back in input order.
    pub fn solve_batch<S: MilpSolver + Sync + ?Sized>(
        solver: &S,
        instances: &[(RosterProblem, RosterConfig)],
        solver_config: &SolverConfig,
    ) -> Vec<Result<RosterResult>> {
        #[cfg(feature = "parallel")]
        let iter = instances.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = instances.iter();

        iter.map(|(problem, config)| Self::solve_with(solver, problem, config, solver_config))
            .collect()
    }
}
