//! MILP solver interface and the microlp backend.

use super::model::{MilpModel, ObjectiveSense, Sense, VarId};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Valid but not proven-optimal solution (e.g. stopped by a time limit).
    Feasible,
    /// No assignment satisfies all constraints.
    Infeasible,
    /// Objective can grow without limit.
    Unbounded,
    /// The solver failed to run.
    Error,
}

impl SolverStatus {
    /// Whether this status carries usable variable values.
    pub fn has_solution(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// Solution from a MILP solver.
#[derive(Debug, Clone)]
pub struct MilpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective value reported by the solver (if any).
    pub objective_value: Option<f64>,
    /// Variable values indexed by [`VarId::index`]. Empty unless a
    /// solution was found.
    pub values: Vec<f64>,
    /// Diagnostic message for `Error` (and occasionally other) statuses.
    pub message: Option<String>,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl MilpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            message: None,
            solve_time_ms: 0,
        }
    }

    /// Creates a value-less solution carrying a diagnostic message.
    pub fn failed(status: SolverStatus, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(status)
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        self.status.has_solution()
    }

    /// Value of a variable, if present.
    pub fn value(&self, var: VarId) -> Option<f64> {
        self.values.get(var.index()).copied()
    }
}

/// Solver configuration.
///
/// Options are handed to the backend as-is; a backend that cannot honor
/// one logs a warning and carries on.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_roster::milp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(30))
///     .with_verbose(true);
/// assert_eq!(config.time_limit, Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Wall-clock limit for one solve. `None` = run to completion.
    pub time_limit: Option<Duration>,
    /// Log solve summaries at `info` instead of `debug`.
    pub verbose: bool,
}

impl SolverConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Trait for MILP solver implementations.
///
/// Implementors submit a [`MilpModel`] to some optimizer and translate
/// its verdict into a [`SolverStatus`]. Solvers never fail with `Err`:
/// every outcome, including internal faults, is a status.
pub trait MilpSolver {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Solves the model and returns a solution.
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> MilpSolution;
}

/// Branch-and-bound solver backed by the pure-Rust `microlp` crate.
///
/// # Limitations
///
/// - No time limit: a requested limit is logged and ignored, so the
///   status is always `Optimal` when a solution exists. Use
///   `HighsSolver` (feature `highs`) for bounded solves.
/// - Depth-first branch-and-bound; fine for rosters of a few dozen
///   employees, slow beyond that.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> MilpSolution {
        if let Err(reason) = model.validate() {
            return MilpSolution::failed(SolverStatus::Error, reason);
        }
        if let Some(limit) = config.time_limit {
            warn!(
                solver = self.name(),
                limit_ms = limit.as_millis() as u64,
                "time limit not supported by backend, ignoring"
            );
        }

        if let Some(solution) = settle_trivial(model) {
            report(self.name(), model, &solution, config);
            return solution;
        }

        let start_time = Instant::now();

        let direction = match model.sense() {
            ObjectiveSense::Maximize => microlp::OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => microlp::OptimizationDirection::Minimize,
        };
        let mut problem = microlp::Problem::new(direction);
        let vars: Vec<microlp::Variable> = model
            .vars()
            .iter()
            .map(|var| problem.add_binary_var(var.objective))
            .collect();

        for constraint in model.constraints() {
            if constraint.terms.is_empty() {
                continue;
            }
            let op = match constraint.sense {
                Sense::Le => microlp::ComparisonOp::Le,
                Sense::Ge => microlp::ComparisonOp::Ge,
                Sense::Eq => microlp::ComparisonOp::Eq,
            };
            problem.add_constraint(
                constraint
                    .terms
                    .iter()
                    .map(|&(var, coef)| (vars[var.index()], coef)),
                op,
                constraint.rhs,
            );
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| problem.solve()));
        let solve_time_ms = start_time.elapsed().as_millis() as u64;

        let solution = match outcome {
            Ok(Ok(solved)) => MilpSolution {
                status: SolverStatus::Optimal,
                objective_value: Some(solved.objective()),
                values: vars.iter().map(|&var| *solved.var_value(var)).collect(),
                message: None,
                solve_time_ms,
            },
            Ok(Err(microlp::Error::Infeasible)) => MilpSolution {
                solve_time_ms,
                ..MilpSolution::empty(SolverStatus::Infeasible)
            },
            Ok(Err(microlp::Error::Unbounded)) => MilpSolution {
                solve_time_ms,
                ..MilpSolution::empty(SolverStatus::Unbounded)
            },
            Ok(Err(other)) => MilpSolution {
                solve_time_ms,
                ..MilpSolution::failed(SolverStatus::Error, other.to_string())
            },
            Err(payload) => MilpSolution {
                solve_time_ms,
                ..MilpSolution::failed(SolverStatus::Error, panic_message(payload.as_ref()))
            },
        };

        report(self.name(), model, &solution, config);
        solution
    }
}

/// Outcome of models that never need a backend: a violated constant
/// constraint, or no variables at all.
pub(super) fn settle_trivial(model: &MilpModel) -> Option<MilpSolution> {
    // Constant constraints have no terms for a backend to hold.
    for constraint in model.constraints() {
        if constraint.terms.is_empty() && !constraint.is_satisfied_by(&[], 0.0) {
            return Some(MilpSolution::empty(SolverStatus::Infeasible));
        }
    }
    if model.var_count() == 0 {
        return Some(MilpSolution {
            objective_value: Some(0.0),
            ..MilpSolution::empty(SolverStatus::Optimal)
        });
    }
    None
}

pub(super) fn report(solver: &str, model: &MilpModel, solution: &MilpSolution, config: &SolverConfig) {
    if config.verbose {
        info!(
            solver,
            model = %model.name,
            vars = model.var_count(),
            constraints = model.constraint_count(),
            status = ?solution.status,
            objective = ?solution.objective_value,
            elapsed_ms = solution.solve_time_ms,
            "solve finished"
        );
    } else {
        debug!(
            solver,
            model = %model.name,
            status = ?solution.status,
            objective = ?solution.objective_value,
            elapsed_ms = solution.solve_time_ms,
            "solve finished"
        );
    }
}

pub(super) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("solver panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("solver panicked: {msg}")
    } else {
        "solver panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::LinearConstraint;

    fn solve(model: &MilpModel) -> MilpSolution {
        MicroLpSolver::new().solve(model, &SolverConfig::default())
    }

    #[test]
    fn test_pick_best_of_two() {
        let mut model = MilpModel::new("test");
        let a = model.add_binary("a", 3.0);
        let b = model.add_binary("b", 2.0);
        model.add_constraint(LinearConstraint::le(vec![(a, 1.0), (b, 1.0)], 1.0));

        let solution = solve(&model);

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
        assert!((solution.value(a).unwrap() - 1.0).abs() < 1e-6);
        assert!(solution.value(b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_negative_coefficients_stay_off() {
        let mut model = MilpModel::new("test");
        let a = model.add_binary("a", -99.0);
        let b = model.add_binary("b", 1.0);
        model.add_constraint(LinearConstraint::le(vec![(a, 1.0), (b, 1.0)], 2.0));

        let solution = solve(&model);

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(solution.value(a).unwrap().abs() < 1e-6);
        assert!((solution.value(b).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_and_gate() {
        // link = x AND y, with a penalty on link and a reward on each factor.
        let mut model = MilpModel::new("and");
        let x = model.add_binary("x", 5.0);
        let y = model.add_binary("y", 5.0);
        let link = model.add_binary("link", -3.0);
        model.add_constraint(LinearConstraint::le(vec![(link, 1.0), (x, -1.0)], 0.0));
        model.add_constraint(LinearConstraint::le(vec![(link, 1.0), (y, -1.0)], 0.0));
        model.add_constraint(LinearConstraint::ge(
            vec![(link, 1.0), (x, -1.0), (y, -1.0)],
            -1.0,
        ));

        let solution = solve(&model);

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 7.0).abs() < 1e-6);
        assert!((solution.value(link).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_minimize() {
        let mut model = MilpModel::new("min").with_sense(ObjectiveSense::Minimize);
        let a = model.add_binary("a", 4.0);
        let b = model.add_binary("b", 1.0);
        model.add_constraint(LinearConstraint::ge(vec![(a, 1.0), (b, 1.0)], 1.0));

        let solution = solve(&model);

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        let mut model = MilpModel::new("test");
        let a = model.add_binary("a", 1.0);
        model.add_constraint(LinearConstraint::ge(vec![(a, 1.0)], 1.0));
        model.add_constraint(LinearConstraint::le(vec![(a, 1.0)], 0.0));

        let solution = solve(&model);

        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(!solution.is_solution_found());
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_constant_constraint_infeasible() {
        let mut model = MilpModel::new("test");
        model.add_binary("a", 1.0);
        model.add_constraint(LinearConstraint::le(Vec::new(), -1.0));

        assert_eq!(solve(&model).status, SolverStatus::Infeasible);
    }

    #[test]
    fn test_empty_model() {
        let model = MilpModel::new("empty");
        let solution = solve(&model);

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert_eq!(solution.objective_value, Some(0.0));
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_invalid_model() {
        let mut model = MilpModel::new("test");
        let a = model.add_binary("a", 1.0);
        model.add_constraint(LinearConstraint::le(vec![(a, 1.0), (a, 1.0)], 1.0));

        let solution = solve(&model);

        assert_eq!(solution.status, SolverStatus::Error);
        assert!(solution.message.is_some());
    }

    #[test]
    fn test_time_limit_ignored_by_microlp() {
        let mut model = MilpModel::new("test");
        let a = model.add_binary("a", 1.0);
        model.add_constraint(LinearConstraint::le(vec![(a, 1.0)], 1.0));
        let config = SolverConfig::default().with_time_limit(Duration::from_millis(10));

        let solution = MicroLpSolver::new().solve(&model, &config);
        assert_eq!(solution.status, SolverStatus::Optimal);
    }

    #[test]
    fn test_status_has_solution() {
        assert!(SolverStatus::Optimal.has_solution());
        assert!(SolverStatus::Feasible.has_solution());
        assert!(!SolverStatus::Infeasible.has_solution());
        assert!(!SolverStatus::Unbounded.has_solution());
        assert!(!SolverStatus::Error.has_solution());
    }

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert!(config.time_limit.is_none());
        assert!(!config.verbose);
    }
}
