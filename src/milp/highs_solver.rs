//! HiGHS backend with time-limit support.

use super::model::{MilpModel, ObjectiveSense, Sense};
use super::solver::{
    panic_message, report, settle_trivial, MilpSolution, MilpSolver, SolverConfig, SolverStatus,
};
use highs::{HighsModelStatus, RowProblem};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Tolerance used to accept an incumbent left behind by an early stop.
const INCUMBENT_TOLERANCE: f64 = 1e-6;

/// Branch-and-cut solver backed by the HiGHS library.
///
/// Honors [`SolverConfig::time_limit`]. A solve stopped by the limit
/// returns [`SolverStatus::Feasible`] when HiGHS holds an incumbent that
/// satisfies the model, and [`SolverStatus::Error`] when it does not.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_roster::milp::{HighsSolver, SolverConfig};
/// use u_roster::model::toy::{toy_config, toy_problem};
/// use u_roster::roster::RosterRunner;
///
/// let config = SolverConfig::default().with_time_limit(Duration::from_secs(10));
/// let result =
///     RosterRunner::solve_with(&HighsSolver::new(), &toy_problem(), &toy_config(), &config)
///         .unwrap();
/// assert_eq!(result.objective, 125);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> MilpSolution {
        if let Err(reason) = model.validate() {
            return MilpSolution::failed(SolverStatus::Error, reason);
        }
        if let Some(solution) = settle_trivial(model) {
            report(self.name(), model, &solution, config);
            return solution;
        }

        let start_time = Instant::now();

        let mut problem = RowProblem::new();
        let cols: Vec<highs::Col> = model
            .vars()
            .iter()
            .map(|var| problem.add_integer_column(var.objective, 0..=1))
            .collect();

        for constraint in model.constraints() {
            if constraint.terms.is_empty() {
                continue;
            }
            let row: Vec<(highs::Col, f64)> = constraint
                .terms
                .iter()
                .map(|&(var, coef)| (cols[var.index()], coef))
                .collect();
            let rhs = constraint.rhs;
            match constraint.sense {
                Sense::Le => problem.add_row(..=rhs, row),
                Sense::Ge => problem.add_row(rhs.., row),
                Sense::Eq => problem.add_row(rhs..=rhs, row),
            }
        }

        let sense = match model.sense() {
            ObjectiveSense::Maximize => highs::Sense::Maximise,
            ObjectiveSense::Minimize => highs::Sense::Minimise,
        };
        let mut highs_model = problem.optimise(sense);
        highs_model.set_option("output_flag", config.verbose);
        if let Some(limit) = config.time_limit {
            highs_model.set_option("time_limit", limit.as_secs_f64());
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let solved = highs_model.solve();
            (
                solved.status(),
                solved.get_solution().columns().to_vec(),
                solved.objective_value(),
            )
        }));
        let solve_time_ms = start_time.elapsed().as_millis() as u64;

        let solution = match outcome {
            Ok((status, values, objective)) => MilpSolution {
                solve_time_ms,
                ..classify(model, status, values, objective)
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

/// Maps a HiGHS verdict and its column values onto a [`MilpSolution`].
fn classify(
    model: &MilpModel,
    status: HighsModelStatus,
    values: Vec<f64>,
    objective: f64,
) -> MilpSolution {
    match status {
        HighsModelStatus::Optimal => MilpSolution {
            status: SolverStatus::Optimal,
            objective_value: Some(objective),
            values,
            message: None,
            solve_time_ms: 0,
        },
        HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
            incumbent(model, values).unwrap_or_else(|| {
                MilpSolution::failed(
                    SolverStatus::Error,
                    format!("stopped ({status:?}) before a feasible solution was found"),
                )
            })
        }
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            MilpSolution::empty(SolverStatus::Infeasible)
        }
        HighsModelStatus::Unbounded => MilpSolution::empty(SolverStatus::Unbounded),
        other => MilpSolution::failed(SolverStatus::Error, format!("HiGHS status {other:?}")),
    }
}

/// Accepts `values` as a `Feasible` solution if they are integral and
/// satisfy every constraint.
fn incumbent(model: &MilpModel, values: Vec<f64>) -> Option<MilpSolution> {
    let integral = values
        .iter()
        .all(|&v| v.abs() <= INCUMBENT_TOLERANCE || (v - 1.0).abs() <= INCUMBENT_TOLERANCE);
    if values.len() != model.var_count()
        || !integral
        || !model.is_feasible(&values, INCUMBENT_TOLERANCE)
    {
        return None;
    }
    Some(MilpSolution {
        status: SolverStatus::Feasible,
        objective_value: Some(model.objective_value(&values)),
        values,
        message: None,
        solve_time_ms: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::milp::LinearConstraint;
    use crate::model::toy::{random_problem, toy_config, toy_problem, TOY_OPTIMUM};
    use crate::model::RosterConfig;
    use crate::roster::RosterRunner;
    use std::time::Duration;

    fn knapsack() -> MilpModel {
        let mut model = MilpModel::new("pick");
        let a = model.add_binary("a", 3.0);
        let b = model.add_binary("b", 2.0);
        let c = model.add_binary("c", 2.0);
        model.add_constraint(LinearConstraint::le(
            vec![(a, 2.0), (b, 1.0), (c, 1.0)],
            2.0,
        ));
        model
    }

    #[test]
    fn test_optimal() {
        let model = knapsack();
        let solution = HighsSolver::new().solve(&model, &SolverConfig::default());

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 4.0).abs() < 1e-6);
        assert!(model.is_feasible(&solution.values, 1e-6));
    }

    #[test]
    fn test_infeasible() {
        let mut model = MilpModel::new("test");
        let a = model.add_binary("a", 1.0);
        model.add_constraint(LinearConstraint::ge(vec![(a, 1.0)], 1.0));
        model.add_constraint(LinearConstraint::le(vec![(a, 1.0)], 0.0));

        let solution = HighsSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_toy_optimum() {
        let result = RosterRunner::solve_with(
            &HighsSolver::new(),
            &toy_problem(),
            &toy_config(),
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.objective, TOY_OPTIMUM);
    }

    #[test]
    fn test_time_limit_bounds_large_solve() {
        let problem = random_problem(40, 20, 7);
        let config = RosterConfig::new(12, 3);
        let limit = Duration::from_millis(50);
        let solver_config = SolverConfig::default().with_time_limit(limit);

        let start = Instant::now();
        let outcome = RosterRunner::solve_with(&HighsSolver::new(), &problem, &config, &solver_config);
        let elapsed = start.elapsed();

        // Model construction and HiGHS setup add overhead on top of the limit.
        assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
        match outcome {
            Ok(result) => {
                assert!(result.status.has_solution());
                assert!(result.assignment.violations(&config).is_empty());
            }
            Err(err) => assert!(matches!(
                err,
                RosterError::NotSolved {
                    status: SolverStatus::Error,
                    ..
                }
            )),
        }
    }

    #[test]
    fn test_stop_with_incumbent_is_feasible() {
        let model = knapsack();
        let solution = classify(
            &model,
            HighsModelStatus::ReachedTimeLimit,
            vec![0.0, 1.0, 1.0],
            0.0,
        );
        assert_eq!(solution.status, SolverStatus::Feasible);
        assert_eq!(solution.objective_value, Some(4.0));
    }

    #[test]
    fn test_stop_without_incumbent_is_error() {
        let model = knapsack();
        for values in [vec![1.0, 1.0, 1.0], vec![0.5, 0.0, 0.0], Vec::new()] {
            let solution = classify(&model, HighsModelStatus::ReachedTimeLimit, values, 0.0);
            assert_eq!(solution.status, SolverStatus::Error);
            assert!(solution.message.is_some());
        }
    }
}
