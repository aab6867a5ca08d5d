//! Roster formulation and solve pipeline.
//!
//! # Pipeline
//!
//! 1. [`build_model`]: [`RosterProblem`](crate::model::RosterProblem) +
//!    [`RosterConfig`](crate::model::RosterConfig) → [`RosterModel`]
//! 2. [`MilpSolver::solve`](crate::milp::MilpSolver::solve) on
//!    [`RosterModel::model`]
//! 3. [`extract_assignment`]: solution → attendance grid + objective
//!
//! [`RosterRunner`] runs all three steps.

mod builder;
mod extract;
mod runner;

pub use builder::{build_model, pair_index, ModelStats, RosterModel};
pub use extract::{extract_assignment, to_binary, Extraction, BINARY_TOLERANCE};
pub use runner::{RosterResult, RosterRunner};
