//! Binary integer programming layer.
//!
//! Provides a solver-independent model for binary MILPs (maximize or
//! minimize a linear objective over 0/1 variables subject to linear
//! constraints) and a narrow solver interface.
//!
//! # Key Components
//!
//! - **Model**: [`MilpModel`]: arena of [`BinaryVar`]s addressed by
//!   [`VarId`], plus [`LinearConstraint`]s
//! - **Solver**: [`MilpSolver`] trait: submit a model, get a
//!   [`MilpSolution`] with a [`SolverStatus`]
//! - **Backend**: [`MicroLpSolver`]: pure-Rust branch-and-bound via `microlp`
//! - **Backend** (feature `highs`): `HighsSolver`: HiGHS branch-and-cut,
//!   honors time limits
//!
//! # Design
//!
//! The model knows nothing about rosters. Other backends implement
//! [`MilpSolver`] against the same [`MilpModel`].

#[cfg(feature = "highs")]
mod highs_solver;
mod model;
mod solver;

#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;

pub use model::{BinaryVar, LinearConstraint, MilpModel, ObjectiveSense, Sense, VarId};
pub use solver::{MicroLpSolver, MilpSolution, MilpSolver, SolverConfig, SolverStatus};
