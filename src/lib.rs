//! Office attendance roster optimization.
//!
//! Decides which employees come to the office on which days. Each
//! employee states a preference per day, each pair of employees has a
//! connection weight, and the office has a fixed number of desks. The
//! roster maximizes total preference plus the connection weight of every
//! pair that shares a day, subject to:
//!
//! - **Capacity**: at most `num_spots` employees per day.
//! - **Visit cap**: at most `max_visits_per_window` days per employee in
//!   each window of `window_length` consecutive days.
//!
//! The problem is stated as a binary MILP. Pair co-attendance is
//! linearized with one AND-gate variable per pair and day.
//!
//! # Modules
//!
//! - [`model`]: employees, days, preference and connection matrices,
//!   configuration, tabular input, datasets.
//! - [`milp`]: solver-independent binary MILP model and the
//!   [`MilpSolver`](milp::MilpSolver) trait with a `microlp` backend.
//! - [`roster`]: model builder, result extraction, and the end-to-end
//!   [`RosterRunner`](roster::RosterRunner).
//! - [`error`]: [`RosterError`](error::RosterError).
//!
//! # Architecture
//!
//! This crate sits at Layer 3 (Domain) in the U-Engine ecosystem. The
//! MILP layer knows nothing about rosters; the roster layer never talks
//! to a concrete solver except through the trait.

pub mod error;
pub mod milp;
pub mod model;
pub mod roster;

pub use error::{Result, RosterError};
