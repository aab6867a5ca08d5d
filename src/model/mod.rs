//! Roster data model.
//!
//! Typed in-memory representation of one scheduling instance:
//!
//! - **Entities**: [`Employee`], [`Day`]
//! - **Scores**: [`PreferenceMatrix`] of [`Preference`] levels and a
//!   symmetric [`ConnectionMatrix`] of pairwise weights
//! - **Input**: [`RosterProblem`], decodable from string tables via
//!   [`RosterProblem::from_tables`]
//! - **Configuration**: [`RosterConfig`] plus the positional window
//!   functions [`window_of`], [`window_count`], [`window_days`]
//! - **Output**: [`AttendanceAssignment`]
//!
//! Everything here is plain data; the optimization itself lives in
//! [`crate::roster`].

mod config;
mod input;
pub mod toy;
mod types;

pub use config::{window_count, window_days, window_of, RosterConfig, DEFAULT_WINDOW_LENGTH};
pub use input::parse_connection;
pub use types::{
    connection_weight_in_range, AttendanceAssignment, ConnectionMatrix, Day, Employee, Preference,
    PreferenceMatrix, RosterProblem, Violation, MAX_CONNECTION_WEIGHT,
};
