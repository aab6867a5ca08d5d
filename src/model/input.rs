//! Decoding of raw tabular input.
//!
//! A spreadsheet or CSV reader hands over plain string grids; this module
//! turns them into a [`RosterProblem`].

use super::types::{
    connection_weight_in_range, ConnectionMatrix, Preference, PreferenceMatrix, RosterProblem,
};
use crate::error::{Result, RosterError};

/// Parses one connection cell. Empty cells are 0.
///
/// Returns `None` for non-integers and for weights beyond
/// [`MAX_CONNECTION_WEIGHT`](super::MAX_CONNECTION_WEIGHT).
pub fn parse_connection(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    text.parse().ok().filter(|&w| connection_weight_in_range(w))
}

fn check_rows<S>(what: &'static str, rows: &[Vec<S>], expected: (usize, usize)) -> Result<()> {
    if rows.len() != expected.0 {
        return Err(RosterError::DimensionMismatch {
            what,
            expected,
            found: (rows.len(), rows.iter().map(Vec::len).max().unwrap_or(0)),
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() > expected.1) {
        return Err(RosterError::DimensionMismatch {
            what,
            expected,
            found: (rows.len(), row.len()),
        });
    }
    Ok(())
}

impl RosterProblem {
    /// Builds a problem from string tables.
    ///
    /// - `preference_rows`: one row per employee, one cell per day, each
    ///   `yes`/`maybe`/`no` (case-insensitive; empty = `no`).
    /// - `connection_rows`: one row per employee, one integer cell per
    ///   employee (empty = 0). Only cells above the diagonal are used.
    ///
    /// Short rows are padded with empty cells; long rows and a wrong row
    /// count are dimension errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_roster::model::{Preference, RosterProblem};
    ///
    /// let problem = RosterProblem::from_tables(
    ///     &["Anna", "Ben"],
    ///     &["Mon", "Tue"],
    ///     &[vec!["yes", "maybe"], vec!["NO"]],
    ///     &[vec!["", "3"], vec!["", ""]],
    /// )
    /// .unwrap();
    /// assert_eq!(problem.preferences.get(1, 1), Preference::Unavailable);
    /// assert_eq!(problem.connections.weight(0, 1), 3);
    /// ```
    pub fn from_tables<S: AsRef<str>>(
        employees: &[S],
        days: &[S],
        preference_rows: &[Vec<S>],
        connection_rows: &[Vec<S>],
    ) -> Result<Self> {
        let (n, d) = (employees.len(), days.len());
        check_rows("preference table", preference_rows, (n, d))?;
        check_rows("connection table", connection_rows, (n, n))?;

        let mut preferences = PreferenceMatrix::new(n, d);
        for (row, cells) in preference_rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let text = cell.as_ref();
                let level =
                    Preference::from_code(text).ok_or_else(|| RosterError::InvalidPreference {
                        row,
                        col,
                        text: text.to_string(),
                    })?;
                preferences.set(row, col, level);
            }
        }

        let mut connections = ConnectionMatrix::new(n);
        for (row, cells) in connection_rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let text = cell.as_ref();
                let weight = parse_connection(text).ok_or_else(|| RosterError::InvalidConnection {
                    row,
                    col,
                    text: text.to_string(),
                })?;
                if row < col {
                    connections.set(row, col, weight);
                }
            }
        }

        let problem = Self::new(
            employees.iter().map(|e| e.as_ref().trim().to_string()),
            days.iter().map(|d| d.as_ref().trim().to_string()),
            preferences,
            connections,
        );
        problem.validate()?;
        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<&'static str> {
        vec!["Anna", "Ben", "Clara"]
    }

    fn days() -> Vec<&'static str> {
        vec!["Mon", "Tue"]
    }

    #[test]
    fn test_parse_connection() {
        assert_eq!(parse_connection(""), Some(0));
        assert_eq!(parse_connection(" 12 "), Some(12));
        assert_eq!(parse_connection("-7"), Some(-7));
        assert_eq!(parse_connection("1.5"), None);
        assert_eq!(parse_connection("x"), None);
        assert_eq!(parse_connection("2147483648"), Some(1 << 31));
        assert_eq!(parse_connection("-2147483648"), Some(-(1 << 31)));
        assert_eq!(parse_connection("2147483649"), None);
        assert_eq!(parse_connection("9223372036854775807"), None);
    }

    #[test]
    fn test_from_tables() {
        let problem = RosterProblem::from_tables(
            &names(),
            &days(),
            &[vec!["Yes", "no"], vec!["maybe", "YES"], vec!["", " maybe "]],
            &[vec!["", "4", "-2"], vec!["99", "", "1"], vec!["", "", ""]],
        )
        .unwrap();

        assert_eq!(problem.employee_count(), 3);
        assert_eq!(problem.day_count(), 2);
        assert_eq!(problem.preferences.get(0, 0), Preference::Strong);
        assert_eq!(problem.preferences.get(1, 0), Preference::Weak);
        assert_eq!(problem.preferences.get(2, 0), Preference::Unavailable);
        assert_eq!(problem.preferences.get(2, 1), Preference::Weak);
        assert_eq!(problem.connections.weight(0, 1), 4);
        assert_eq!(problem.connections.weight(0, 2), -2);
        assert_eq!(problem.connections.weight(1, 2), 1);
    }

    #[test]
    fn test_short_rows_default() {
        let problem = RosterProblem::from_tables(
            &names(),
            &days(),
            &[vec!["yes"], vec![], vec!["maybe"]],
            &[vec![], vec![], vec![]],
        )
        .unwrap();

        assert_eq!(problem.preferences.get(0, 1), Preference::Unavailable);
        assert_eq!(problem.preferences.get(1, 0), Preference::Unavailable);
        assert_eq!(problem.connections.weight(0, 2), 0);
    }

    #[test]
    fn test_wrong_row_count() {
        let err = RosterProblem::from_tables(
            &names(),
            &days(),
            &[vec!["yes", "no"]],
            &[vec![], vec![], vec![]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RosterError::DimensionMismatch {
                what: "preference table",
                expected: (3, 2),
                found: (1, 2),
            }
        );
    }

    #[test]
    fn test_row_too_long() {
        let err = RosterProblem::from_tables(
            &names(),
            &days(),
            &[vec![], vec![], vec![]],
            &[vec!["", "1", "2", "3"], vec![], vec![]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RosterError::DimensionMismatch {
                what: "connection table",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_code() {
        let err = RosterProblem::from_tables(
            &names(),
            &days(),
            &[vec![], vec!["yes", "sometimes"], vec![]],
            &[vec![], vec![], vec![]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RosterError::InvalidPreference {
                row: 1,
                col: 1,
                text: "sometimes".into()
            }
        );
    }

    #[test]
    fn test_invalid_connection() {
        let err = RosterProblem::from_tables(
            &names(),
            &days(),
            &[vec![], vec![], vec![]],
            &[vec!["", "high"], vec![], vec![]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RosterError::InvalidConnection { row: 0, col: 1, .. }
        ));
    }

    #[test]
    fn test_huge_connection_rejected() {
        let err = RosterProblem::from_tables(
            &["Anna", "Ben"],
            &["Mon"],
            &[vec!["yes"], vec!["yes"]],
            &[vec!["", "9223372036854775807"], vec![]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RosterError::InvalidConnection {
                row: 0,
                col: 1,
                text: "9223372036854775807".into()
            }
        );
    }

    #[test]
    fn test_duplicate_employee() {
        let err = RosterProblem::from_tables(
            &["Anna", " Anna "],
            &["Mon"],
            &[vec![], vec![]],
            &[vec![], vec![]],
        )
        .unwrap_err();
        assert_eq!(err, RosterError::DuplicateEmployee("Anna".into()));
    }
}
