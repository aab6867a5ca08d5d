//! Core roster data types.

use super::config::{window_count, window_days, RosterConfig};
use crate::error::{Result, RosterError};
use std::collections::HashSet;

/// An employee, identified by a stable index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Employee {
    /// Position in the employee list (`0..N`).
    pub index: usize,
    /// Display name.
    pub name: String,
}

/// A day of the planning horizon, identified by a stable index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day {
    /// Position in the day list (`0..D`).
    pub index: usize,
    /// Display label.
    pub label: String,
}

/// An employee's preference for attending on a given day.
///
/// Exactly three levels exist; no other value can be stored in a
/// [`PreferenceMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Preference {
    /// Wants to come in (`yes`, weight 5).
    Strong,
    /// Could come in (`maybe`, weight 1).
    Weak,
    /// Cannot come in (`no`, weight −99). Default for unspecified cells.
    #[default]
    Unavailable,
}

impl Preference {
    pub const STRONG_WEIGHT: i64 = 5;
    pub const WEAK_WEIGHT: i64 = 1;
    pub const UNAVAILABLE_WEIGHT: i64 = -99;

    /// Objective weight of this level.
    pub fn weight(self) -> i64 {
        match self {
            Preference::Strong => Self::STRONG_WEIGHT,
            Preference::Weak => Self::WEAK_WEIGHT,
            Preference::Unavailable => Self::UNAVAILABLE_WEIGHT,
        }
    }

    /// Inverse of [`weight`](Self::weight).
    pub fn from_weight(weight: i64) -> Option<Self> {
        match weight {
            Self::STRONG_WEIGHT => Some(Preference::Strong),
            Self::WEAK_WEIGHT => Some(Preference::Weak),
            Self::UNAVAILABLE_WEIGHT => Some(Preference::Unavailable),
            _ => None,
        }
    }

    /// Parses a symbolic code: `yes`, `maybe`, `no` (case-insensitive,
    /// surrounding whitespace ignored). An empty cell means `no`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() || code.eq_ignore_ascii_case("no") {
            Some(Preference::Unavailable)
        } else if code.eq_ignore_ascii_case("yes") {
            Some(Preference::Strong)
        } else if code.eq_ignore_ascii_case("maybe") {
            Some(Preference::Weak)
        } else {
            None
        }
    }

    /// Canonical symbolic code.
    pub fn code(self) -> &'static str {
        match self {
            Preference::Strong => "yes",
            Preference::Weak => "maybe",
            Preference::Unavailable => "no",
        }
    }
}

/// Employee × day preference levels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Preference>,
}

impl PreferenceMatrix {
    /// Creates a matrix with every cell [`Preference::Unavailable`].
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Preference::Unavailable; rows * cols],
        }
    }

    /// Builds a matrix from rows of exactly `cols` cells each.
    ///
    /// `cols` is explicit so an empty row list still yields a `0 × cols`
    /// matrix.
    pub fn from_rows(rows: Vec<Vec<Preference>>, cols: usize) -> Result<Self> {
        let n_rows = rows.len();
        let mut cells = Vec::with_capacity(n_rows * cols);
        for row in rows {
            if row.len() != cols {
                return Err(RosterError::DimensionMismatch {
                    what: "preference matrix row",
                    expected: (n_rows, cols),
                    found: (n_rows, row.len()),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            cells,
        })
    }

    /// Builds a matrix from raw integer weights.
    ///
    /// Every value must be one of 5, 1 or −99.
    pub fn from_weights(rows: &[Vec<i64>], cols: usize) -> Result<Self> {
        let mut levels = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let mut level_row = Vec::with_capacity(row.len());
            for (c, &weight) in row.iter().enumerate() {
                let level =
                    Preference::from_weight(weight).ok_or_else(|| RosterError::InvalidPreference {
                        row: r,
                        col: c,
                        text: weight.to_string(),
                    })?;
                level_row.push(level);
            }
            levels.push(level_row);
        }
        Self::from_rows(levels, cols)
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, employee: usize, day: usize) -> Preference {
        self.cells[employee * self.cols + day]
    }

    pub fn set(&mut self, employee: usize, day: usize, level: Preference) {
        self.cells[employee * self.cols + day] = level;
    }

    /// Objective weight of cell `(employee, day)`.
    pub fn weight(&self, employee: usize, day: usize) -> i64 {
        self.get(employee, day).weight()
    }
}

/// Largest accepted connection weight magnitude.
///
/// Keeps every objective term exact as an `f64` coefficient and the
/// recomputed objective far from `i64` overflow.
pub const MAX_CONNECTION_WEIGHT: i64 = 1 << 31;

/// Whether `weight` lies within `±MAX_CONNECTION_WEIGHT`.
pub fn connection_weight_in_range(weight: i64) -> bool {
    (-MAX_CONNECTION_WEIGHT..=MAX_CONNECTION_WEIGHT).contains(&weight)
}

/// Symmetric pairwise collaboration weights.
///
/// Only the upper triangle (`row < col`) is stored and read; writes to a
/// lower-triangle cell land on its mirror, and the diagonal is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionMatrix {
    size: usize,
    cells: Vec<i64>,
}

impl ConnectionMatrix {
    /// Creates an all-zero `size × size` matrix.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Builds a matrix from a full square grid.
    ///
    /// Lower-triangle and diagonal entries are ignored. Upper-triangle
    /// weights beyond [`MAX_CONNECTION_WEIGHT`] are rejected.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let size = rows.len();
        let mut matrix = Self::new(size);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(RosterError::DimensionMismatch {
                    what: "connection matrix",
                    expected: (size, size),
                    found: (size, row.len()),
                });
            }
            for (c, &weight) in row.iter().enumerate().skip(r + 1) {
                if !connection_weight_in_range(weight) {
                    return Err(RosterError::InvalidConnection {
                        row: r,
                        col: c,
                        text: weight.to_string(),
                    });
                }
                matrix.cells[r * size + c] = weight;
            }
        }
        Ok(matrix)
    }

    /// `(size, size)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.size, self.size)
    }

    /// Weight between two employees, read from the upper triangle.
    pub fn weight(&self, a: usize, b: usize) -> i64 {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => self.cells[a * self.size + b],
            std::cmp::Ordering::Greater => self.cells[b * self.size + a],
            std::cmp::Ordering::Equal => 0,
        }
    }

    /// Sets the weight of the unordered pair `{a, b}`. Ignored when `a == b`.
    pub fn set(&mut self, a: usize, b: usize, weight: i64) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        if lo != hi {
            self.cells[lo * self.size + hi] = weight;
        }
    }
}

/// The full input of one roster solve.
///
/// Fields are public; [`validate`](Self::validate) checks that the
/// matrices agree with the employee and day lists.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterProblem {
    pub employees: Vec<Employee>,
    pub days: Vec<Day>,
    pub preferences: PreferenceMatrix,
    pub connections: ConnectionMatrix,
}

impl RosterProblem {
    /// Creates a problem from display names and labels.
    pub fn new<S: Into<String>, T: Into<String>>(
        employee_names: impl IntoIterator<Item = S>,
        day_labels: impl IntoIterator<Item = T>,
        preferences: PreferenceMatrix,
        connections: ConnectionMatrix,
    ) -> Self {
        let employees = employee_names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Employee {
                index,
                name: name.into(),
            })
            .collect();
        let days = day_labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Day {
                index,
                label: label.into(),
            })
            .collect();
        Self {
            employees,
            days,
            preferences,
            connections,
        }
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Checks matrix shapes against the employee/day counts, connection
    /// weight range, and that employee names are unique.
    pub fn validate(&self) -> Result<()> {
        let (n, d) = (self.employee_count(), self.day_count());
        if self.preferences.shape() != (n, d) {
            return Err(RosterError::DimensionMismatch {
                what: "preference matrix",
                expected: (n, d),
                found: self.preferences.shape(),
            });
        }
        if self.connections.shape() != (n, n) {
            return Err(RosterError::DimensionMismatch {
                what: "connection matrix",
                expected: (n, n),
                found: self.connections.shape(),
            });
        }
        if let Some((a, b)) = self
            .pairs()
            .find(|&(a, b)| !connection_weight_in_range(self.connections.weight(a, b)))
        {
            return Err(RosterError::InvalidConnection {
                row: a,
                col: b,
                text: self.connections.weight(a, b).to_string(),
            });
        }
        let mut names = HashSet::with_capacity(n);
        for employee in &self.employees {
            if !names.insert(employee.name.as_str()) {
                return Err(RosterError::DuplicateEmployee(employee.name.clone()));
            }
        }
        Ok(())
    }

    /// Unordered employee pairs `(e1, e2)` with `e1 < e2`, in
    /// lexicographic order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.employee_count();
        (0..n).flat_map(move |a| (a + 1..n).map(move |b| (a, b)))
    }
}

/// A broken roster rule found by [`AttendanceAssignment::violations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// More attendees than spots on `day`.
    Capacity { day: usize, attendees: usize },
    /// An employee exceeds the visit cap within `window`.
    Visits {
        employee: usize,
        window: usize,
        visits: usize,
    },
}

/// Employee × day attendance produced by a solve. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttendanceAssignment {
    employees: usize,
    days: usize,
    cells: Vec<bool>,
}

impl AttendanceAssignment {
    pub(crate) fn from_cells(employees: usize, days: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), employees * days);
        Self {
            employees,
            days,
            cells,
        }
    }

    /// `(employees, days)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.employees, self.days)
    }

    /// Whether `employee` is scheduled on `day`.
    pub fn attends(&self, employee: usize, day: usize) -> bool {
        self.cells[employee * self.days + day]
    }

    /// Attendance of one employee across all days.
    pub fn row(&self, employee: usize) -> &[bool] {
        &self.cells[employee * self.days..(employee + 1) * self.days]
    }

    /// Number of employees scheduled on `day`.
    pub fn day_count(&self, day: usize) -> usize {
        (0..self.employees)
            .filter(|&e| self.attends(e, day))
            .count()
    }

    /// Number of days `employee` attends within `window`.
    pub fn visits_in_window(&self, employee: usize, window: usize, window_length: usize) -> usize {
        window_days(window, self.days, window_length)
            .filter(|&d| self.attends(employee, d))
            .count()
    }

    /// Total days `employee` attends.
    pub fn total_visits(&self, employee: usize) -> usize {
        self.row(employee).iter().filter(|&&a| a).count()
    }

    /// Total scheduled employee-days.
    pub fn total_attendance(&self) -> usize {
        self.cells.iter().filter(|&&a| a).count()
    }

    /// Whether both employees attend `day` (the value a link variable takes).
    pub fn together(&self, a: usize, b: usize, day: usize) -> bool {
        self.attends(a, day) && self.attends(b, day)
    }

    /// Objective value of this assignment, recomputed from scratch:
    /// preference weights of attended cells plus connection weights of
    /// pairs attending together.
    ///
    /// Saturates at the `i64` bounds; weights accepted by
    /// [`RosterProblem::validate`] never get there.
    pub fn objective(&self, problem: &RosterProblem) -> i64 {
        let mut total = 0i64;
        for day in 0..self.days {
            for e in 0..self.employees {
                if self.attends(e, day) {
                    total = total.saturating_add(problem.preferences.weight(e, day));
                }
            }
            for (a, b) in problem.pairs() {
                if self.together(a, b, day) {
                    total = total.saturating_add(problem.connections.weight(a, b));
                }
            }
        }
        total
    }

    /// Capacity and visit-cap violations under `config`. Empty for any
    /// assignment produced by a successful solve.
    pub fn violations(&self, config: &RosterConfig) -> Vec<Violation> {
        let mut found = Vec::new();
        let spots = config.num_spots.max(0) as usize;
        for day in 0..self.days {
            let attendees = self.day_count(day);
            if attendees > spots {
                found.push(Violation::Capacity { day, attendees });
            }
        }
        let cap = config.max_visits_per_window.max(0) as usize;
        let w = config.window_len();
        for employee in 0..self.employees {
            for window in 0..window_count(self.days, w) {
                let visits = self.visits_in_window(employee, window, w);
                if visits > cap {
                    found.push(Violation::Visits {
                        employee,
                        window,
                        visits,
                    });
                }
            }
        }
        found
    }

    /// Tabular export: a header row (`""` followed by day labels) and one
    /// row per employee (name followed by `0`/`1` cells).
    pub fn to_table(&self, problem: &RosterProblem) -> Vec<Vec<String>> {
        self.to_labeled_table(
            problem.employees.iter().map(|e| e.name.as_str()),
            problem.days.iter().map(|d| d.label.as_str()),
        )
    }

    /// [`to_table`](Self::to_table) with caller-supplied row and column
    /// labels. Rows without a label are left out.
    pub fn to_labeled_table<'a>(
        &self,
        employee_names: impl IntoIterator<Item = &'a str>,
        day_labels: impl IntoIterator<Item = &'a str>,
    ) -> Vec<Vec<String>> {
        let mut table = Vec::with_capacity(self.employees + 1);
        let mut header = Vec::with_capacity(self.days + 1);
        header.push(String::new());
        header.extend(day_labels.into_iter().map(str::to_string));
        table.push(header);

        for (employee, name) in employee_names.into_iter().take(self.employees).enumerate() {
            let mut row = Vec::with_capacity(self.days + 1);
            row.push(name.to_string());
            row.extend(
                self.row(employee)
                    .iter()
                    .map(|&a| if a { "1" } else { "0" }.to_string()),
            );
            table.push(row);
        }
        table
    }
}
