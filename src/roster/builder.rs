//! Construction of the roster MILP.
//!
//! Variables:
//!
//! - `attend[e,d]`: employee `e` comes in on day `d`
//! - `link[p,d]`: both employees of pair `p = (e1, e2)`, `e1 < e2`,
//!   come in on day `d`
//!
//! Objective (maximize):
//!
//! ```text
//! Σ pref[e,d]·attend[e,d] + Σ conn[e1,e2]·link[p,d]
//! ```
//!
//! Constraints: per-day capacity, per-window visit cap, and the AND-gate
//! linearization tying each `link` to its two `attend` factors:
//!
//! ```text
//! link ≤ attend[e1,d]
//! link ≤ attend[e2,d]
//! link ≥ attend[e1,d] + attend[e2,d] − 1
//! ```
//!
//! The three inequalities admit exactly the AND truth table, so they hold
//! whatever the sign of the connection weight.

use crate::error::Result;
use crate::milp::{LinearConstraint, MilpModel, VarId};
use crate::model::{window_count, window_days, RosterConfig, RosterProblem};
use tracing::debug;

/// Sizes of the built model, by variable and constraint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelStats {
    /// `N·D`
    pub attend_vars: usize,
    /// `N(N−1)/2·D`
    pub link_vars: usize,
    /// One per day.
    pub capacity_constraints: usize,
    /// One per employee and window.
    pub visit_constraints: usize,
    /// Three per link variable.
    pub linearization_constraints: usize,
}

impl ModelStats {
    pub fn total_vars(&self) -> usize {
        self.attend_vars + self.link_vars
    }

    pub fn total_constraints(&self) -> usize {
        self.capacity_constraints + self.visit_constraints + self.linearization_constraints
    }
}

/// A built roster model: the MILP plus the arenas mapping employees,
/// days and pairs to variable ids.
#[derive(Debug, Clone)]
pub struct RosterModel {
    model: MilpModel,
    employees: usize,
    days: usize,
    /// `attend[e * days + d]`
    attend: Vec<VarId>,
    /// `link[p * days + d]`
    link: Vec<VarId>,
    stats: ModelStats,
}

impl RosterModel {
    /// The underlying MILP.
    pub fn model(&self) -> &MilpModel {
        &self.model
    }

    /// Mutable access for callers that add their own constraints before
    /// solving.
    pub fn model_mut(&mut self) -> &mut MilpModel {
        &mut self.model
    }

    pub fn employees(&self) -> usize {
        self.employees
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn stats(&self) -> ModelStats {
        self.stats
    }

    /// Attendance variable of `(employee, day)`.
    pub fn attend_var(&self, employee: usize, day: usize) -> VarId {
        self.attend[employee * self.days + day]
    }

    /// Link variable of the pair `{a, b}` on `day`, or `None` when `a == b`.
    pub fn link_var(&self, a: usize, b: usize, day: usize) -> Option<VarId> {
        let pair = pair_index(a, b, self.employees)?;
        Some(self.link[pair * self.days + day])
    }
}

/// Position of the unordered pair `{a, b}` in the lexicographic
/// enumeration `(0,1), (0,2), …, (0,n−1), (1,2), …`.
///
/// Returns `None` for `a == b` or an index out of range.
pub fn pair_index(a: usize, b: usize, n: usize) -> Option<usize> {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    if lo == hi || hi >= n {
        return None;
    }
    // Pairs starting before `lo`: (n-1) + (n-2) + … + (n-lo)
    Some(lo * (2 * n - lo - 1) / 2 + (hi - lo - 1))
}

/// Builds the roster MILP for `problem` under `config`.
///
/// Fails before creating anything if the configuration is invalid or the
/// matrices disagree with the employee/day counts.
pub fn build_model(problem: &RosterProblem, config: &RosterConfig) -> Result<RosterModel> {
    config.validate()?;
    problem.validate()?;

    let n = problem.employee_count();
    let d_count = problem.day_count();
    let mut model = MilpModel::new("roster");

    let mut attend = Vec::with_capacity(n * d_count);
    for employee in &problem.employees {
        for day in &problem.days {
            let weight = problem.preferences.weight(employee.index, day.index);
            attend.push(model.add_binary(
                format!("attend[{},{}]", employee.name, day.label),
                weight as f64,
            ));
        }
    }

    let pairs: Vec<(usize, usize)> = problem.pairs().collect();
    let mut link = Vec::with_capacity(pairs.len() * d_count);
    for &(a, b) in &pairs {
        let weight = problem.connections.weight(a, b) as f64;
        for day in &problem.days {
            link.push(model.add_binary(
                format!(
                    "link[{},{},{}]",
                    problem.employees[a].name, problem.employees[b].name, day.label
                ),
                weight,
            ));
        }
    }

    let at = |e: usize, d: usize| attend[e * d_count + d];
    let mut stats = ModelStats {
        attend_vars: attend.len(),
        link_vars: link.len(),
        ..ModelStats::default()
    };

    // Capacity
    let spots = config.num_spots as f64;
    if n > 0 {
        for d in 0..d_count {
            let terms = (0..n).map(|e| (at(e, d), 1.0)).collect();
            model.add_constraint(LinearConstraint::le(terms, spots));
            stats.capacity_constraints += 1;
        }
    }

    // Visit frequency, including a shorter trailing window
    let cap = config.max_visits_per_window as f64;
    let w = config.window_len();
    for e in 0..n {
        for window in 0..window_count(d_count, w) {
            let terms = window_days(window, d_count, w)
                .map(|d| (at(e, d), 1.0))
                .collect();
            model.add_constraint(LinearConstraint::le(terms, cap));
            stats.visit_constraints += 1;
        }
    }

    // AND-gate linearization
    for (p, &(a, b)) in pairs.iter().enumerate() {
        for d in 0..d_count {
            let l = link[p * d_count + d];
            let (xa, xb) = (at(a, d), at(b, d));
            model.add_constraint(LinearConstraint::le(vec![(l, 1.0), (xa, -1.0)], 0.0));
            model.add_constraint(LinearConstraint::le(vec![(l, 1.0), (xb, -1.0)], 0.0));
            model.add_constraint(LinearConstraint::ge(
                vec![(l, 1.0), (xa, -1.0), (xb, -1.0)],
                -1.0,
            ));
            stats.linearization_constraints += 3;
        }
    }

    debug!(
        employees = n,
        days = d_count,
        vars = stats.total_vars(),
        constraints = stats.total_constraints(),
        "roster model built"
    );

    Ok(RosterModel {
        model,
        employees: n,
        days: d_count,
        attend,
        link,
        stats,
    })
}
