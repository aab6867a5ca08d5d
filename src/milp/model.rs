//! Solver-independent binary MILP model.

use std::collections::HashSet;

/// Identifier of a variable inside a [`MilpModel`].
///
/// Ids are dense: the `n`-th variable added gets index `n`, so solver
/// values can be stored in a plain `Vec<f64>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of this variable in the model's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A binary decision variable with its objective coefficient.
#[derive(Debug, Clone)]
pub struct BinaryVar {
    /// Human-readable name, used in logs and diagnostics.
    pub name: String,
    /// Coefficient of this variable in the objective.
    pub objective: f64,
}

/// Relation between the left- and right-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveSense {
    #[default]
    Maximize,
    Minimize,
}

/// A linear constraint `Σ coef·var  (<= | >= | ==)  rhs`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// `(variable, coefficient)` pairs. Each variable may appear once.
    pub terms: Vec<(VarId, f64)>,
    /// Comparison operator.
    pub sense: Sense,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn le(terms: Vec<(VarId, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            sense: Sense::Le,
            rhs,
        }
    }

    pub fn ge(terms: Vec<(VarId, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            sense: Sense::Ge,
            rhs,
        }
    }

    pub fn eq(terms: Vec<(VarId, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            sense: Sense::Eq,
            rhs,
        }
    }

    /// Evaluates the left-hand side for the given variable values.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether `values` satisfy this constraint within `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tolerance,
            Sense::Ge => lhs >= self.rhs - tolerance,
            Sense::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A binary integer program: variables, linear constraints, and a
/// linear objective.
///
/// Variables live in an arena and are addressed by [`VarId`]. The model
/// is plain data; any [`MilpSolver`](super::MilpSolver) can consume it.
///
/// # Examples
///
/// ```
/// use u_roster::milp::{LinearConstraint, MilpModel};
///
/// let mut model = MilpModel::new("pick-one");
/// let a = model.add_binary("a", 3.0);
/// let b = model.add_binary("b", 2.0);
/// model.add_constraint(LinearConstraint::le(vec![(a, 1.0), (b, 1.0)], 1.0));
/// assert_eq!(model.var_count(), 2);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MilpModel {
    /// Model name.
    pub name: String,
    sense: ObjectiveSense,
    vars: Vec<BinaryVar>,
    constraints: Vec<LinearConstraint>,
}

impl MilpModel {
    /// Creates an empty maximization model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sense: ObjectiveSense::Maximize,
            vars: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_sense(mut self, sense: ObjectiveSense) -> Self {
        self.sense = sense;
        self
    }

    /// Adds a binary variable and returns its id.
    pub fn add_binary(&mut self, name: impl Into<String>, objective: f64) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(BinaryVar {
            name: name.into(),
            objective,
        });
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn vars(&self) -> &[BinaryVar] {
        &self.vars
    }

    pub fn var(&self, id: VarId) -> Option<&BinaryVar> {
        self.vars.get(id.0)
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of an assignment (`values[i]` is the value of variable `i`).
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.vars
            .iter()
            .zip(values)
            .map(|(var, value)| var.objective * value)
            .sum()
    }

    /// Whether every constraint holds for `values` within `tolerance`.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        self.constraints
            .iter()
            .all(|c| c.is_satisfied_by(values, tolerance))
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every constraint references known variables at most
    /// once and that all coefficients are finite.
    pub fn validate(&self) -> Result<(), String> {
        for (i, var) in self.vars.iter().enumerate() {
            if !var.objective.is_finite() {
                return Err(format!("variable {i} ({}) has a non-finite objective", var.name));
            }
        }

        let mut seen = HashSet::new();
        for (c_idx, constraint) in self.constraints.iter().enumerate() {
            if !constraint.rhs.is_finite() {
                return Err(format!("constraint {c_idx}: non-finite right-hand side"));
            }
            seen.clear();
            for &(var, coef) in &constraint.terms {
                if var.0 >= self.vars.len() {
                    return Err(format!("constraint {c_idx}: undefined variable {}", var.0));
                }
                if !seen.insert(var) {
                    return Err(format!(
                        "constraint {c_idx}: variable {} appears more than once",
                        self.vars[var.0].name
                    ));
                }
                if !coef.is_finite() {
                    return Err(format!("constraint {c_idx}: non-finite coefficient"));
                }
            }
        }
        Ok(())
    }
}
