//! Built-in datasets for tests, examples, and benchmarks.
//!
//! [`toy_problem`] is a fixed reference instance that can be solved
//! without any tabular input. [`random_problem`] generates reproducible
//! synthetic instances of any size.

use super::config::RosterConfig;
use super::types::{ConnectionMatrix, Preference, PreferenceMatrix, RosterProblem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Optimal objective value of [`toy_problem`] under [`toy_config`].
pub const TOY_OPTIMUM: i64 = 125;

const TOY_EMPLOYEES: [&str; 6] = ["Anna", "Ben", "Clara", "David", "Emma", "Felix"];

const TOY_DAYS: [&str; 10] = [
    "W1 Mon", "W1 Tue", "W1 Wed", "W1 Thu", "W1 Fri", "W2 Mon", "W2 Tue", "W2 Wed", "W2 Thu",
    "W2 Fri",
];

// y = yes, m = maybe, n = no
const TOY_PREFERENCES: [&str; 6] = [
    "yymnmymynn",
    "ymynnmynyn",
    "nyymynyymm",
    "mnyynynmyy",
    "ynnymmmyny",
    "nmnyynnyym",
];

const TOY_CONNECTIONS: [(usize, usize, i64); 8] = [
    (0, 1, 4),
    (2, 3, 4),
    (4, 5, 6),
    (0, 2, -10),
    (1, 4, -5),
    (3, 5, 3),
    (0, 4, 2),
    (1, 3, -3),
];

/// The reference dataset: 6 employees, 10 days (two 5-day weeks).
pub fn toy_problem() -> RosterProblem {
    let mut preferences = PreferenceMatrix::new(TOY_EMPLOYEES.len(), TOY_DAYS.len());
    for (e, row) in TOY_PREFERENCES.iter().enumerate() {
        for (d, code) in row.chars().enumerate() {
            let level = match code {
                'y' => Preference::Strong,
                'm' => Preference::Weak,
                _ => Preference::Unavailable,
            };
            preferences.set(e, d, level);
        }
    }

    let mut connections = ConnectionMatrix::new(TOY_EMPLOYEES.len());
    for (a, b, weight) in TOY_CONNECTIONS {
        connections.set(a, b, weight);
    }

    RosterProblem::new(TOY_EMPLOYEES, TOY_DAYS, preferences, connections)
}

/// Configuration paired with [`toy_problem`]: 2 spots, at most 2 visits
/// per 5-day week.
pub fn toy_config() -> RosterConfig {
    RosterConfig::new(2, 2).with_window_length(5)
}

/// Generates a random instance with `employees` employees and `days` days.
///
/// Preference levels are drawn with probabilities 0.3 / 0.3 / 0.4
/// (strong / weak / unavailable); roughly half of the pairs get a
/// non-zero connection weight in `-6..=6`. Same seed, same instance.
pub fn random_problem(employees: usize, days: usize, seed: u64) -> RosterProblem {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut preferences = PreferenceMatrix::new(employees, days);
    for e in 0..employees {
        for d in 0..days {
            let roll: f64 = rng.random_range(0.0..1.0);
            let level = if roll < 0.3 {
                Preference::Strong
            } else if roll < 0.6 {
                Preference::Weak
            } else {
                Preference::Unavailable
            };
            preferences.set(e, d, level);
        }
    }

    let mut connections = ConnectionMatrix::new(employees);
    for a in 0..employees {
        for b in a + 1..employees {
            if rng.random_bool(0.5) {
                connections.set(a, b, rng.random_range(-6..=6));
            }
        }
    }

    RosterProblem::new(
        (0..employees).map(|e| format!("E{e}")),
        (0..days).map(|d| format!("D{d}")),
        preferences,
        connections,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toy_shape() {
        let problem = toy_problem();
        assert_eq!(problem.employee_count(), 6);
        assert_eq!(problem.day_count(), 10);
        assert!(problem.validate().is_ok());
        assert!(toy_config().validate().is_ok());
    }

    #[test]
    fn test_toy_values() {
        let problem = toy_problem();
        assert_eq!(problem.employees[0].name, "Anna");
        assert_eq!(problem.days[5].label, "W2 Mon");
        assert_eq!(problem.preferences.get(0, 0), Preference::Strong);
        assert_eq!(problem.preferences.get(0, 2), Preference::Weak);
        assert_eq!(problem.preferences.get(0, 3), Preference::Unavailable);
        assert_eq!(problem.connections.weight(0, 1), 4);
        assert_eq!(problem.connections.weight(2, 0), -10);
        assert_eq!(problem.connections.weight(2, 4), 0);
    }

    #[test]
    fn test_random_reproducible() {
        let a = random_problem(5, 7, 42);
        let b = random_problem(5, 7, 42);
        assert_eq!(a, b);
        assert!(a.validate().is_ok());
        assert_eq!(a.preferences.shape(), (5, 7));
    }

    #[test]
    fn test_random_seeds_differ() {
        let a = random_problem(6, 10, 1);
        let b = random_problem(6, 10, 2);
        assert_ne!(a, b);
    }
}
