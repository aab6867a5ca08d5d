//! Roster configuration and window partitioning.

use crate::error::{Result, RosterError};
use std::ops::Range;

/// Default number of days per visit-frequency window.
pub const DEFAULT_WINDOW_LENGTH: i64 = 5;

/// Parameters of one roster solve.
///
/// Values are signed so that out-of-range input survives loading and is
/// rejected by [`validate`](Self::validate) with a descriptive error.
///
/// # Examples
///
/// ```
/// use u_roster::model::RosterConfig;
///
/// let config = RosterConfig::default()
///     .with_num_spots(3)
///     .with_max_visits_per_window(2)
///     .with_window_length(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterConfig {
    /// Maximum simultaneous attendees per day. `0` closes every day.
    pub num_spots: i64,

    /// Maximum days one employee may attend within a window.
    pub max_visits_per_window: i64,

    /// Days per window (`W`). Day `i` belongs to window `i / W`.
    pub window_length: i64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            num_spots: 2,
            max_visits_per_window: 2,
            window_length: DEFAULT_WINDOW_LENGTH,
        }
    }
}

impl RosterConfig {
    pub fn new(num_spots: i64, max_visits_per_window: i64) -> Self {
        Self {
            num_spots,
            max_visits_per_window,
            ..Self::default()
        }
    }

    pub fn with_num_spots(mut self, n: i64) -> Self {
        self.num_spots = n;
        self
    }

    pub fn with_max_visits_per_window(mut self, n: i64) -> Self {
        self.max_visits_per_window = n;
        self
    }

    pub fn with_window_length(mut self, w: i64) -> Self {
        self.window_length = w;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_spots < 0 {
            return Err(RosterError::InvalidConfig(format!(
                "num_spots must be non-negative, got {}",
                self.num_spots
            )));
        }
        if self.max_visits_per_window < 0 {
            return Err(RosterError::InvalidConfig(format!(
                "max_visits_per_window must be non-negative, got {}",
                self.max_visits_per_window
            )));
        }
        if self.window_length <= 0 {
            return Err(RosterError::InvalidConfig(format!(
                "window_length must be positive, got {}",
                self.window_length
            )));
        }
        Ok(())
    }

    /// Window length as an index stride. Only meaningful after validation.
    pub fn window_len(&self) -> usize {
        self.window_length.max(1) as usize
    }

    /// Window containing `day`.
    pub fn window_of(&self, day: usize) -> usize {
        window_of(day, self.window_len())
    }
}

/// Window index of `day` for windows of `window_length` days.
///
/// Purely positional: day `i` belongs to window `i / window_length`.
///
/// # Panics
/// Panics if `window_length` is zero.
pub fn window_of(day: usize, window_length: usize) -> usize {
    day / window_length
}

/// Number of windows covering `days` days, counting a trailing partial window.
pub fn window_count(days: usize, window_length: usize) -> usize {
    days.div_ceil(window_length)
}

/// Day indices belonging to `window`, clipped to the horizon of `days` days.
///
/// The last window is shorter when `days` is not a multiple of
/// `window_length`; it is empty when `window` lies past the horizon.
pub fn window_days(window: usize, days: usize, window_length: usize) -> Range<usize> {
    let start = (window * window_length).min(days);
    let end = ((window + 1) * window_length).min(days);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RosterConfig::default();
        assert_eq!(config.num_spots, 2);
        assert_eq!(config.max_visits_per_window, 2);
        assert_eq!(config.window_length, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_spots_is_valid() {
        assert!(RosterConfig::new(0, 2).validate().is_ok());
        assert!(RosterConfig::new(2, 0).validate().is_ok());
    }

    #[test]
    fn test_validate_negative_spots() {
        let err = RosterConfig::new(-1, 2).validate().unwrap_err();
        assert!(matches!(err, RosterError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_negative_visits() {
        let err = RosterConfig::new(2, -3).validate().unwrap_err();
        assert!(matches!(err, RosterError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_window_length() {
        for w in [0, -5] {
            let config = RosterConfig::default().with_window_length(w);
            assert!(matches!(
                config.validate(),
                Err(RosterError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_window_of() {
        assert_eq!(window_of(0, 5), 0);
        assert_eq!(window_of(4, 5), 0);
        assert_eq!(window_of(5, 5), 1);
        assert_eq!(window_of(9, 5), 1);
        assert_eq!(window_of(10, 5), 2);
        assert_eq!(window_of(7, 1), 7);

        let config = RosterConfig::default().with_window_length(3);
        assert_eq!(config.window_of(8), 2);
    }

    #[test]
    fn test_window_count() {
        assert_eq!(window_count(10, 5), 2);
        assert_eq!(window_count(11, 5), 3);
        assert_eq!(window_count(4, 5), 1);
        assert_eq!(window_count(0, 5), 0);
    }

    #[test]
    fn test_partial_trailing_window() {
        assert_eq!(window_days(0, 10, 3), 0..3);
        assert_eq!(window_days(2, 10, 3), 6..9);
        assert_eq!(window_days(3, 10, 3), 9..10);
        assert!(window_days(4, 10, 3).is_empty());
    }

    #[test]
    fn test_windows_cover_every_day_once() {
        let (days, w) = (13, 4);
        let mut covered = Vec::new();
        for window in 0..window_count(days, w) {
            for day in window_days(window, days, w) {
                assert_eq!(window_of(day, w), window);
                covered.push(day);
            }
        }
        assert_eq!(covered, (0..days).collect::<Vec<_>>());
    }
}
