//! Search configuration for the route planner.

use std::time::Duration;

/// Configuration parameters for route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Minutes added to the travel time for each change of line.
    pub transfer_penalty_mins: u32,

    /// Fare units charged for every connection travelled.
    pub cost_per_connection: u32,

    /// Multiplier on the straight-line distance (in degrees) to the
    /// destination used as the search heuristic.
    /// Zero disables the heuristic entirely.
    pub heuristic_factor: f64,

    /// Wall-clock budget for a single search.
    /// Searches that exceed it end with a cancelled outcome.
    pub timeout: Option<Duration>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        transfer_penalty_mins: u32,
        cost_per_connection: u32,
        heuristic_factor: f64,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transfer_penalty_mins,
            cost_per_connection,
            heuristic_factor,
            timeout,
        }
    }

    /// Returns a copy with a different timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            transfer_penalty_mins: 5,
            cost_per_connection: 10,
            heuristic_factor: 2.0,
            timeout: Some(Duration::from_secs(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.transfer_penalty_mins, 5);
        assert_eq!(config.cost_per_connection, 10);
        assert_eq!(config.heuristic_factor, 2.0);
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(3, 7, 0.0, None);

        assert_eq!(config.transfer_penalty_mins, 3);
        assert_eq!(config.cost_per_connection, 7);
        assert_eq!(config.heuristic_factor, 0.0);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn with_timeout() {
        let config = SearchConfig::default().with_timeout(Some(Duration::from_millis(250)));
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.transfer_penalty_mins, 5);
    }
}
