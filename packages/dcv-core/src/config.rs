use std::time::Duration;

/// Timeouts below this commonly lose the race against DNS propagation plus
/// the CA re-check; advisory only, never enforced.
pub const ADVISORY_MIN_TIMEOUT: Duration = Duration::from_secs(90);

/// Configuration for one scan-and-validate run.
///
/// Built by the caller from resolved CLI/environment input and passed in at
/// construction; core logic never reads ambient state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Domains whose validation expires within this many days are due.
    pub threshold_days: i64,
    /// Per-job deadline for the polling state machine.
    pub timeout: Duration,
    /// Fixed wait between validation-status polls.
    pub poll_interval: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threshold_days: 90,
            timeout: Duration::from_secs(90),
            poll_interval: Duration::from_secs(15),
        }
    }
}

impl RunConfig {
    pub fn with_threshold_days(mut self, days: i64) -> Self {
        self.threshold_days = days;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.threshold_days, 90);
        assert_eq!(config.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_builders() {
        let config = RunConfig::default()
            .with_threshold_days(30)
            .with_timeout(Duration::from_secs(240));
        assert_eq!(config.threshold_days, 30);
        assert_eq!(config.timeout, Duration::from_secs(240));
    }
}
