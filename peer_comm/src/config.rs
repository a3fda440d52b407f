//! Session and retry configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default per-attempt wait for room on a full queue
pub const DEFAULT_PUT_TIMEOUT: Duration = Duration::from_millis(100);

/// Default number of put attempts before giving up
pub const DEFAULT_LOOPS: u32 = 10;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Retry budget must allow at least one attempt")]
    ZeroLoops,

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How a queue peer reacts to backpressure
///
/// Each attempt waits up to `timeout` for room; after `loops` failed
/// attempts the send is abandoned. There is no backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    timeout: Duration,
    loops: u32,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, loops: u32) -> Result<Self, ConfigError> {
        if loops == 0 {
            return Err(ConfigError::ZeroLoops);
        }
        Ok(Self { timeout, loops })
    }

    /// Per-attempt wait
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Total number of attempts
    pub fn loops(&self) -> u32 {
        self.loops
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PUT_TIMEOUT,
            loops: DEFAULT_LOOPS,
        }
    }
}

/// Session configuration for the shared-queue transport
///
/// ```json
/// { "capacity": 64, "timeout": 0.25, "loops": 5 }
/// ```
///
/// `timeout` is in seconds. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommConfig {
    /// Queue bound (0 = unbounded)
    pub capacity: usize,
    /// Per-attempt enqueue wait
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Attempts before a send fails
    pub loops: u32,
}

impl Default for CommConfig {
    fn default() -> Self {
        Self {
            capacity: 0,
            timeout: DEFAULT_PUT_TIMEOUT,
            loops: DEFAULT_LOOPS,
        }
    }
}

impl CommConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CommConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retry_policy().map(|_| ())
    }

    /// Retry policy handed to peers that don't ask for their own
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        RetryPolicy::new(self.timeout, self.loops)
    }
}

mod duration_secs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.timeout(), Duration::from_millis(100));
        assert_eq!(policy.loops(), 10);

        let config = CommConfig::default();
        assert_eq!(config.capacity, 0);
        assert_eq!(config.retry_policy().unwrap(), policy);
    }

    #[test]
    fn test_zero_loops_rejected() {
        assert!(matches!(
            RetryPolicy::new(Duration::from_millis(1), 0),
            Err(ConfigError::ZeroLoops)
        ));
    }

    #[test]
    fn test_parse_full_config() {
        let config =
            CommConfig::from_json_str(r#"{"capacity": 64, "timeout": 0.25, "loops": 5}"#).unwrap();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.loops, 5);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = CommConfig::from_json_str(r#"{"capacity": 8}"#).unwrap();
        assert_eq!(config.capacity, 8);
        assert_eq!(config.timeout, DEFAULT_PUT_TIMEOUT);
        assert_eq!(config.loops, DEFAULT_LOOPS);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(matches!(
            CommConfig::from_json_str(r#"{"loops": 0}"#),
            Err(ConfigError::ZeroLoops)
        ));
        assert!(matches!(
            CommConfig::from_json_str(r#"{"timeout": -1.0}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            CommConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_serializes_timeout_in_seconds() {
        let config = CommConfig {
            capacity: 2,
            timeout: Duration::from_millis(500),
            loops: 3,
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json, serde_json::json!({"capacity": 2, "timeout": 0.5, "loops": 3}));
    }
}
