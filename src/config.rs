use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use metrics::MetricsServerConfig;
use scanner::ScannerConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Intervals and timeouts must be positive.
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Process configuration, read from YAML. Every field has a default.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: DatabaseConfig,
    pub beacon: BeaconConfig,
    pub redis: Option<RedisConfig>,
    pub scanner: ScannerSection,
    pub metrics: Option<MetricsConfig>,
    pub log: LogConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("beacon.db"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BeaconConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5052".to_string(),
            timeout_secs: networking::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,
}

fn default_lock_ttl_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerSection {
    pub idle_interval_ms: u64,
    pub poll_interval_ms: u64,
    pub head_wait_ms: u64,
    pub failure_window_ms: u64,
    pub failure_cache_capacity: usize,
}

impl Default for ScannerSection {
    fn default() -> Self {
        let defaults = ScannerConfig::default();
        Self {
            idle_interval_ms: defaults.idle_interval.as_millis() as u64,
            poll_interval_ms: defaults.poll_interval.as_millis() as u64,
            head_wait_ms: defaults.head_wait.as_millis() as u64,
            failure_window_ms: defaults.failure_window.as_millis() as u64,
            failure_cache_capacity: defaults.failure_cache_capacity,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    pub address: IpAddr,
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 9090,
        }
    }
}

impl From<&MetricsConfig> for MetricsServerConfig {
    fn from(config: &MetricsConfig) -> Self {
        Self {
            metrics_address: config.address,
            metrics_port: config.port,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read `path`, or use the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut durations = vec![
            ("beacon.timeout_secs", self.beacon.timeout_secs),
            ("scanner.idle_interval_ms", self.scanner.idle_interval_ms),
            ("scanner.poll_interval_ms", self.scanner.poll_interval_ms),
            ("scanner.head_wait_ms", self.scanner.head_wait_ms),
        ];
        if let Some(redis) = &self.redis {
            durations.push(("redis.lock_ttl_secs", redis.lock_ttl_secs));
        }

        match durations.into_iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(ConfigError::Zero { field }),
            None => Ok(()),
        }
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        let mut config = ScannerConfig {
            idle_interval: Duration::from_millis(self.scanner.idle_interval_ms),
            poll_interval: Duration::from_millis(self.scanner.poll_interval_ms),
            head_wait: Duration::from_millis(self.scanner.head_wait_ms),
            failure_window: Duration::from_millis(self.scanner.failure_window_ms),
            failure_cache_capacity: self.scanner.failure_cache_capacity,
            ..ScannerConfig::default()
        };
        if let Some(redis) = &self.redis {
            config.lock_ttl = Duration::from_secs(redis.lock_ttl_secs);
        }
        config
    }

    pub fn beacon_timeout(&self) -> Duration {
        Duration::from_secs(self.beacon.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").expect("empty config");
        assert_eq!(config, Config::default());
        assert_eq!(config.database.path, PathBuf::from("beacon.db"));
        assert_eq!(config.beacon_timeout(), Duration::from_secs(10));
        assert_eq!(config.scanner_config(), ScannerConfig::default());
        assert!(config.redis.is_none());
        assert!(config.metrics.is_none());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
beacon:
  url: http://node:5052
scanner:
  failure_window_ms: 2500
redis:
  url: redis://cache:6379
metrics:
  port: 9400
log:
  level: debug
"#,
        )
        .expect("valid config");

        assert_eq!(config.beacon.url, "http://node:5052");
        assert_eq!(config.beacon.timeout_secs, 10);

        let scanner = config.scanner_config();
        assert_eq!(scanner.failure_window, Duration::from_millis(2500));
        assert_eq!(scanner.poll_interval, Duration::from_millis(10));
        assert_eq!(scanner.lock_ttl, Duration::from_secs(30));

        let metrics = config.metrics.as_ref().expect("metrics section");
        assert_eq!(metrics.port, 9400);
        assert_eq!(metrics.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_zero_intervals_are_rejected() {
        let cases = [
            ("scanner:\n  poll_interval_ms: 0\n", "scanner.poll_interval_ms"),
            ("scanner:\n  idle_interval_ms: 0\n", "scanner.idle_interval_ms"),
            ("scanner:\n  head_wait_ms: 0\n", "scanner.head_wait_ms"),
            ("beacon:\n  timeout_secs: 0\n", "beacon.timeout_secs"),
            (
                "redis:\n  url: redis://cache:6379\n  lock_ttl_secs: 0\n",
                "redis.lock_ttl_secs",
            ),
        ];

        for (raw, field) in cases {
            let err = Config::parse(raw).expect_err(field);
            assert_eq!(
                err.downcast_ref::<ConfigError>(),
                Some(&ConfigError::Zero { field }),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_zero_failure_window_is_allowed() {
        let config = Config::parse("scanner:\n  failure_window_ms: 0\n").expect("valid config");
        assert_eq!(config.scanner_config().failure_window, Duration::ZERO);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::parse("scaner:\n  head_wait_ms: 5\n").is_err());
    }
}
