//! Configuration for SnapKV
//!
//! Centralized configuration with sensible defaults. Every field is fixed
//! once the store is opened.

use std::path::PathBuf;
use std::time::Duration;

use crate::codec::Format;

/// Main configuration for a SnapKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// File holding the serialized snapshot of the whole map
    pub flush_path: PathBuf,

    /// Encoding used for the snapshot file
    pub format: Format,

    /// What to do when an existing snapshot cannot be read or decoded
    pub load_policy: LoadPolicy,

    // -------------------------------------------------------------------------
    // Scheduler Configuration
    // -------------------------------------------------------------------------
    /// Interval between background flushes.
    /// `Duration::ZERO` disables the background scheduler entirely.
    pub flush_period: Duration,
}

/// Handling of a snapshot that exists but cannot be loaded
///
/// A missing snapshot is never an error under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Fail `Store::open` with the underlying error
    #[default]
    Strict,

    /// Log the error and start with an empty map
    Lenient,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flush_path: PathBuf::from("./snapkv.json"),
            format: Format::Json,
            load_policy: LoadPolicy::Strict,
            flush_period: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether the background scheduler should run
    pub fn periodic_flush_enabled(&self) -> bool {
        !self.flush_period.is_zero()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the snapshot file path
    pub fn flush_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.flush_path = path.into();
        self
    }

    /// Set the background flush interval (zero disables it)
    pub fn flush_period(mut self, period: Duration) -> Self {
        self.config.flush_period = period;
        self
    }

    /// Set the snapshot encoding
    pub fn format(mut self, format: Format) -> Self {
        self.config.format = format;
        self
    }

    /// Set how load failures are handled
    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.config.load_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.flush_path, PathBuf::from("./snapkv.json"));
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.load_policy, LoadPolicy::Strict);
        assert!(config.periodic_flush_enabled());
    }

    #[test]
    fn test_zero_period_disables_scheduler() {
        let config = Config::builder().flush_period(Duration::ZERO).build();
        assert!(!config.periodic_flush_enabled());
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::builder()
            .flush_path("/tmp/data.bin")
            .format(Format::Bincode)
            .load_policy(LoadPolicy::Lenient)
            .flush_period(Duration::from_millis(250))
            .build();

        assert_eq!(config.flush_path, PathBuf::from("/tmp/data.bin"));
        assert_eq!(config.format, Format::Bincode);
        assert_eq!(config.load_policy, LoadPolicy::Lenient);
        assert_eq!(config.flush_period, Duration::from_millis(250));
    }
}
