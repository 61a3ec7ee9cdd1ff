//! Runtime settings.

use std::time::Duration;

use crate::RuntimeError;

/// Default per-file validation timeout.
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of files validated at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Upper bound on one file's validation
    pub validation_timeout: Duration,
    /// Files in flight at once
    pub max_concurrency: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            validation_timeout: DEFAULT_VALIDATION_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl RuntimeConfig {
    /// Set the timeout from a human-readable duration such as `"30s"` or `"2m 30s"`.
    pub fn with_timeout(mut self, timeout: &str) -> Result<Self, RuntimeError> {
        let parsed = humantime::parse_duration(timeout)
            .map_err(|e| RuntimeError::InvalidConfig(format!("timeout {:?}: {}", timeout, e)))?;
        if parsed.is_zero() {
            return Err(RuntimeError::InvalidConfig("timeout must be positive".to_string()));
        }
        self.validation_timeout = parsed;
        Ok(self)
    }

    pub fn with_concurrency(mut self, max_concurrency: usize) -> Result<Self, RuntimeError> {
        if max_concurrency == 0 {
            return Err(RuntimeError::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        self.max_concurrency = max_concurrency;
        Ok(self)
    }
}
