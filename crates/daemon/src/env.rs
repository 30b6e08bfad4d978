// SPDX-License-Identifier: MIT

//! Centralized environment variable access, following the convention of
//! naming one function per tunable with its default baked in.

use std::time::Duration;

use fleethub_core::{
    DEFAULT_CELL_SIZE_DEG, DEFAULT_PUSH_INTERVAL_MS, DEFAULT_REAP_INTERVAL_SECS,
    DEFAULT_STALENESS_SECS,
};

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|s| s.parse::<f64>().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(default)
}

/// Spatial grid cell size in degrees. `FLEETHUB_CELL_SIZE_DEG`.
pub fn cell_size_deg() -> f64 {
    env_f64("FLEETHUB_CELL_SIZE_DEG", DEFAULT_CELL_SIZE_DEG)
}

/// Staleness threshold, in seconds, before a vehicle becomes a zombie.
/// `FLEETHUB_STALENESS_SECS`.
pub fn staleness_secs() -> u64 {
    env_u64("FLEETHUB_STALENESS_SECS", DEFAULT_STALENESS_SECS)
}

/// Interval between zombie-reaper sweeps. `FLEETHUB_REAP_INTERVAL_SECS`.
pub fn reap_interval() -> Duration {
    Duration::from_secs(env_u64("FLEETHUB_REAP_INTERVAL_SECS", DEFAULT_REAP_INTERVAL_SECS))
}

/// Interval between viewer snapshot pushes. `FLEETHUB_PUSH_INTERVAL_MS`.
pub fn push_interval() -> Duration {
    Duration::from_millis(env_u64("FLEETHUB_PUSH_INTERVAL_MS", DEFAULT_PUSH_INTERVAL_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_constants() {
        // Exercised without setting env vars: CI/test runners never set
        // these, so this asserts the fallback path specifically.
        assert!(cell_size_deg() > 0.0);
        assert!(staleness_secs() > 0);
        assert!(reap_interval() > Duration::ZERO);
        assert!(push_interval() > Duration::ZERO);
    }
}
