use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client-side project cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Maximum number of project snapshots kept at once.
    /// TOML: `cache.max_capacity`. Default: `64`.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// Drop a per-kind value list after this many seconds without access.
    /// Project snapshots never idle out; they live until a project switch.
    /// TOML: `cache.time_to_idle_secs`. Default: `1800`.
    #[serde(default = "default_time_to_idle_secs")]
    pub time_to_idle_secs: u64,
}

impl CacheConfig {
    pub fn time_to_idle(&self) -> Duration {
        Duration::from_secs(self.time_to_idle_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            time_to_idle_secs: default_time_to_idle_secs(),
        }
    }
}

fn default_max_capacity() -> u64 {
    64
}

fn default_time_to_idle_secs() -> u64 {
    1800
}
