//! Explorer configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ExplorerConfig;

/// Configuration values controlling the federation explorer.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXPLORER")]
pub struct ExplorerSettings {
    /// Seconds between synchronisation passes.
    #[ortho_config(default = 600)]
    pub interval_secs: u64,
    /// Timeout for each remote memo request, in milliseconds.
    #[ortho_config(default = 1000)]
    pub request_timeout_ms: u64,
    /// Memos requested per external user and pass.
    #[ortho_config(default = 2)]
    pub fetch_limit: u32,
}

impl ExplorerSettings {
    /// Delay between passes.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Per-request timeout for the remote memo source.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Domain-side explorer configuration.
    pub fn explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            interval: self.interval(),
            fetch_limit: self.fetch_limit,
        }
    }
}
