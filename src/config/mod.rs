use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Maximum upload size accepted by the client: 500 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Metadata gate settings supplied by the hosting page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    /// Lock metadata panels behind an access code (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Lowercase hex SHA-256 of the access code (default: empty)
    #[serde(default)]
    pub code_hash: String,
}

impl GateConfig {
    /// Parse the host object `{"enabled": bool, "codeHash": "..."}`
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The gate only locks when it is enabled and a hash is configured
    pub fn is_locking(&self) -> bool {
        self.enabled && !self.code_hash.trim().is_empty()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct WasherConfig {
    /// Base URL of the washer service (default: "http://127.0.0.1:8080")
    pub base_url: String,

    /// Maximum file size in bytes (default: 500 MiB)
    pub max_file_size: u64,

    /// Metadata visibility gate
    pub gate: GateConfig,

    /// Pause between scripted overlay transitions (default: 350 ms)
    pub overlay_step_delay: Duration,

    /// Pause before a successful overlay closes (default: 800 ms)
    pub overlay_close_delay: Duration,
}

impl Default for WasherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            gate: GateConfig::default(),
            overlay_step_delay: Duration::from_millis(350),
            overlay_close_delay: Duration::from_millis(800),
        }
    }
}

impl WasherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_url: env::var("WASHER_BASE_URL").unwrap_or(default.base_url),

            max_file_size: env::var("WASHER_MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            gate: GateConfig {
                enabled: env::var("METADATA_LOCK_ENABLED")
                    .map(|v| v.to_lowercase() == "true" || v == "1")
                    .unwrap_or(default.gate.enabled),
                code_hash: env::var("METADATA_CODE_HASH")
                    .map(|v| v.trim().to_string())
                    .unwrap_or(default.gate.code_hash),
            },

            overlay_step_delay: env::var("OVERLAY_STEP_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(default.overlay_step_delay),

            overlay_close_delay: env::var("OVERLAY_CLOSE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(default.overlay_close_delay),
        }
    }

    /// Create config for development (no overlay pauses)
    pub fn development() -> Self {
        Self {
            overlay_step_delay: Duration::ZERO,
            overlay_close_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_gate(mut self, gate: GateConfig) -> Self {
        self.gate = gate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WasherConfig::default();
        assert_eq!(config.max_file_size, 500 * 1024 * 1024);
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert!(!config.gate.is_locking());
        assert_eq!(config.overlay_step_delay, Duration::from_millis(350));
    }

    #[test]
    fn test_development_config() {
        let config = WasherConfig::development();
        assert_eq!(config.overlay_step_delay, Duration::ZERO);
        assert_eq!(config.overlay_close_delay, Duration::ZERO);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_gate_config_from_host_object() {
        let gate = GateConfig::from_json(r#"{"enabled": true, "codeHash": "abc123"}"#).unwrap();
        assert!(gate.enabled);
        assert_eq!(gate.code_hash, "abc123");
        assert!(gate.is_locking());

        let gate = GateConfig::from_json(r#"{"enabled": true}"#).unwrap();
        assert!(!gate.is_locking());

        let gate = GateConfig::from_json(r#"{"enabled": false, "codeHash": "abc123"}"#).unwrap();
        assert!(!gate.is_locking());
    }
}
