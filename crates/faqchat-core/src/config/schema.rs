//! Configuration schema.
//!
//! Hierarchy: `Config` → `ServerConfig`, `StorageConfig`. Every field has a
//! default so a missing or partial config file always yields a usable value.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.faqchat/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// Where the answering service lives and how long to wait for it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Base URL of the remote service (`/chat` and `/upload` hang off it).
    pub api_base: String,
    /// Per-request timeout in seconds.
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            request_timeout: 30,
        }
    }
}

// ─────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────

/// Where session state is persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Directory for the session snapshot files.
    pub state_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.faqchat/state".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.api_base, "http://127.0.0.1:8000");
        assert_eq!(config.server.request_timeout, 30);
        assert_eq!(config.storage.state_dir, "~/.faqchat/state");
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["server"].get("apiBase").is_some());
        assert!(json["server"].get("api_base").is_none());
        assert!(json["storage"].get("stateDir").is_some());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"server": {"apiBase": "http://box:9000"}}"#).unwrap();
        assert_eq!(config.server.api_base, "http://box:9000");
        assert_eq!(config.server.request_timeout, 30);
        assert_eq!(config.storage.state_dir, "~/.faqchat/state");
    }
}
