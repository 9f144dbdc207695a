// SPDX-License-Identifier: Apache-2.0

use fra_atlas_query::PageLimits;
use fra_atlas_store::DbConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub page_limits: PageLimits,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            page_limits: PageLimits::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_LLM_API_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout: Duration::from_millis(15_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub db: DbConfig,
    pub api: ApiConfig,
    pub llm: LlmConfig,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            db: DbConfig::default(),
            api: ApiConfig::default(),
            llm: LlmConfig::default(),
            log_json: false,
        }
    }
}

pub fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_limit = env_u32("FRA_DEFAULT_PAGE_LIMIT", defaults.api.page_limits.default_limit);
        let max_limit = env_u32("FRA_MAX_PAGE_LIMIT", defaults.api.page_limits.max_limit).max(1);
        Self {
            bind: env_string("FRA_BIND").unwrap_or(defaults.bind),
            db: DbConfig {
                path: env_string("FRA_DB_PATH").map_or(defaults.db.path, PathBuf::from),
                max_connections: env_usize("FRA_DB_MAX_CONNECTIONS", defaults.db.max_connections)
                    .max(1),
                busy_timeout: env_duration_ms("FRA_DB_BUSY_TIMEOUT_MS", 5000),
                auto_migrate: env_bool("FRA_DB_AUTO_MIGRATE", defaults.db.auto_migrate),
            },
            api: ApiConfig {
                max_body_bytes: env_usize("FRA_MAX_BODY_BYTES", defaults.api.max_body_bytes),
                page_limits: PageLimits {
                    default_limit: default_limit.clamp(1, max_limit),
                    max_limit,
                },
                cors_allowed_origins: env_list("FRA_CORS_ALLOWED_ORIGINS"),
            },
            llm: LlmConfig {
                api_key: env_string("FRA_LLM_API_KEY"),
                api_url: env_string("FRA_LLM_API_URL").unwrap_or(defaults.llm.api_url),
                model: env_string("FRA_LLM_MODEL").unwrap_or(defaults.llm.model),
                timeout: env_duration_ms("FRA_LLM_TIMEOUT_MS", 15_000),
            },
            log_json: env_bool("FRA_LOG_JSON", false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind, "0.0.0.0:8080");
        assert_eq!(cfg.db.max_connections, 8);
        assert_eq!(cfg.api.max_body_bytes, 65_536);
        assert_eq!(cfg.api.page_limits.max_limit, 100);
        assert_eq!(cfg.llm.timeout, Duration::from_millis(15_000));
        assert!(!cfg.log_json);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let llm = LlmConfig {
            api_key: Some("sk-secret".to_string()),
            ..LlmConfig::default()
        };
        let rendered = format!("{llm:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
