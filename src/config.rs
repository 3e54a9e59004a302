//! # Configuration Module
//!
//! Application settings loaded from environment variables at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `APP_ENV` | `development` | `development`, `production`, ... |
//! | `APP_NAME` | `Enzovu App` | Display name |
//! | `APP_HOST` | `0.0.0.0` | Bind host |
//! | `APP_PORT` | `8000` | Bind port |
//! | `APP_DEBUG` | `true` | Debug mode |
//! | `APP_STATIC_DIR` | `public` | Directory served under `/static` |
//! | `APP_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `APP_LOG_FORMAT` | `pretty` in development, `json` otherwise | Log output format |
//! | `APP_STACK_SIZE` | `0x4000` | Coroutine stack size, decimal or `0x` hex |
//!
//! Unset, empty, or unparsable values fall back to the default.

use std::env;
use std::path::PathBuf;

use crate::logging::{LogConfig, LogFormat};

const DEFAULT_STACK_SIZE: usize = 0x4000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub static_dir: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Stack size for request coroutines in bytes.
    pub stack_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("APP_ENV").unwrap_or_else(|| "development".to_string());
        let log_format = match get("APP_LOG_FORMAT") {
            Some(v) => LogFormat::parse(&v),
            None if environment == "development" => LogFormat::Pretty,
            None => LogFormat::Json,
        };

        Self {
            name: get("APP_NAME").unwrap_or_else(|| "Enzovu App".to_string()),
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("APP_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(8000),
            debug: get("APP_DEBUG")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            static_dir: get("APP_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            log_level: get("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
            stack_size: get("APP_STACK_SIZE")
                .and_then(|v| parse_size(&v))
                .unwrap_or(DEFAULT_STACK_SIZE),
            environment,
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Logging settings derived from this configuration.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
            format: self.log_format,
            include_location: self.debug && self.is_development(),
            ..LogConfig::from_env()
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_size(value: &str) -> Option<usize> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.environment, "development");
        assert_eq!(cfg.port, 8000);
        assert!(cfg.debug);
        assert_eq!(cfg.static_dir, PathBuf::from("public"));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.stack_size, 0x4000);
        assert_eq!(cfg.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_production_defaults_to_json_logs() {
        let cfg = config_from(&[("APP_ENV", "production")]);
        assert!(cfg.is_production());
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let cfg = config_from(&[
            ("APP_PORT", "9090"),
            ("APP_DEBUG", "false"),
            ("APP_STACK_SIZE", "0x8000"),
            ("APP_NAME", ""),
        ]);
        assert_eq!(cfg.port, 9090);
        assert!(!cfg.debug);
        assert_eq!(cfg.stack_size, 0x8000);
        assert_eq!(cfg.name, "Enzovu App");

        let cfg = config_from(&[("APP_PORT", "not-a-port"), ("APP_DEBUG", "maybe")]);
        assert_eq!(cfg.port, 8000);
        assert!(cfg.debug);
    }
}
