// src/config.rs
use std::{collections::HashMap, env, path::PathBuf, time::Duration};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} tidak ditemukan di .env")]
    Missing(&'static str),

    #[error("nilai {key} tidak valid: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Firebase { database_url: String, auth_token: Option<String> },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub store_timeout: Duration,
    pub render_timeout: Duration,
    pub dot_bin: String,
    /// Parent of the per-request scratch directories, system temp dir if unset.
    pub scratch_dir: Option<PathBuf>,
    /// `None` means any origin is accepted.
    pub cors_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let host = get("APP_HOST").unwrap_or("127.0.0.1").to_string();
        let port = parse_or(get("APP_PORT"), "APP_PORT", 8000u16)?;

        let store = match get("STORE_BACKEND").unwrap_or("firebase") {
            "firebase" => StoreBackend::Firebase {
                database_url: get("FIREBASE_DATABASE_URL")
                    .ok_or(ConfigError::Missing("FIREBASE_DATABASE_URL"))?
                    .trim_end_matches('/')
                    .to_string(),
                auth_token: get("FIREBASE_AUTH_TOKEN").map(str::to_string),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let store_timeout = parse_or(get("STORE_TIMEOUT_SECS"), "STORE_TIMEOUT_SECS", 10u64)?;
        let render_timeout = parse_or(get("RENDER_TIMEOUT_SECS"), "RENDER_TIMEOUT_SECS", 20u64)?;

        let cors_origin = match get("CORS_ALLOWED_ORIGIN") {
            None | Some("*") => None,
            Some(origin) => Some(origin.to_string()),
        };

        Ok(Self {
            host,
            port,
            store,
            store_timeout: Duration::from_secs(store_timeout),
            render_timeout: Duration::from_secs(render_timeout),
            dot_bin: get("GRAPHVIZ_DOT_BIN").unwrap_or("dot").to_string(),
            scratch_dir: get("RENDER_SCRATCH_DIR").map(PathBuf::from),
            cors_origin,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<&str>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_with_memory_backend() {
        let config = AppConfig::from_vars(&vars(&[("STORE_BACKEND", "memory")])).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.render_timeout, Duration::from_secs(20));
        assert_eq!(config.dot_bin, "dot");
        assert_eq!(config.scratch_dir, None);
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn firebase_backend_requires_database_url() {
        let err = AppConfig::from_vars(&vars(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("FIREBASE_DATABASE_URL"));
    }

    #[test]
    fn firebase_url_trailing_slash_is_trimmed() {
        let config = AppConfig::from_vars(&vars(&[
            ("FIREBASE_DATABASE_URL", "https://silsilah.firebaseio.com/"),
            ("FIREBASE_AUTH_TOKEN", "rahasia"),
            ("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
        ]))
        .unwrap();

        assert_eq!(
            config.store,
            StoreBackend::Firebase {
                database_url: "https://silsilah.firebaseio.com".to_string(),
                auth_token: Some("rahasia".to_string()),
            }
        );
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = AppConfig::from_vars(&vars(&[("STORE_BACKEND", "memory"), ("APP_PORT", "x")]))
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "APP_PORT",
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = AppConfig::from_vars(&vars(&[("STORE_BACKEND", "mysql")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STORE_BACKEND", .. }));
    }
}
