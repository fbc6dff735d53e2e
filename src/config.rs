//! Runtime configuration from the environment (after `.env` is loaded).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    /// Allowed CORS origin; any origin when unset.
    pub client_url: Option<String>,
    pub nats_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = match var("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => 5000,
        };
        Ok(Self {
            port,
            data_dir: var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("./data")),
            jwt_secret: var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            client_url: var("CLIENT_URL"),
            nats_url: var("NATS_URL"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.client_url.is_none());
        assert!(config.nats_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"), ("PORT", "8083"), ("DATA_DIR", "/var/lib/storefront"),
            ("CLIENT_URL", "http://localhost:5173"), ("NATS_URL", "nats://localhost:4222"),
        ])).unwrap();
        assert_eq!(config.port, 8083);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/storefront"));
        assert_eq!(config.client_url.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Config::from_lookup(lookup(&[])), Err(ConfigError::Missing("JWT_SECRET"))));
        assert!(matches!(Config::from_lookup(lookup(&[("JWT_SECRET", " ")])), Err(ConfigError::Missing(_))));
        assert!(matches!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("PORT", "http")])),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }
}
