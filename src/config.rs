//! Figment-based configuration loading.
//!
//! Priority (highest wins):
//! 1. Environment variables (`NAVICONOMY_` prefix, `__` separates sections)
//! 2. Config file (TOML)
//! 3. Defaults

use crate::error::NaviconomyError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_FILE: &str = "naviconomy.toml";
pub const DEFAULT_SECRET_KEY: &str = "unsafe-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project_name: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub debug: bool,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: "Naviconomy".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            debug: false,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:naviconomy.db".to_string(),
            max_connections: 20,
            min_connections: 1,
            acquire_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
        }
    }
}

impl AuthConfig {
    /// Parse the signing algorithm. Only HMAC algorithms work with a shared secret.
    pub fn algorithm(&self) -> Result<Algorithm, NaviconomyError> {
        let alg = Algorithm::from_str(self.algorithm.trim())
            .map_err(|_| NaviconomyError::Config(format!("unknown algorithm `{}`", self.algorithm)))?;
        match alg {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(alg),
            other => Err(NaviconomyError::Config(format!(
                "algorithm {other:?} needs a key pair; use HS256, HS384 or HS512"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub register_per_hour: u32,
    pub requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            register_per_hour: 10,
            requests_per_minute: 60,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the optional config file, and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, NaviconomyError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment.merge(Env::prefixed("NAVICONOMY_").split("__")))
    }

    fn extract(figment: Figment) -> Result<Self, NaviconomyError> {
        let cfg: Config = figment
            .extract()
            .map_err(|e| NaviconomyError::Config(e.to_string()))?;
        cfg.auth.algorithm()?;
        if cfg.database.min_connections > cfg.database.max_connections {
            return Err(NaviconomyError::Config(
                "database.min_connections exceeds database.max_connections".to_string(),
            ));
        }
        Ok(cfg)
    }

    /// Effective log filter; `debug` forces debug output.
    pub fn log_filter(&self) -> &str {
        if self.debug { "debug" } else { &self.loglevel }
    }
}
