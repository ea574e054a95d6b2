// src/config.rs

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const CONFIG_PATH_VAR: &str = "DEMANDCAST_CONFIG";
pub const ENDPOINT_VAR: &str = "PREDICT_ENDPOINT";
pub const TIMEOUT_VAR: &str = "PREDICT_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid prediction endpoint {0:?}: expected an http(s) URL")]
    InvalidEndpoint(String),

    #[error("invalid request timeout {0:?}: expected whole seconds")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Url,
    pub request_timeout_secs: u64,
}

/// Shape of the optional YAML file; every key may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file (explicit `path`, else `DEMANDCAST_CONFIG`),
    /// then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));

        let mut cfg = Config::default();
        if let Some(path) = path {
            cfg.merge_file(&path)?;
        }
        cfg.merge_env(|key| env::var(key).ok())?;
        debug!(endpoint = %cfg.endpoint, timeout = cfg.request_timeout_secs, "config loaded");
        Ok(cfg)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file deserializes to `null`.
        let file: Option<FileConfig> =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        let file = file.unwrap_or_default();

        if let Some(endpoint) = file.endpoint {
            self.set_endpoint(&endpoint)?;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        Ok(())
    }

    /// Apply `PREDICT_ENDPOINT` / `PREDICT_TIMEOUT_SECS` as returned by `lookup`.
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|v| !v.trim().is_empty()) {
            self.set_endpoint(&endpoint)?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            self.request_timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
        }
        Ok(())
    }

    pub fn set_endpoint(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.endpoint = parse_endpoint(raw)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidEndpoint(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::InvalidEndpoint(raw.to_string())),
    }
}
