//! Release run configuration
//!
//! The run is driven by environment variables (optionally seeded from a
//! `.env` file). A TOML settings file may provide defaults for the tooling
//! knobs; environment variables always win over it. Everything is read and
//! validated once at startup and then passed down explicitly.

use crate::core::constants::{env, generator};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default settings file, only read when present
const DEFAULT_CONFIG_PATH: &str = "release.toml";

/// Default timeout for fetching documents over HTTP, in seconds
const DEFAULT_HTTP_TIMEOUT: u64 = 60;

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Tooling defaults that may come from the settings file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseSettings {
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default)]
    pub workspace: Option<PathBuf>,
    #[serde(default)]
    pub push: Option<bool>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub http_timeout: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    #[serde(default)]
    release: ReleaseSettings,
}

impl ReleaseSettings {
    /// Load settings from a TOML file
    ///
    /// A missing file yields defaults unless `required` is set, which is the
    /// case when the path was given explicitly through `CONFIG_PATH`.
    pub fn from_file<P: AsRef<Path>>(path: P, required: bool) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: TomlConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(config.release)
    }
}

/// Configuration of one release run
#[derive(Debug, Clone)]
pub struct Config {
    /// Stop the whole run after the first SDK has been tagged
    pub dry_run: bool,

    /// Path or URL of the OpenAPI specification
    pub api_spec: String,

    /// Path or URL of the SDK definitions document
    pub definition_file: String,

    /// Requested SDK identifiers, in processing order
    pub sdks: Vec<String>,

    /// GitHub organization the SDK repositories live in
    pub org_name: String,

    /// Code generator binary
    pub generator: String,

    /// Directory the repositories are cloned into
    pub workspace: PathBuf,

    /// Push branches and tags after tagging
    pub push: bool,

    /// Logging level
    pub log_level: String,

    /// Timeout for fetching documents over HTTP, in seconds
    pub http_timeout: u64,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// A `.env` file in the current directory is applied first; variables
    /// already set in the environment are not overridden by it.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `YML`, `DEFINITION_FILE` or `ORG_NAME` is missing or empty while
    ///   `SDKS` names at least one SDK
    /// - `PUSH` or `HTTP_TIMEOUT` has an unparseable value
    /// - The settings file exists but cannot be read or parsed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit_path = lookup(env::CONFIG_PATH).filter(|p| !p.is_empty());
        let settings = match &explicit_path {
            Some(path) => ReleaseSettings::from_file(path, true)?,
            None => ReleaseSettings::from_file(DEFAULT_CONFIG_PATH, false)?,
        };

        let sdks = parse_sdk_list(lookup(env::SDKS).as_deref().unwrap_or_default());

        // With nothing to release the document locations are never used.
        let required = |name: &'static str| match lookup(name).filter(|value| !value.is_empty()) {
            Some(value) => Ok(value),
            None if sdks.is_empty() => Ok(String::new()),
            None => Err(ConfigError::Missing(name)),
        };

        let push = match lookup(env::PUSH) {
            Some(value) => parse_flag(env::PUSH, &value)?,
            None => settings.push.unwrap_or(false),
        };

        let http_timeout = match lookup(env::HTTP_TIMEOUT) {
            Some(value) => value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: env::HTTP_TIMEOUT,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => settings.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
        };

        Ok(Config {
            dry_run: lookup(env::DRY_RUN).is_some_and(|value| !value.is_empty()),
            api_spec: required(env::API_SPEC)?,
            definition_file: required(env::DEFINITION_FILE)?,
            org_name: required(env::ORG_NAME)?,
            generator: lookup(env::GENERATOR)
                .filter(|value| !value.is_empty())
                .or(settings.generator)
                .unwrap_or_else(|| generator::DEFAULT_BIN.to_string()),
            workspace: lookup(env::WORKSPACE_DIR)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .or(settings.workspace)
                .unwrap_or_else(|| PathBuf::from(".")),
            push,
            log_level: lookup(env::LOG_LEVEL)
                .or(settings.log_level)
                .unwrap_or_else(|| "info".to_string()),
            http_timeout,
            sdks,
        })
    }
}

/// Split a comma separated SDK list, keeping order and dropping blanks
pub fn parse_sdk_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|sdk| !sdk.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
