//! Configuration for the lifetime demo.
//!
//! Settings come from three layers, later layers winning: built-in defaults,
//! an optional JSON or YAML file, and environment variables prefixed with
//! `LIFETIME_DEMO_`.

use std::collections::HashSet;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CapabilityKey, Lifetime, RegistrationModule, Registrations};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "LIFETIME_DEMO";

/// Capability key of the per-request operation.
pub const OPERATION_TRANSIENT: CapabilityKey = CapabilityKey::from_static("operation.transient");
/// Capability key of the per-scope operation.
pub const OPERATION_SCOPED: CapabilityKey = CapabilityKey::from_static("operation.scoped");
/// Capability key of the per-process operation.
pub const OPERATION_SINGLETON: CapabilityKey = CapabilityKey::from_static("operation.singleton");

/// Configuration loading and validation errors
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    Io(String, std::io::Error),
    /// Configuration text could not be parsed
    Parse(String),
    /// Parsed configuration is inconsistent
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, err) => write!(f, "Failed to read config {}: {}", path, err),
            ConfigError::Parse(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Configuration rejected: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

/// One capability binding as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub key: CapabilityKey,
    pub lifetime: Lifetime,
}

impl Binding {
    pub fn new(key: impl Into<CapabilityKey>, lifetime: Lifetime) -> Self {
        Self {
            key: key.into(),
            lifetime,
        }
    }
}

/// Demo server settings and the capability binding table.
///
/// # Examples
///
/// ```
/// use lifetime_registry::config::DemoConfig;
/// use lifetime_registry::Lifetime;
///
/// let config = DemoConfig::from_json_str(r#"{
///     "bind_addr": "0.0.0.0:8080",
///     "bindings": [
///         { "key": "clock", "lifetime": "singleton" },
///         { "key": "request", "lifetime": "per_scope" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(config.bind_addr.port(), 8080);
/// assert_eq!(config.bindings[0].lifetime, Lifetime::PerProcess);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub bind_addr: SocketAddr,
    pub bindings: Vec<Binding>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            bindings: vec![
                Binding::new(OPERATION_TRANSIENT, Lifetime::PerRequest),
                Binding::new(OPERATION_SCOPED, Lifetime::PerScope),
                Binding::new(OPERATION_SINGLETON, Lifetime::PerProcess),
            ],
        }
    }
}

impl DemoConfig {
    /// Parses a JSON document. Missing fields fall back to defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML document. Missing fields fall back to defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file; `.yaml`/`.yml` files are parsed as YAML,
    /// everything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    /// Loads defaults, then `path` when given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Applies `LIFETIME_DEMO_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Recognised variables: `LIFETIME_DEMO_BIND_ADDR`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = format!("{}_BIND_ADDR", ENV_PREFIX);
        if let Some(value) = lookup(&name) {
            self.bind_addr = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{} is not a socket address: {}", name, value)))?;
        }
        Ok(())
    }

    /// Checks binding keys are non-empty and unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for binding in &self.bindings {
            if binding.key.as_str().trim().is_empty() {
                return Err(ConfigError::Invalid("binding key must not be empty".to_string()));
            }
            if !seen.insert(&binding.key) {
                return Err(ConfigError::Invalid(format!(
                    "capability bound more than once: {}",
                    binding.key
                )));
            }
        }
        Ok(())
    }
}

impl RegistrationModule for &DemoConfig {
    fn register(self, registrations: &mut Registrations) {
        registrations.add_bindings(
            self.bindings
                .iter()
                .map(|binding| (binding.key.clone(), binding.lifetime)),
        );
    }
}
