//! Compliance configuration.
//!
//! [`ComplianceConfig`] is the plain value consulted by every resolution:
//! the global enable switch, the debug-logging gate, the identifier namespace
//! and a few naming limits. [`SharedConfig`] wraps it for the application or
//! test harness that owns it and hands it to the engine.
//!
//! # Loading
//!
//! The engine only defines the in-memory shape. The loaders below cover the
//! usual sources:
//!
//! ```ignore
//! use horizon_lattice_compliance::ComplianceConfig;
//!
//! let mut config = ComplianceConfig::from_toml_file("compliance.toml")?;
//! config.apply_env()?;
//! ```
//!
//! ```toml
//! namespace = "MyApp"
//! global_enable = true
//! debug_logging = false
//! max_segment_length = 48
//! platform = "ios"
//! ```
//!
//! # Threading
//!
//! A build pass takes one [`SharedConfig::snapshot`] when it starts and
//! resolves every node against that snapshot. Writes from another thread
//! become visible at the next pass; the caller orders such writes before the
//! pass they are meant to affect.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::logging::targets;
use crate::sanitize::{DEFAULT_MAX_LENGTH, MIN_LENGTH};
use crate::visual::{ParsePlatformError, Platform};

/// Environment variable overriding [`ComplianceConfig::global_enable`].
pub const ENV_ENABLED: &str = "LATTICE_COMPLIANCE_ENABLED";
/// Environment variable overriding [`ComplianceConfig::debug_logging`].
pub const ENV_DEBUG: &str = "LATTICE_COMPLIANCE_DEBUG";
/// Environment variable overriding [`ComplianceConfig::namespace`].
pub const ENV_NAMESPACE: &str = "LATTICE_COMPLIANCE_NAMESPACE";
/// Environment variable overriding [`ComplianceConfig::max_segment_length`].
pub const ENV_MAX_SEGMENT: &str = "LATTICE_COMPLIANCE_MAX_SEGMENT";
/// Environment variable overriding [`ComplianceConfig::platform`].
pub const ENV_PLATFORM: &str = "LATTICE_COMPLIANCE_PLATFORM";

/// Process-wide identifier/label configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Generate identifiers for nodes without local overrides.
    pub global_enable: bool,
    /// Send every resolution outcome to the diagnostic sink.
    pub debug_logging: bool,
    /// Leading identifier segment. Empty means no namespace segment.
    pub namespace: String,
    /// Upper bound on each sanitized identifier segment.
    pub max_segment_length: usize,
    /// Platform used for visual-compliance lookups.
    pub platform: Platform,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            global_enable: true,
            debug_logging: false,
            namespace: String::new(),
            max_segment_length: DEFAULT_MAX_LENGTH,
            platform: Platform::current(),
        }
    }
}

impl ComplianceConfig {
    /// Create the default configuration under `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Set the global enable switch.
    pub fn with_global_enable(mut self, enabled: bool) -> Self {
        self.global_enable = enabled;
        self
    }

    /// Set the debug-logging gate.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Set the visual-compliance platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the per-segment length bound.
    pub fn with_max_segment_length(mut self, max: usize) -> Self {
        self.max_segment_length = max;
        self
    }

    /// Check that every field holds a usable value.
    pub fn validate(&self) -> Result<()> {
        if self.max_segment_length < MIN_LENGTH {
            return Err(ConfigError::invalid_value(
                "max_segment_length",
                format!("must be at least {MIN_LENGTH}, got {}", self.max_segment_length),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            namespace = %config.namespace,
            "loaded compliance config"
        );
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ConfigError::parse("TOML", e.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Unset variables leave the field untouched. The result is validated.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ENABLED) {
            self.global_enable = parse_bool(ENV_ENABLED, &value)?;
        }
        if let Some(value) = lookup(ENV_DEBUG) {
            self.debug_logging = parse_bool(ENV_DEBUG, &value)?;
        }
        if let Some(value) = lookup(ENV_NAMESPACE) {
            self.namespace = value;
        }
        if let Some(value) = lookup(ENV_MAX_SEGMENT) {
            self.max_segment_length = value.trim().parse().map_err(|_| {
                ConfigError::invalid_value(ENV_MAX_SEGMENT, format!("'{value}' is not a length"))
            })?;
        }
        if let Some(value) = lookup(ENV_PLATFORM) {
            self.platform = value.parse().map_err(|e: ParsePlatformError| {
                ConfigError::invalid_value(ENV_PLATFORM, e.to_string())
            })?;
        }
        self.validate()
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => {
            tracing::warn!(target: targets::CONFIG, field, value, "unrecognised boolean");
            Err(ConfigError::invalid_value(field, format!("'{value}' is not a boolean")))
        }
    }
}

/// A [`ComplianceConfig`] shared between its owner and the build passes.
///
/// Cloning is cheap and every clone refers to the same configuration.
/// Writes go through the explicit setters; readers take a
/// [`snapshot`](Self::snapshot).
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<ComplianceConfig>>,
}

impl SharedConfig {
    /// Wrap `config`.
    pub fn new(config: ComplianceConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// A consistent copy of the current configuration.
    pub fn snapshot(&self) -> ComplianceConfig {
        self.inner.read().clone()
    }

    /// Access the configuration through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ComplianceConfig) -> R,
    {
        f(&self.inner.read())
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: ComplianceConfig) -> ComplianceConfig {
        std::mem::replace(&mut *self.inner.write(), config)
    }

    /// Set the global enable switch.
    pub fn set_global_enable(&self, enabled: bool) {
        self.inner.write().global_enable = enabled;
    }

    /// Set the debug-logging gate.
    pub fn set_debug_logging(&self, enabled: bool) {
        self.inner.write().debug_logging = enabled;
    }

    /// Set the namespace.
    pub fn set_namespace(&self, namespace: impl Into<String>) {
        self.inner.write().namespace = namespace.into();
    }

    /// Set the visual-compliance platform.
    pub fn set_platform(&self, platform: Platform) {
        self.inner.write().platform = platform;
    }

    /// Set the per-segment length bound.
    ///
    /// Values below the sanitizer minimum are rejected and leave the
    /// configuration unchanged.
    pub fn set_max_segment_length(&self, max: usize) -> Result<()> {
        let mut config = self.inner.write();
        let candidate = ComplianceConfig {
            max_segment_length: max,
            ..config.clone()
        };
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl From<ComplianceConfig> for SharedConfig {
    fn from(config: ComplianceConfig) -> Self {
        Self::new(config)
    }
}

static_assertions::assert_impl_all!(SharedConfig: Send, Sync);
static_assertions::assert_impl_all!(ComplianceConfig: Send, Sync);
