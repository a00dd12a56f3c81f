//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/provctl/provctl.toml`
//! 3. Environment variables: `PROVCTL_*` prefix
//! 4. Command line flags (applied by the caller via `with_overrides`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::securityfs::DEFAULT_CONTROL_DIR;

/// Unified configuration for provctl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// securityfs directory of the provenance LSM
    pub control_dir: PathBuf,
    /// Exit nonzero on malformed booleans and failed control calls
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_dir: PathBuf::from(DEFAULT_CONTROL_DIR),
            strict: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub control_dir: Option<PathBuf>,
    pub strict: Option<bool>,
}

/// Get the XDG config directory for provctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "provctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("provctl.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            control_dir: overlay
                .control_dir
                .clone()
                .unwrap_or_else(|| self.control_dir.clone()),
            strict: overlay.strict.unwrap_or(self.strict),
        }
    }

    /// Load settings with layered precedence from the default locations.
    pub fn load() -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), Environment::with_prefix("PROVCTL"))
    }

    /// Load settings from an explicit config file and environment source.
    pub fn load_from(
        config_file: Option<&Path>,
        env: Environment,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current, env)
    }

    /// Apply environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env.prefix_separator("_").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("control_dir") {
            settings.control_dir = PathBuf::from(val);
        }
        match config.get_bool("strict") {
            Ok(val) => settings.strict = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    /// Apply command line overrides.
    pub fn with_overrides(mut self, control_dir: Option<PathBuf>, strict: bool) -> Self {
        if let Some(dir) = control_dir {
            self.control_dir = dir;
        }
        self.strict |= strict;
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Template config file with every key commented out.
    pub fn template() -> String {
        format!(
            r#"# provctl configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/provctl/provctl.toml
#   Env:    PROVCTL_* environment variables (PROVCTL_CONTROL_DIR, PROVCTL_STRICT)
#   Flags:  --control-dir, --strict

# securityfs directory of the provenance LSM
# control_dir = "{DEFAULT_CONTROL_DIR}"

# Exit nonzero on malformed booleans and failed control calls
# strict = false
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
