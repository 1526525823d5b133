//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsforest/rsforest.toml`
//! 3. Local config: `./.rsforest.toml`
//! 4. Environment variables: `RSFOREST_*` prefix
//!
//! Command line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

const ENV_PREFIX: &str = "RSFOREST";
const LOCAL_CONFIG_FILE: &str = ".rsforest.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("serialize config: {0}")]
    Render(#[from] toml::ser::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Unified configuration for rsforest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Parent id handed to top-level nodes when walking (the "no parent" sentinel)
    pub root_id: i64,
    /// Refuse input with duplicate ids instead of letting the later node win
    pub strict: bool,
    /// Indentation width of pretty JSON output
    pub json_indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_id: 0,
            strict: false,
            json_indent: 2,
        }
    }
}

/// Get the XDG config directory for rsforest.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsforest").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsforest.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Environment source for `RSFOREST_*` overrides, e.g. `RSFOREST_ROOT_ID=7`.
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load settings from the standard locations.
    ///
    /// The local config file is looked up in the current directory.
    pub fn load() -> SettingsResult<Self> {
        let global = global_config_path();
        let local = std::env::current_dir()
            .ok()
            .map(|dir| local_config_path(&dir));
        Self::load_from(global.as_deref(), local.as_deref(), env_source())
    }

    /// Load settings with layered precedence from explicit sources.
    ///
    /// Missing files are skipped; keys not set anywhere keep their defaults.
    #[instrument(level = "debug", skip(env))]
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        env: Environment,
    ) -> SettingsResult<Self> {
        let mut builder = Config::builder();

        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                debug!("config file: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        let config = builder.add_source(env).build()?;
        let settings: Self = config.try_deserialize()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rsforest configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rsforest/rsforest.toml
#   Local:  ./.rsforest.toml
#   Env:    RSFOREST_* environment variables (e.g. RSFOREST_ROOT_ID=7)
#   Flags:  --root-id, --strict

# Parent id given to top-level nodes when walking
# root_id = 0

# Refuse input with duplicate ids (default: later node wins)
# strict = false

# Indentation of pretty JSON output
# json_indent = 2
"#
        .to_string()
    }
}
