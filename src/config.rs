//! Configuration for preflight policy and the migration driver.
//!
//! Values are layered: built-in defaults, then `~/.bootcheck/config.toml` (or
//! an explicit file), then `BOOTCHECK_`-prefixed environment variables.

use std::{
   path::{Path, PathBuf},
   sync::OnceLock,
};

use directories::BaseDirs;
use figment::{
   Figment,
   providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const DEFAULT_MIGRATION_BATCH_SIZE: usize = 250;
pub const MAX_MIGRATION_BATCH_SIZE: usize = 10_000;

/// An option that must carry an exact value in the live environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredOption {
   pub name:  String,
   pub value: String,
}

/// Runtime version threshold.
///
/// `minimum` is only used in the failure message; the decision is made by
/// `unsupported_prefixes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimePolicy {
   pub minimum:              String,
   pub unsupported_prefixes: Vec<String>,
   /// Overrides the detected runtime version when set.
   pub version:              Option<String>,
}

impl Default for RuntimePolicy {
   fn default() -> Self {
      Self {
         minimum:              "1.6".to_string(),
         unsupported_prefixes: vec!["1.3".to_string(), "1.4".to_string(), "1.5".to_string()],
         version:              None,
      }
   }
}

/// Application configuration loaded from config file and environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
   pub required_options:     Vec<RequiredOption>,
   pub runtime:              RuntimePolicy,
   pub temp_dir:             Option<PathBuf>,
   pub database:             PathBuf,
   pub migration_batch_size: usize,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         required_options:     Vec::new(),
         runtime:              RuntimePolicy::default(),
         temp_dir:             None,
         database:             base_dir().join("properties.db"),
         migration_batch_size: DEFAULT_MIGRATION_BATCH_SIZE,
      }
   }
}

impl Config {
   /// Loads defaults, the global config file if present, and the environment.
   pub fn load() -> Result<Self> {
      Self::load_from(None)
   }

   /// Loads configuration with `path` in place of the global file.
   ///
   /// A missing file leaves the defaults in place. A file that exists but does
   /// not parse or validate is an error: the required options it lists must
   /// never be dropped silently.
   pub fn load_from(path: Option<&Path>) -> Result<Self> {
      let file = path.map_or_else(config_file_path, Path::to_path_buf);
      let figment = Figment::from(Serialized::defaults(Self::default()))
         .merge(Toml::file(file))
         .merge(Env::prefixed("BOOTCHECK_").split("__").lowercase(true));
      let cfg: Self = figment
         .extract()
         .map_err(ConfigError::from)
         .inspect_err(|e| tracing::warn!("failed to parse config: {e}"))?;
      cfg.validate()
         .inspect_err(|e| tracing::warn!("rejected config: {e}"))?;
      Ok(cfg)
   }

   /// Rejects values the checks and the migration driver cannot use.
   pub fn validate(&self) -> Result<()> {
      if self.migration_batch_size == 0 {
         return Err(ConfigError::Invalid("migration_batch_size must be at least 1".into()).into());
      }
      if self.migration_batch_size > MAX_MIGRATION_BATCH_SIZE {
         return Err(
            ConfigError::Invalid(format!(
               "migration_batch_size {} exceeds hard cap {}",
               self.migration_batch_size, MAX_MIGRATION_BATCH_SIZE
            ))
            .into(),
         );
      }
      if let Some(opt) = self.required_options.iter().find(|o| o.name.trim().is_empty()) {
         return Err(
            ConfigError::Invalid(format!("required option with value '{}' has no name", opt.value))
               .into(),
         );
      }
      if self.runtime.unsupported_prefixes.iter().any(|p| p.trim().is_empty()) {
         return Err(
            ConfigError::Invalid("runtime.unsupported_prefixes contains an empty prefix".into())
               .into(),
         );
      }
      Ok(())
   }
}

/// Returns the base directory for bootcheck configuration and data
pub fn base_dir() -> &'static PathBuf {
   static ONCE: OnceLock<PathBuf> = OnceLock::new();
   ONCE.get_or_init(|| resolve_base_dir(".bootcheck"))
}

pub fn config_file_path() -> PathBuf {
   base_dir().join("config.toml")
}

fn resolve_base_dir(dir_name: &str) -> PathBuf {
   BaseDirs::new()
      .map(|d| d.home_dir().join(dir_name))
      .or_else(|| {
         std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(dir_name))
      })
      .unwrap_or_else(|| {
         std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(dir_name)
      })
}
