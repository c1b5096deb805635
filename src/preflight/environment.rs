//! Access to the live process state the checks inspect.

use std::{collections::HashMap, path::PathBuf};

use crate::config::Config;

/// Source of the runtime facts a preflight pass reads.
pub trait Environment {
   /// Version string of the running runtime.
   fn runtime_version(&self) -> String;

   /// Live value of a named option, if set.
   fn option(&self, name: &str) -> Option<String>;

   /// Directory used for temporary files.
   fn temp_dir(&self) -> PathBuf;
}

/// The environment of the current process.
///
/// Options are read from environment variables. The runtime version is the
/// toolchain version the binary was built with unless overridden.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnvironment {
   runtime_version: Option<String>,
   temp_dir:        Option<PathBuf>,
}

impl ProcessEnvironment {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn from_config(cfg: &Config) -> Self {
      Self { runtime_version: cfg.runtime.version.clone(), temp_dir: cfg.temp_dir.clone() }
   }

   pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
      self.runtime_version = Some(version.into());
      self
   }

   pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
      self.temp_dir = Some(dir.into());
      self
   }
}

impl Environment for ProcessEnvironment {
   fn runtime_version(&self) -> String {
      self
         .runtime_version
         .clone()
         .unwrap_or_else(|| rustc_version_runtime::version().to_string())
   }

   fn option(&self, name: &str) -> Option<String> {
      std::env::var(name).ok()
   }

   fn temp_dir(&self) -> PathBuf {
      self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
   }
}

/// A fixed, in-memory environment.
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
   runtime_version: String,
   options:         HashMap<String, String>,
   temp_dir:        PathBuf,
}

impl StaticEnvironment {
   pub fn new(runtime_version: impl Into<String>, temp_dir: impl Into<PathBuf>) -> Self {
      Self {
         runtime_version: runtime_version.into(),
         options:         HashMap::new(),
         temp_dir:        temp_dir.into(),
      }
   }

   pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
      self.options.insert(name.into(), value.into());
      self
   }
}

impl Environment for StaticEnvironment {
   fn runtime_version(&self) -> String {
      self.runtime_version.clone()
   }

   fn option(&self, name: &str) -> Option<String> {
      self.options.get(name).cloned()
   }

   fn temp_dir(&self) -> PathBuf {
      self.temp_dir.clone()
   }
}
