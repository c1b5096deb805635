//! Startup preflight checks.
//!
//! A [`Preflight`] is built once, from a [`PreflightBuilder`] or from
//! [`Config`], and is immutable afterwards. [`Preflight::check`] runs the
//! checks in a fixed order and stops at the first failure:
//!
//! 1. runtime version against the configured [`RuntimePolicy`],
//! 2. required options against their live values,
//! 3. a throwaway file in the temp directory.

mod checks;
mod environment;

use serde::Serialize;

pub use self::{
   checks::{check_required_options, check_runtime_version, check_writable_temp_dir},
   environment::{Environment, ProcessEnvironment, StaticEnvironment},
};
use crate::{
   config::{Config, RequiredOption, RuntimePolicy},
   error::PreflightError,
};

/// Fluent registration of what a [`Preflight`] requires.
#[derive(Debug, Clone, Default)]
pub struct PreflightBuilder {
   options: Vec<RequiredOption>,
   runtime: RuntimePolicy,
}

impl PreflightBuilder {
   pub fn new() -> Self {
      Self::default()
   }

   /// Starts from the configured runtime policy and required options.
   pub fn from_config(cfg: &Config) -> Self {
      cfg.required_options
         .iter()
         .fold(Self::new().runtime_policy(cfg.runtime.clone()), |b, opt| {
            b.require_option(opt.name.clone(), opt.value.clone())
         })
   }

   /// Requires `name` to be set to `expected`.
   ///
   /// Registering a name again replaces its expected value but keeps its
   /// original position in the check order.
   pub fn require_option(mut self, name: impl Into<String>, expected: impl Into<String>) -> Self {
      let name = name.into();
      let value = expected.into();
      match self.options.iter_mut().find(|o| o.name == name) {
         Some(existing) => existing.value = value,
         None => self.options.push(RequiredOption { name, value }),
      }
      self
   }

   pub fn runtime_policy(mut self, policy: RuntimePolicy) -> Self {
      self.runtime = policy;
      self
   }

   pub fn build(self) -> Preflight {
      Preflight { options: self.options, runtime: self.runtime }
   }
}

/// An immutable set of startup requirements.
#[derive(Debug, Clone, Default)]
pub struct Preflight {
   options: Vec<RequiredOption>,
   runtime: RuntimePolicy,
}

impl Preflight {
   pub fn builder() -> PreflightBuilder {
      PreflightBuilder::new()
   }

   pub fn from_config(cfg: &Config) -> Self {
      PreflightBuilder::from_config(cfg).build()
   }

   pub fn required_options(&self) -> &[RequiredOption] {
      &self.options
   }

   pub fn runtime_policy(&self) -> &RuntimePolicy {
      &self.runtime
   }

   /// Runs every check in order; the first failure is returned.
   pub fn check(&self, env: &impl Environment) -> Result<(), PreflightError> {
      check_runtime_version(&env.runtime_version(), &self.runtime)?;
      check_required_options(&self.options, env)?;
      check_writable_temp_dir(&env.temp_dir())?;
      tracing::debug!("preflight checks passed");
      Ok(())
   }

   /// Runs every check without stopping and reports each outcome.
   pub fn diagnose(&self, env: &impl Environment) -> Vec<CheckOutcome> {
      let version = env.runtime_version();
      let temp_dir = env.temp_dir();
      vec![
         CheckOutcome::from_result(
            CheckCode::RuntimeVersion,
            check_runtime_version(&version, &self.runtime),
            format!("runtime {version}"),
         ),
         CheckOutcome::from_result(
            CheckCode::RequiredOptions,
            check_required_options(&self.options, env),
            format!("{} required option(s) set", self.options.len()),
         ),
         CheckOutcome::from_result(
            CheckCode::TempDirWritable,
            check_writable_temp_dir(&temp_dir),
            format!("{} is writable", temp_dir.display()),
         ),
      ]
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCode {
   RuntimeVersion,
   RequiredOptions,
   TempDirWritable,
}

impl CheckCode {
   pub fn as_str(self) -> &'static str {
      match self {
         Self::RuntimeVersion => "runtime_version",
         Self::RequiredOptions => "required_options",
         Self::TempDirWritable => "temp_dir_writable",
      }
   }
}

/// Result of one check in a [`Preflight::diagnose`] pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
   pub code:    CheckCode,
   pub ok:      bool,
   pub message: String,
}

impl CheckOutcome {
   fn from_result(code: CheckCode, result: Result<(), PreflightError>, ok_message: String) -> Self {
      match result {
         Ok(()) => Self { code, ok: true, message: ok_message },
         Err(e) => Self { code, ok: false, message: e.message().to_string() },
      }
   }
}

#[cfg(test)]
mod tests {
   use tempfile::TempDir;

   use super::*;

   #[test]
   fn last_registration_wins_in_first_position() {
      let preflight = Preflight::builder()
         .require_option("a", "1")
         .require_option("b", "2")
         .require_option("a", "3")
         .build();
      let names: Vec<_> = preflight
         .required_options()
         .iter()
         .map(|o| (o.name.as_str(), o.value.as_str()))
         .collect();
      assert_eq!(names, [("a", "3"), ("b", "2")]);
   }

   #[test]
   fn runtime_failure_short_circuits_later_checks() {
      let tmp = TempDir::new().unwrap();
      let missing = tmp.path().join("gone");
      let env = StaticEnvironment::new("1.4.2", &missing);
      let preflight = Preflight::builder().require_option("x", "y").build();
      let err = preflight.check(&env).unwrap_err();
      assert_eq!(err.message(), "Minimal required runtime version is 1.6. Got 1.4.2.");
   }

   #[test]
   fn diagnose_reports_every_check() {
      let tmp = TempDir::new().unwrap();
      let env = StaticEnvironment::new("1.4.2", tmp.path()).with_option("x", "y");
      let preflight = Preflight::builder().require_option("x", "y").build();
      let outcomes = preflight.diagnose(&env);
      let oks: Vec<_> = outcomes.iter().map(|o| (o.code, o.ok)).collect();
      assert_eq!(
         oks,
         [
            (CheckCode::RuntimeVersion, false),
            (CheckCode::RequiredOptions, true),
            (CheckCode::TempDirWritable, true),
         ]
      );
   }

   #[test]
   fn from_config_copies_policy_and_options() {
      let cfg = Config {
         required_options: vec![RequiredOption { name: "LANG".into(), value: "C.UTF-8".into() }],
         runtime: RuntimePolicy {
            minimum: "11".into(),
            unsupported_prefixes: vec!["1.8".into()],
            version: None,
         },
         ..Config::default()
      };
      let preflight = Preflight::from_config(&cfg);
      assert_eq!(preflight.required_options(), cfg.required_options.as_slice());
      assert_eq!(preflight.runtime_policy().minimum, "11");
   }
}
