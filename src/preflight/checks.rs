//! The individual preflight checks.
//!
//! Each check is a free function so it can be exercised on its own; the
//! fixed order lives in [`super::Preflight::check`].

use std::path::Path;

use crate::{
   config::{RequiredOption, RuntimePolicy},
   error::PreflightError,
   preflight::Environment,
};

/// Fails when `version` falls under one of the policy's unsupported prefixes.
pub fn check_runtime_version(version: &str, policy: &RuntimePolicy) -> Result<(), PreflightError> {
   let rejected = policy
      .unsupported_prefixes
      .iter()
      .any(|prefix| has_dotted_prefix(version, prefix));
   if rejected {
      return Err(PreflightError::new(format!(
         "Minimal required runtime version is {}. Got {version}.",
         policy.minimum
      )));
   }
   tracing::debug!(version, "runtime version accepted");
   Ok(())
}

/// Fails on the first option, in registration order, whose live value is
/// missing or differs from the required one.
pub fn check_required_options(
   options: &[RequiredOption],
   env: &impl Environment,
) -> Result<(), PreflightError> {
   for opt in options {
      let live = env.option(&opt.name);
      if live.as_deref() != Some(opt.value.as_str()) {
         return Err(PreflightError::new(format!(
            "Option '{}' must be set to '{}'. Got '{}'.",
            opt.name,
            opt.value,
            live.unwrap_or_default()
         )));
      }
   }
   tracing::debug!(count = options.len(), "required options match");
   Ok(())
}

/// Creates and removes a throwaway file in `dir`.
///
/// Only creation decides the outcome; a failed removal is logged and ignored.
pub fn check_writable_temp_dir(dir: &Path) -> Result<(), PreflightError> {
   let file = tempfile::Builder::new()
      .prefix("check")
      .suffix("tmp")
      .tempfile_in(dir)
      .map_err(|e| {
         PreflightError::new(format!(
            "Temp directory is not writable: {}. Reason: {}.",
            dir.display(),
            io_reason(&e)
         ))
      })?;

   if let Err(e) = file.close() {
      tracing::debug!("failed to remove temp probe in {}: {e}", dir.display());
   }
   tracing::debug!(dir = %dir.display(), "temp directory writable");
   Ok(())
}

/// `version` starts with `prefix` without extending its last number, so "1.5"
/// covers "1.5.0_22" but not "1.50", while "1." covers any "1.x".
fn has_dotted_prefix(version: &str, prefix: &str) -> bool {
   let Some(rest) = version.strip_prefix(prefix) else {
      return false;
   };
   let is_digit = |c: char| c.is_ascii_digit();
   !(prefix.ends_with(is_digit) && rest.starts_with(is_digit))
}

// tempfile wraps the OS error together with the attempted path; the path is
// already part of the message, so only the underlying cause is kept.
fn io_reason(e: &std::io::Error) -> String {
   e.get_ref()
      .and_then(|inner| inner.source())
      .map_or_else(|| e.to_string(), |src| src.to_string())
}

#[cfg(test)]
mod tests {
   use tempfile::TempDir;

   use super::*;
   use crate::preflight::StaticEnvironment;

   fn opt(name: &str, value: &str) -> RequiredOption {
      RequiredOption { name: name.into(), value: value.into() }
   }

   #[test]
   fn legacy_runtimes_are_rejected() {
      let policy = RuntimePolicy::default();
      for version in ["1.3.1", "1.4.2_19", "1.5.0_22", "1.5"] {
         let err = check_runtime_version(version, &policy).unwrap_err();
         assert_eq!(
            err.message(),
            format!("Minimal required runtime version is 1.6. Got {version}.")
         );
      }
   }

   #[test]
   fn current_runtimes_are_accepted() {
      let policy = RuntimePolicy::default();
      for version in ["1.6.0", "1.8.0_292", "11.0.2", "17", "1.50.0", "1.45.2"] {
         check_runtime_version(version, &policy).unwrap();
      }
   }

   #[test]
   fn dotted_prefix_boundaries() {
      assert!(has_dotted_prefix("1.5", "1.5"));
      assert!(has_dotted_prefix("1.5.0", "1.5"));
      assert!(has_dotted_prefix("1.5_11", "1.5"));
      assert!(!has_dotted_prefix("1.51", "1.5"));
      assert!(!has_dotted_prefix("11.5", "1.5"));
      assert!(has_dotted_prefix("1.8.0", "1."));
   }

   #[test]
   fn missing_option_reports_empty_value() {
      let tmp = TempDir::new().unwrap();
      let env = StaticEnvironment::new("17", tmp.path());
      let err = check_required_options(&[opt("file.encoding", "UTF-8")], &env).unwrap_err();
      assert_eq!(err.message(), "Option 'file.encoding' must be set to 'UTF-8'. Got ''.");
   }

   #[test]
   fn first_mismatch_in_registration_order_wins() {
      let tmp = TempDir::new().unwrap();
      let env = StaticEnvironment::new("17", tmp.path())
         .with_option("a", "ok")
         .with_option("b", "wrong")
         .with_option("c", "also-wrong");
      let options = [opt("a", "ok"), opt("c", "right"), opt("b", "right")];
      let err = check_required_options(&options, &env).unwrap_err();
      assert_eq!(err.message(), "Option 'c' must be set to 'right'. Got 'also-wrong'.");
   }

   #[test]
   fn writable_dir_leaves_nothing_behind() {
      let tmp = TempDir::new().unwrap();
      check_writable_temp_dir(tmp.path()).unwrap();
      assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
   }

   #[test]
   fn missing_dir_names_the_path() {
      let tmp = TempDir::new().unwrap();
      let missing = tmp.path().join("does-not-exist");
      let err = check_writable_temp_dir(&missing).unwrap_err();
      let expected = format!("Temp directory is not writable: {}. Reason: ", missing.display());
      assert!(err.message().starts_with(&expected), "{}", err.message());
   }
}
