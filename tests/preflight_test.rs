use bootcheck::{
   PreflightError,
   config::RuntimePolicy,
   preflight::{CheckCode, Preflight, StaticEnvironment, check_runtime_version},
};
use proptest::prelude::*;
use tempfile::TempDir;

fn preflight_with(options: &[(&str, &str)]) -> Preflight {
   options
      .iter()
      .fold(Preflight::builder(), |b, (name, value)| b.require_option(*name, *value))
      .build()
}

#[test]
fn passes_when_every_requirement_holds() {
   let tmp = TempDir::new().expect("temp dir");
   let env = StaticEnvironment::new("17.0.2", tmp.path())
      .with_option("file.encoding", "UTF-8")
      .with_option("java.awt.headless", "true");
   let preflight = preflight_with(&[("file.encoding", "UTF-8"), ("java.awt.headless", "true")]);

   preflight.check(&env).expect("check");
   assert_eq!(std::fs::read_dir(tmp.path()).expect("read dir").count(), 0);
}

#[test]
fn names_the_first_mismatch_in_registration_order() {
   let tmp = TempDir::new().expect("temp dir");
   let env = StaticEnvironment::new("11.0.2", tmp.path()).with_option("b", "2");
   let preflight = preflight_with(&[("b", "2"), ("a", "1"), ("c", "3")]);

   let err = preflight.check(&env).unwrap_err();
   assert_eq!(err, PreflightError::new("Option 'a' must be set to '1'. Got ''."));
}

#[test]
fn re_registered_option_uses_the_last_value() {
   let tmp = TempDir::new().expect("temp dir");
   let env = StaticEnvironment::new("11", tmp.path()).with_option("mode", "server");
   let preflight = Preflight::builder()
      .require_option("mode", "client")
      .require_option("mode", "server")
      .build();

   preflight.check(&env).expect("check");
}

#[test]
fn option_failure_stops_before_temp_dir_probe() {
   let tmp = TempDir::new().expect("temp dir");
   let env = StaticEnvironment::new("11", tmp.path().join("missing")).with_option("x", "no");
   let err = preflight_with(&[("x", "yes")]).check(&env).unwrap_err();
   assert_eq!(err.message(), "Option 'x' must be set to 'yes'. Got 'no'.");
}

#[test]
fn custom_runtime_policy_is_honored() {
   let tmp = TempDir::new().expect("temp dir");
   let policy = RuntimePolicy {
      minimum:              "11".into(),
      unsupported_prefixes: vec!["1.".into(), "9".into(), "10".into()],
      version:              None,
   };
   let preflight = Preflight::builder().runtime_policy(policy).build();

   let err = preflight
      .check(&StaticEnvironment::new("1.8.0_292", tmp.path()))
      .unwrap_err();
   assert_eq!(err.message(), "Minimal required runtime version is 11. Got 1.8.0_292.");
   preflight
      .check(&StaticEnvironment::new("17.0.1", tmp.path()))
      .expect("17 passes");
}

#[test]
fn diagnose_continues_past_failures() {
   let tmp = TempDir::new().expect("temp dir");
   let env = StaticEnvironment::new("1.5.0", tmp.path().join("missing"));
   let outcomes = preflight_with(&[("x", "1")]).diagnose(&env);

   assert_eq!(outcomes.len(), 3);
   assert!(outcomes.iter().all(|o| !o.ok));
   assert_eq!(outcomes[2].code, CheckCode::TempDirWritable);
   assert!(outcomes[2].message.starts_with("Temp directory is not writable: "));

   let json = serde_json::to_value(&outcomes[0]).expect("json");
   assert_eq!(json["code"], "runtime_version");
}

proptest! {
   #[test]
   fn legacy_versions_always_fail(
      prefix in prop::sample::select(vec!["1.3", "1.4", "1.5"]),
      tail in "(\\.[0-9]{1,2}){0,2}(_[0-9]{1,3})?",
   ) {
      let version = format!("{prefix}{tail}");
      prop_assert!(check_runtime_version(&version, &RuntimePolicy::default()).is_err());
   }

   #[test]
   fn modern_versions_always_pass(
      major in 6u32..=9,
      minor in 0u32..=9,
      modern in 10u32..=40,
      use_modern in any::<bool>(),
   ) {
      let version = if use_modern {
         format!("{modern}.{minor}.1")
      } else {
         format!("1.{major}.{minor}")
      };
      prop_assert!(check_runtime_version(&version, &RuntimePolicy::default()).is_ok());
   }
}
