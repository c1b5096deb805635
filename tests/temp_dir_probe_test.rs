use bootcheck::preflight::{Preflight, ProcessEnvironment, check_writable_temp_dir};
use tempfile::TempDir;

#[test]
fn probe_accepts_local_fs() {
   let dir = TempDir::new().expect("temp dir");
   check_writable_temp_dir(dir.path()).expect("probe temp dir");
   assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[test]
fn probe_rejects_a_regular_file() {
   let dir = TempDir::new().expect("temp dir");
   let file = dir.path().join("not-a-dir");
   std::fs::write(&file, b"x").expect("write file");

   let err = check_writable_temp_dir(&file).unwrap_err();
   let prefix = format!("Temp directory is not writable: {}. Reason: ", file.display());
   assert!(err.message().starts_with(&prefix), "{}", err.message());
   assert!(err.message().ends_with('.'));
}

#[test]
fn process_environment_uses_configured_temp_dir() {
   let dir = TempDir::new().expect("temp dir");
   let missing = dir.path().join("gone");
   let env = ProcessEnvironment::new()
      .with_runtime_version("21.0.1")
      .with_temp_dir(&missing);

   let err = Preflight::builder().build().check(&env).unwrap_err();
   assert!(err.message().contains(&missing.display().to_string()));

   let ok_env = ProcessEnvironment::new()
      .with_runtime_version("21.0.1")
      .with_temp_dir(dir.path());
   Preflight::builder().build().check(&ok_env).expect("check");
}
