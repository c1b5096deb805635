//! System health check command.
//!
//! Runs every preflight check without stopping at the first failure and
//! reports each result, plus the configuration that was used.

use console::style;
use serde::Serialize;

use crate::{
   Result,
   config::{self, Config},
   preflight::{CheckOutcome, Environment, ProcessEnvironment},
};

#[derive(Serialize)]
struct DoctorJson<'a> {
   schema_version:  u32,
   ok:              bool,
   runtime_version: String,
   config_file:     String,
   checks:          &'a [CheckOutcome],
}

/// Executes the doctor command to check system health.
pub fn execute(cfg: &Config, extra_options: Vec<String>, json: bool) -> Result<()> {
   let preflight = super::check::build_preflight(cfg, &extra_options)?;
   let env = ProcessEnvironment::from_config(cfg);
   let checks = preflight.diagnose(&env);
   let ok = checks.iter().all(|c| c.ok);

   if json {
      let payload = DoctorJson {
         schema_version: 1,
         ok,
         runtime_version: env.runtime_version(),
         config_file: config::config_file_path().display().to_string(),
         checks: &checks,
      };
      println!("{}", serde_json::to_string_pretty(&payload)?);
      return Ok(());
   }

   println!("{}\n", style("bootcheck Doctor").bold());
   for check in &checks {
      let symbol = if check.ok {
         style("✓").green()
      } else {
         style("✗").red()
      };
      println!("{} {} - {}", symbol, check.code.as_str(), check.message);
   }

   println!(
      "\n{} {} {} | runtime: {} | config: {}",
      style("System:").dim(),
      std::env::consts::OS,
      std::env::consts::ARCH,
      env.runtime_version(),
      style(config::config_file_path().display()).dim()
   );

   if ok {
      println!("\n{}", style("✓ All checks passed.").green().bold());
   } else {
      println!("\n{}", style("✗ Some checks failed.").red().bold());
   }

   Ok(())
}
