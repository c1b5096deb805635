//! Fail-fast preflight command.

use console::style;

use crate::{
   Result,
   config::{Config, RequiredOption},
   error::ConfigError,
   preflight::{Preflight, PreflightBuilder, ProcessEnvironment},
};

/// Runs the preflight checks; the first failure aborts with its message.
pub fn execute(cfg: &Config, extra_options: Vec<String>, quiet: bool) -> Result<()> {
   let preflight = build_preflight(cfg, &extra_options)?;

   preflight.check(&ProcessEnvironment::from_config(cfg))?;

   if !quiet {
      println!("{}", style("✓ Preflight checks passed.").green().bold());
   }
   Ok(())
}

/// Configured requirements plus `NAME=VALUE` arguments; arguments override
/// configured values for the same name.
pub(crate) fn build_preflight(cfg: &Config, extra_options: &[String]) -> Result<Preflight> {
   let mut builder = PreflightBuilder::from_config(cfg);
   for arg in extra_options {
      let opt = parse_option_arg(arg)?;
      builder = builder.require_option(opt.name, opt.value);
   }
   Ok(builder.build())
}

/// Parses a `NAME=VALUE` command-line option.
pub fn parse_option_arg(arg: &str) -> Result<RequiredOption> {
   match arg.split_once('=') {
      Some((name, value)) if !name.trim().is_empty() => {
         Ok(RequiredOption { name: name.trim().to_string(), value: value.to_string() })
      },
      _ => Err(ConfigError::InvalidOptionArg(arg.to_string()).into()),
   }
}
