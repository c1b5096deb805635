//! Runs the global issue subscription cleanup against a properties database.

use std::path::PathBuf;

use console::style;
use serde::Serialize;

use crate::{
   Error, Result,
   config::{Config, MAX_MIGRATION_BATCH_SIZE},
   migrate::{DataChange, DeleteGlobalIssueSubscriptions, run_data_change},
   store,
};

#[derive(Serialize)]
struct DryRunJson {
   migration:  &'static str,
   database:   String,
   candidates: u64,
}

pub fn execute(
   cfg: &Config,
   database: Option<PathBuf>,
   batch_size: Option<usize>,
   dry_run: bool,
   json: bool,
) -> Result<()> {
   let path = database.unwrap_or_else(|| cfg.database.clone());
   let batch_size = batch_size.unwrap_or(cfg.migration_batch_size);
   if batch_size == 0 || batch_size > MAX_MIGRATION_BATCH_SIZE {
      return Err(Error::Migration {
         name:   DeleteGlobalIssueSubscriptions.name(),
         reason: format!("batch size must be between 1 and {MAX_MIGRATION_BATCH_SIZE}"),
      });
   }
   if !path.exists() {
      return Err(Error::Migration {
         name:   DeleteGlobalIssueSubscriptions.name(),
         reason: format!("database not found: {}", path.display()),
      });
   }

   let conn = store::open(&path)?;

   if dry_run {
      let candidates = DeleteGlobalIssueSubscriptions::count_candidates(&conn)?;
      if json {
         let payload = DryRunJson {
            migration: DeleteGlobalIssueSubscriptions.name(),
            database: path.display().to_string(),
            candidates,
         };
         println!("{}", serde_json::to_string_pretty(&payload)?);
      } else {
         println!(
            "{} {} subscription(s) would be deleted from {}",
            style("ℹ").cyan(),
            candidates,
            style(path.display()).dim()
         );
      }
      return Ok(());
   }

   let report = run_data_change(&conn, &DeleteGlobalIssueSubscriptions, batch_size)?;

   if json {
      println!("{}", serde_json::to_string_pretty(&report)?);
      return Ok(());
   }

   for update in &report.updates {
      println!(
         "{} {}: {} {} deleted ({} selected, {} batch(es))",
         style("✓").green(),
         report.name,
         update.rows_updated,
         update.label,
         update.rows_selected,
         update.batches
      );
   }
   println!("{}", style(format!("Done in {} ms", report.duration_ms)).dim());
   Ok(())
}
