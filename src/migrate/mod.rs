//! One-shot data changes against the properties store.

mod delete_global_issue_subscriptions;
pub mod mass_update;

use std::time::Instant;

use rusqlite::Connection;
use serde::Serialize;

pub use self::{
   delete_global_issue_subscriptions::{DeleteGlobalIssueSubscriptions, SUBSCRIPTION_KEY_PREFIXES},
   mass_update::{KeysetScan, MassUpdate, MassUpdateReport, SelectedRow, UpdateBinder},
};
use crate::Result;

/// A data migration step.
pub trait DataChange {
   /// Stable identifier used in logs and errors.
   fn name(&self) -> &'static str;

   /// Applies the change. Errors propagate to the caller unmodified.
   fn execute(&self, ctx: &mut MigrationContext<'_>) -> Result<()>;
}

/// What a data change gets to work with: a connection, a batch size, and a
/// place to leave its mass update reports.
pub struct MigrationContext<'c> {
   conn:       &'c Connection,
   name:       &'static str,
   batch_size: usize,
   reports:    Vec<MassUpdateReport>,
}

impl<'c> MigrationContext<'c> {
   pub fn new(conn: &'c Connection, name: &'static str, batch_size: usize) -> Self {
      Self { conn, name, batch_size: batch_size.max(1), reports: Vec::new() }
   }

   pub fn connection(&self) -> &'c Connection {
      self.conn
   }

   pub fn name(&self) -> &'static str {
      self.name
   }

   pub fn batch_size(&self) -> usize {
      self.batch_size
   }

   pub fn prepare_mass_update(&mut self) -> MassUpdate<'_, 'c> {
      MassUpdate::new(self)
   }

   pub fn reports(&self) -> &[MassUpdateReport] {
      &self.reports
   }

   fn record(&mut self, report: MassUpdateReport) {
      self.reports.push(report);
   }
}

/// Summary of one data change run.
#[derive(Debug, Clone, Serialize)]
pub struct DataChangeReport {
   pub name:        &'static str,
   pub updates:     Vec<MassUpdateReport>,
   pub duration_ms: u64,
}

/// Runs a single data change once. No version bookkeeping is done.
pub fn run_data_change(
   conn: &Connection,
   change: &dyn DataChange,
   batch_size: usize,
) -> Result<DataChangeReport> {
   let start = Instant::now();
   let name = change.name();
   tracing::info!(migration = name, batch_size, "running data change");

   let mut ctx = MigrationContext::new(conn, name, batch_size);
   change
      .execute(&mut ctx)
      .inspect_err(|e| tracing::error!(migration = name, "data change failed: {e}"))?;

   Ok(DataChangeReport {
      name,
      updates: ctx.reports,
      duration_ms: start.elapsed().as_millis() as u64,
   })
}
