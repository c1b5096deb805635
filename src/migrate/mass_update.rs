//! Select-then-update in bounded batches.
//!
//! A mass update runs in two phases per page:
//!
//! 1. [`KeysetScan`] reads the next page of candidate rows, keyed on the first
//!    column of the selection (`key > last ORDER BY key LIMIT n`). Nothing
//!    beyond one page is held in memory, and a scan can be restarted at any
//!    time because the selection is re-evaluated on every page.
//! 2. Every row of the page goes through the caller's handler; rows it
//!    approves are written with the update statement inside a single
//!    `BEGIN IMMEDIATE` transaction per page.

use rusqlite::{Connection, params, params_from_iter, types::Value};
use serde::Serialize;

use crate::{Error, Result, migrate::MigrationContext, store::with_immediate_transaction};

/// One candidate row produced by a [`KeysetScan`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRow {
   key:    i64,
   values: Vec<Value>,
}

impl SelectedRow {
   /// Value of the selection's first column.
   pub fn key(&self) -> i64 {
      self.key
   }

   /// Column value by zero-based index.
   pub fn get(&self, idx: usize) -> Option<&Value> {
      self.values.get(idx)
   }

   pub fn get_i64(&self, idx: usize) -> Option<i64> {
      match self.values.get(idx)? {
         Value::Integer(v) => Some(*v),
         _ => None,
      }
   }

   pub fn get_str(&self, idx: usize) -> Option<&str> {
      match self.values.get(idx)? {
         Value::Text(s) => Some(s),
         _ => None,
      }
   }
}

/// Parameters for one execution of the update statement.
///
/// Indices are one-based, matching `?1`, `?2`, ... in the statement.
#[derive(Debug)]
pub struct UpdateBinder {
   migration: &'static str,
   values:    Vec<Value>,
}

impl UpdateBinder {
   fn new(migration: &'static str) -> Self {
      Self { migration, values: Vec::new() }
   }

   /// Binds `value` to `?idx`. Index 0 names no parameter and is rejected.
   pub fn set(&mut self, idx: usize, value: impl Into<Value>) -> Result<&mut Self> {
      let Some(slot) = idx.checked_sub(1) else {
         return Err(Error::Migration {
            name:   self.migration,
            reason: "update parameters are numbered from 1".to_string(),
         });
      };
      if self.values.len() <= slot {
         self.values.resize(slot + 1, Value::Null);
      }
      self.values[slot] = value.into();
      Ok(self)
   }

   fn clear(&mut self) {
      self.values.clear();
   }
}

/// Lazy, restartable page-wise reader over a selection.
pub struct KeysetScan<'c> {
   conn:      &'c Connection,
   sql:       String,
   page_size: usize,
   last_key:  Option<i64>,
   done:      bool,
}

impl<'c> KeysetScan<'c> {
   /// Wraps `select_sql` for keyset paging.
   ///
   /// The selection's first column must be an integer key that is unique
   /// across the selected rows.
   pub fn new(conn: &'c Connection, select_sql: &str, page_size: usize) -> Result<Self> {
      let key_column = {
         let stmt = conn.prepare(select_sql)?;
         if stmt.column_count() == 0 {
            return Err(Error::Migration {
               name:   "mass_update",
               reason: "selection returns no columns".to_string(),
            });
         }
         stmt.column_name(0)?.replace('"', "\"\"")
      };
      let sql = format!(
         "SELECT * FROM ({select_sql}) AS candidate \
          WHERE ?1 IS NULL OR candidate.\"{key_column}\" > ?1 \
          ORDER BY candidate.\"{key_column}\" LIMIT ?2"
      );
      Ok(Self { conn, sql, page_size: page_size.max(1), last_key: None, done: false })
   }

   /// Starts over from the first candidate.
   pub fn restart(&mut self) {
      self.last_key = None;
      self.done = false;
   }

   /// Reads the next page, or `None` once the selection is exhausted.
   pub fn next_page(&mut self) -> Result<Option<Vec<SelectedRow>>> {
      if self.done {
         return Ok(None);
      }
      let conn = self.conn;
      let mut stmt = conn.prepare_cached(&self.sql)?;
      let column_count = stmt.column_count();
      let mut rows = stmt.query(params![self.last_key, self.page_size as i64])?;

      let mut page = Vec::with_capacity(self.page_size);
      while let Some(row) = rows.next()? {
         let key: i64 = row.get(0)?;
         let values = (0..column_count)
            .map(|i| row.get::<_, Value>(i))
            .collect::<Result<Vec<_>, _>>()?;
         page.push(SelectedRow { key, values });
      }

      if page.len() < self.page_size {
         self.done = true;
      }
      match page.last() {
         Some(last) => {
            self.last_key = Some(last.key);
            Ok(Some(page))
         },
         None => Ok(None),
      }
   }
}

impl Iterator for KeysetScan<'_> {
   type Item = Result<Vec<SelectedRow>>;

   fn next(&mut self) -> Option<Self::Item> {
      self.next_page().transpose()
   }
}

/// Counters for one mass update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MassUpdateReport {
   pub label:         String,
   pub rows_selected: u64,
   pub rows_updated:  u64,
   pub batches:       u64,
}

/// A select/update pair driven by a per-row handler.
pub struct MassUpdate<'a, 'c> {
   ctx:         &'a mut MigrationContext<'c>,
   plural_name: String,
   select_sql:  Option<String>,
   update_sql:  Option<String>,
}

impl<'a, 'c> MassUpdate<'a, 'c> {
   pub(crate) fn new(ctx: &'a mut MigrationContext<'c>) -> Self {
      Self { ctx, plural_name: "rows".to_string(), select_sql: None, update_sql: None }
   }

   /// Name used for rows in log lines and reports, e.g. "subscriptions".
   pub fn row_plural_name(mut self, name: impl Into<String>) -> Self {
      self.plural_name = name.into();
      self
   }

   /// Query producing candidate rows; its first column is the paging key.
   pub fn select(mut self, sql: impl Into<String>) -> Self {
      self.select_sql = Some(sql.into());
      self
   }

   /// Statement run for every row the handler approves.
   pub fn update(mut self, sql: impl Into<String>) -> Self {
      self.update_sql = Some(sql.into());
      self
   }

   /// Streams the selection and applies the update to every approved row.
   ///
   /// The handler binds the update parameters and returns whether the update
   /// should run for that row. Any error, from SQLite or from the handler,
   /// stops the run; pages already committed stay committed.
   pub fn execute<F>(self, mut handler: F) -> Result<MassUpdateReport>
   where
      F: FnMut(&SelectedRow, &mut UpdateBinder) -> Result<bool>,
   {
      let name = self.ctx.name();
      let (Some(select_sql), Some(update_sql)) = (self.select_sql, self.update_sql) else {
         return Err(Error::Migration {
            name,
            reason: "mass update needs both a select and an update statement".to_string(),
         });
      };

      let conn = self.ctx.connection();
      let mut report = MassUpdateReport { label: self.plural_name, ..Default::default() };
      let mut scan = KeysetScan::new(conn, &select_sql, self.ctx.batch_size())?;
      let mut binder = UpdateBinder::new(name);

      while let Some(page) = scan.next_page()? {
         report.rows_selected += page.len() as u64;
         let updated = with_immediate_transaction(conn, |tx| {
            let mut stmt = tx.prepare_cached(&update_sql)?;
            let mut updated = 0u64;
            for row in &page {
               binder.clear();
               if handler(row, &mut binder)? {
                  stmt.execute(params_from_iter(binder.values.iter()))?;
                  updated += 1;
               }
            }
            Ok(updated)
         })?;
         report.rows_updated += updated;
         report.batches += 1;
         tracing::debug!(
            migration = name,
            batch = report.batches,
            "{} {} processed, {} updated",
            page.len(),
            report.label,
            updated
         );
      }

      tracing::info!(
         migration = name,
         "{} {} selected, {} updated in {} batch(es)",
         report.rows_selected,
         report.label,
         report.rows_updated,
         report.batches
      );
      self.ctx.record(report.clone());
      Ok(report)
   }
}
