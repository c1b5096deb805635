//! Removes global subscriptions to the "new issues" and "new false positive
//! issue" notifications.
//!
//! Those notifications are no longer delivered to users subscribed at the
//! global level, so their subscription rows are dropped. Subscriptions scoped
//! to a resource are kept.

use rusqlite::Connection;

use crate::{
   Result,
   migrate::{DataChange, MigrationContext},
   store::properties,
};

pub const SUBSCRIPTION_KEY_PREFIXES: [&str; 2] =
   ["notification.NewFalsePositiveIssue.", "notification.NewIssues."];

const SELECT_SQL: &str = "SELECT id FROM properties \
                          WHERE resource_id IS NULL \
                          AND (prop_key GLOB 'notification.NewFalsePositiveIssue.*' \
                          OR prop_key GLOB 'notification.NewIssues.*')";

const DELETE_SQL: &str = "DELETE FROM properties WHERE id = ?1";

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteGlobalIssueSubscriptions;

impl DeleteGlobalIssueSubscriptions {
   /// Number of rows a run would delete right now.
   pub fn count_candidates(conn: &Connection) -> Result<u64> {
      SUBSCRIPTION_KEY_PREFIXES
         .iter()
         .map(|prefix| properties::count_global_with_prefix(conn, prefix))
         .sum()
   }
}

impl DataChange for DeleteGlobalIssueSubscriptions {
   fn name(&self) -> &'static str {
      "delete_global_issue_subscriptions"
   }

   fn execute(&self, ctx: &mut MigrationContext<'_>) -> Result<()> {
      ctx.prepare_mass_update()
         .row_plural_name("subscriptions")
         .select(SELECT_SQL)
         .update(DELETE_SQL)
         .execute(|row, update| {
            update.set(1, row.key())?;
            Ok(true)
         })?;
      Ok(())
   }
}
