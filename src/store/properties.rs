//! Queries for the `properties` table.

use rusqlite::{Connection, params};

use crate::{Result, store::escape_glob};

/// One row of the `properties` table. A `None` resource id marks a global
/// property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
   pub id:          i64,
   pub prop_key:    String,
   pub resource_id: Option<i64>,
   pub user_id:     Option<i64>,
   pub text_value:  Option<String>,
}

/// Values for a property about to be inserted.
#[derive(Debug, Clone, Default)]
pub struct NewProperty<'a> {
   pub prop_key:    &'a str,
   pub resource_id: Option<i64>,
   pub user_id:     Option<i64>,
   pub text_value:  Option<&'a str>,
}

/// Inserts a property and returns its id.
pub fn insert(conn: &Connection, prop: &NewProperty<'_>) -> Result<i64> {
   conn.execute(
      "INSERT INTO properties (prop_key, resource_id, user_id, text_value) VALUES (?1, ?2, ?3, ?4)",
      params![prop.prop_key, prop.resource_id, prop.user_id, prop.text_value],
   )?;
   Ok(conn.last_insert_rowid())
}

/// Inserts a property with an explicit id.
pub fn insert_with_id(conn: &Connection, id: i64, prop: &NewProperty<'_>) -> Result<()> {
   conn.execute(
      "INSERT INTO properties (id, prop_key, resource_id, user_id, text_value)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      params![id, prop.prop_key, prop.resource_id, prop.user_id, prop.text_value],
   )?;
   Ok(())
}

/// All properties ordered by id.
pub fn list_all(conn: &Connection) -> Result<Vec<PropertyRow>> {
   let mut stmt = conn.prepare_cached(
      "SELECT id, prop_key, resource_id, user_id, text_value FROM properties ORDER BY id",
   )?;
   let rows = stmt
      .query_map([], |row| {
         Ok(PropertyRow {
            id:          row.get(0)?,
            prop_key:    row.get(1)?,
            resource_id: row.get(2)?,
            user_id:     row.get(3)?,
            text_value:  row.get(4)?,
         })
      })?
      .collect::<Result<Vec<_>, _>>()?;
   Ok(rows)
}

/// Counts global properties (no resource) whose key starts with `prefix`.
/// The match is case-sensitive.
pub fn count_global_with_prefix(conn: &Connection, prefix: &str) -> Result<u64> {
   let pattern = format!("{}*", escape_glob(prefix));
   let count: i64 = conn.query_row(
      "SELECT COUNT(*) FROM properties
       WHERE resource_id IS NULL AND prop_key GLOB ?1",
      params![pattern],
      |r| r.get(0),
   )?;
   Ok(count as u64)
}
