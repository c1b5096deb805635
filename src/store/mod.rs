//! SQLite access to the key-value `properties` store.

pub mod properties;

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::Result;

const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS properties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prop_key TEXT NOT NULL,
    resource_id INTEGER,
    user_id INTEGER,
    text_value TEXT
);

CREATE INDEX IF NOT EXISTS idx_properties_key ON properties(prop_key);
";

/// Opens a database file and applies connection pragmas.
///
/// The file's journal mode is left as the owning application set it.
pub fn open(path: &Path) -> Result<Connection> {
   let conn = Connection::open(path)?;
   apply_pragmas(&conn)?;
   Ok(conn)
}

/// Opens an in-memory database with the `properties` table in place.
pub fn open_in_memory() -> Result<Connection> {
   let conn = Connection::open_in_memory()?;
   apply_pragmas(&conn)?;
   ensure_schema(&conn)?;
   Ok(conn)
}

/// NORMAL sync and a 5s busy timeout. Both only last for the connection.
pub fn apply_pragmas(conn: &Connection) -> Result<()> {
   conn.execute_batch(
      "
      PRAGMA synchronous = NORMAL;
      PRAGMA busy_timeout = 5000;
      ",
   )?;
   Ok(())
}

/// Creates the `properties` table if it does not exist.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
   conn.execute_batch(SCHEMA_SQL)?;
   Ok(())
}

/// Runs `f` inside a `BEGIN IMMEDIATE` transaction.
///
/// The write lock is taken when the transaction starts. The transaction
/// commits when `f` succeeds and rolls back on drop otherwise.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T>
where
   F: FnOnce(&Transaction<'_>) -> Result<T>,
{
   let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
   let result = f(&tx)?;
   tx.commit()?;
   Ok(result)
}

/// Escapes a literal for use in a GLOB pattern.
///
/// GLOB has no escape character, so `*`, `?` and `[` are wrapped in
/// single-character classes.
pub fn escape_glob(literal: &str) -> String {
   let mut out = String::with_capacity(literal.len());
   for c in literal.chars() {
      match c {
         '*' | '?' | '[' => {
            out.push('[');
            out.push(c);
            out.push(']');
         },
         _ => out.push(c),
      }
   }
   out
}
