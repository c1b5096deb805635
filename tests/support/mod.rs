#![allow(dead_code, reason = "each test binary uses a different subset")]

use bootcheck::store::{
   self,
   properties::{self, NewProperty},
};
use rusqlite::Connection;

/// In-memory properties store seeded with `(id, resource_id, prop_key)` rows.
pub fn seeded_store(rows: &[(i64, Option<i64>, &str)]) -> Connection {
   let conn = store::open_in_memory().expect("open store");
   for &(id, resource_id, prop_key) in rows {
      properties::insert_with_id(&conn, id, &NewProperty {
         prop_key,
         resource_id,
         ..Default::default()
      })
      .expect("seed property");
   }
   conn
}

pub fn remaining_ids(conn: &Connection) -> Vec<i64> {
   properties::list_all(conn)
      .expect("list properties")
      .into_iter()
      .map(|row| row.id)
      .collect()
}
