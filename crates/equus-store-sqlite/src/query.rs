//! Generic statements shared by every table. All functions run on the
//! connection thread, inside `tokio_rusqlite::Connection::call`.

use chrono::Utc;
use equus_core::entity::{EntityKind, Insert, Patch, Record, Reference};
use rusqlite::{Connection, OptionalExtension as _, params_from_iter, types::Value};

use crate::{Error, Result, encode::SqlRow};

fn select_sql<T: SqlRow>() -> String {
  format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::KIND.table())
}

pub fn fetch_one<T: SqlRow>(conn: &Connection, id: i64) -> Result<Option<T>> {
  let sql = format!("{} WHERE id = ?1", select_sql::<T>());
  Ok(conn.query_row(&sql, [id], |row| T::from_row(row)).optional()?)
}

/// Rows matching `filter` (an SQL condition over `params`), ordered by id.
pub fn fetch_where<T: SqlRow>(
  conn: &Connection,
  filter: &str,
  params: Vec<Value>,
) -> Result<Vec<T>> {
  let sql = format!("{} WHERE {filter} ORDER BY id", select_sql::<T>());
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params_from_iter(params), |row| T::from_row(row))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn fetch_all<T: SqlRow>(conn: &Connection) -> Result<Vec<T>> {
  fetch_where(conn, "1 = 1", Vec::new())
}

fn exists(conn: &Connection, kind: EntityKind, id: i64) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE id = ?1", kind.table());
  Ok(conn.query_row(&sql, [id], |_| Ok(())).optional()?.is_some())
}

/// Fail with the first reference that does not resolve.
///
/// Foreign-key violations reported by SQLite do not say which key failed,
/// so references are checked up front.
fn check_references(conn: &Connection, references: Vec<Reference>) -> Result<()> {
  for reference in references {
    if !exists(conn, reference.kind, reference.id)? {
      return Err(
        equus_core::Error::MissingReference {
          entity: reference.kind,
          id:     reference.id,
        }
        .into(),
      );
    }
  }
  Ok(())
}

pub fn insert<I>(conn: &Connection, input: I) -> Result<I::Record>
where
  I: Insert,
  I::Record: SqlRow,
{
  check_references(conn, input.references())?;

  // The id is assigned by SQLite; the placeholder is never written.
  let record = input.into_record(0, Utc::now());
  let placeholders = vec!["?"; I::Record::COLUMNS.len()].join(", ");
  let sql = format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    I::Record::KIND.table(),
    I::Record::COLUMNS.join(", "),
  );
  conn
    .execute(&sql, params_from_iter(record.values()))
    .map_err(classify)?;

  let id = conn.last_insert_rowid();
  fetch_one(conn, id)?.ok_or(Error::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

/// Read, patch, write back. `Ok(None)` when the row does not exist.
pub fn update<P>(conn: &Connection, id: i64, patch: P) -> Result<Option<P::Record>>
where
  P: Patch,
  P::Record: SqlRow,
{
  let Some(mut record) = fetch_one::<P::Record>(conn, id)? else {
    return Ok(None);
  };
  check_references(conn, patch.references())?;
  patch.apply(&mut record, Utc::now())?;

  let assignments = P::Record::COLUMNS
    .iter()
    .map(|column| format!("{column} = ?"))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!("UPDATE {} SET {assignments} WHERE id = ?", P::Record::KIND.table());

  let mut params = record.values();
  params.push(Value::Integer(id));
  conn
    .execute(&sql, params_from_iter(params))
    .map_err(classify)?;

  Ok(Some(record))
}

/// Turn a UNIQUE violation into [`equus_core::Error::Duplicate`]; pass
/// anything else through.
fn classify(err: rusqlite::Error) -> Error {
  let duplicate = match &err {
    rusqlite::Error::SqliteFailure(code, Some(message))
      if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      parse_unique_violation(message)
    }
    _ => None,
  };
  match duplicate {
    Some(duplicate) => duplicate.into(),
    None => err.into(),
  }
}

/// `UNIQUE constraint failed: caballos.ueln` → duplicate `caballos.ueln`.
fn parse_unique_violation(message: &str) -> Option<equus_core::Error> {
  let target = message.strip_prefix("UNIQUE constraint failed: ")?;
  let (table, column) = target.split(',').next()?.trim().split_once('.')?;
  Some(equus_core::Error::Duplicate {
    entity: table.parse().ok()?,
    field:  column.to_owned(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unique_violation_names_table_and_column() {
    let err = parse_unique_violation("UNIQUE constraint failed: caballos.microchip").unwrap();
    assert!(matches!(
      err,
      equus_core::Error::Duplicate { entity: EntityKind::Horse, ref field } if field == "microchip"
    ));
  }

  #[test]
  fn unknown_table_is_not_classified() {
    assert!(parse_unique_violation("UNIQUE constraint failed: nope.id").is_none());
    assert!(parse_unique_violation("NOT NULL constraint failed: caballos.ueln").is_none());
  }
}
