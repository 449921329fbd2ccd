//! One collection: rows keyed by id plus the id counter.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use equus_core::{
  Error, Result,
  entity::{Insert, Patch, Record},
};

pub(crate) struct Table<T> {
  last_id: i64,
  rows:    BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
  fn default() -> Self { Self { last_id: 0, rows: BTreeMap::new() } }
}

impl<T: Record> Table<T> {
  pub fn get(&self, id: i64) -> Option<T> { self.rows.get(&id).cloned() }

  pub fn contains(&self, id: i64) -> bool { self.rows.contains_key(&id) }

  /// Rows matching `keep`, in ascending id order.
  pub fn select(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
    self.rows.values().filter(|row| keep(row)).cloned().collect()
  }

  pub fn all(&self) -> Vec<T> { self.rows.values().cloned().collect() }

  /// Allocate the next id and store the record. The counter only moves when
  /// the insert succeeds.
  pub fn insert<I>(&mut self, input: I, now: DateTime<Utc>) -> Result<T>
  where
    I: Insert<Record = T>,
  {
    let record = input.into_record(self.last_id + 1, now);
    self.check_unique(&record)?;
    self.last_id = record.id();
    self.rows.insert(record.id(), record.clone());
    Ok(record)
  }

  /// Merge `patch` into row `id`. `Ok(None)` when the row does not exist.
  pub fn update<P>(&mut self, id: i64, patch: P, now: DateTime<Utc>) -> Result<Option<T>>
  where
    P: Patch<Record = T>,
  {
    let Some(current) = self.rows.get(&id) else {
      return Ok(None);
    };
    let mut next = current.clone();
    patch.apply(&mut next, now)?;
    self.check_unique(&next)?;
    self.rows.insert(id, next.clone());
    Ok(Some(next))
  }

  fn check_unique(&self, record: &T) -> Result<()> {
    for (position, (field, value)) in record.unique_keys().into_iter().enumerate() {
      let clash = self
        .rows
        .values()
        .filter(|other| other.id() != record.id())
        .any(|other| {
          other
            .unique_keys()
            .get(position)
            .is_some_and(|(_, existing)| *existing == value)
        });
      if clash {
        return Err(Error::Duplicate { entity: T::KIND, field: field.to_owned() });
      }
    }
    Ok(())
  }
}
