//! Error types for `equus-core`.
//!
//! These are the domain errors every backend must report in the same way.
//! Backend-specific failures (I/O, SQL) wrap or sit beside them.

use thiserror::Error;

use crate::entity::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  /// A unique column (UELN, microchip, document number, email…) already
  /// holds this value.
  #[error("duplicate value for {entity}.{field}")]
  Duplicate { entity: EntityKind, field: String },

  /// A foreign key in the payload points at a record that does not exist.
  #[error("{entity} {id} does not exist")]
  MissingReference { entity: EntityKind, id: i64 },

  /// A patch tried to change a field fixed at issue time.
  #[error("field {0} cannot be changed after issue")]
  ImmutableField(&'static str),
}

impl Error {
  /// The domain error carried by `err` itself or anywhere down its
  /// `source()` chain.
  pub fn find<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a Error> {
    std::iter::successors(Some(err), |e| e.source())
      .find_map(|e| e.downcast_ref::<Error>())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
