//! Registry books (`libros_registro`): one ledger per farm.
//!
//! Unlike other entities the book has no `fechaRegistro`; it tracks when it
//! was last touched instead, and every update refreshes that stamp.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge, nullable},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryBook {
  pub id:                         i64,
  pub id_explotacion:             i64,
  pub fecha_apertura:             NaiveDate,
  pub fecha_ultima_actualizacion: DateTime<Utc>,
  pub url_documento:              Option<String>,
  pub observaciones:              Option<String>,
  pub id_responsable:             Option<i64>,
}

impl Record for RegistryBook {
  const KIND: EntityKind = EntityKind::RegistryBook;

  fn id(&self) -> i64 { self.id }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewRegistryBook {
  pub id_explotacion: i64,
  pub fecha_apertura: NaiveDate,
  #[validate(length(max = 255))]
  pub url_documento:  Option<String>,
  pub observaciones:  Option<String>,
  pub id_responsable: Option<i64>,
}

impl Insert for NewRegistryBook {
  type Record = RegistryBook;

  fn references(&self) -> Vec<Reference> {
    let mut refs = vec![Reference::new(EntityKind::Farm, self.id_explotacion)];
    refs.extend(Reference::optional(EntityKind::User, self.id_responsable));
    refs
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> RegistryBook {
    RegistryBook {
      id,
      id_explotacion: self.id_explotacion,
      fecha_apertura: self.fecha_apertura,
      fecha_ultima_actualizacion: now,
      url_documento: self.url_documento,
      observaciones: self.observaciones,
      id_responsable: self.id_responsable,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistryBookPatch {
  pub id_explotacion: Option<i64>,
  pub fecha_apertura: Option<NaiveDate>,
  #[validate(length(max = 255))]
  #[serde(default, deserialize_with = "nullable")]
  pub url_documento:  Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub observaciones:  Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_responsable: Option<Option<i64>>,
}

impl Patch for RegistryBookPatch {
  type Record = RegistryBook;

  fn references(&self) -> Vec<Reference> {
    [
      Reference::optional(EntityKind::Farm, self.id_explotacion),
      Reference::optional(EntityKind::User, self.id_responsable.flatten()),
    ]
    .into_iter()
    .flatten()
    .collect()
  }

  fn apply(self, book: &mut RegistryBook, now: DateTime<Utc>) -> Result<()> {
    merge!(book, self; id_explotacion, fecha_apertura);
    merge!(book, self; url_documento, observaciones, id_responsable);
    book.fecha_ultima_actualizacion = now;
    Ok(())
  }
}
