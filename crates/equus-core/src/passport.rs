//! Passports (`pasaportes`): the official identification document of a
//! horse.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge, nullable},
  expiry::Expiring,
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PassportStatus {
  Vigente,
  Caducado,
  Suspendido,
  Extraviado,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passport {
  pub id:                i64,
  pub id_caballo:        i64,
  pub numero_pasaporte:  String,
  pub fecha_emision:     NaiveDate,
  pub autoridad_emisora: String,
  pub fecha_validez:     Option<NaiveDate>,
  pub url_documento:     Option<String>,
  pub estado:            PassportStatus,
  pub fecha_registro:    DateTime<Utc>,
  pub id_emisor:         Option<i64>,
}

impl Record for Passport {
  const KIND: EntityKind = EntityKind::Passport;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![("numero_pasaporte", self.numero_pasaporte.clone())]
  }
}

impl Expiring for Passport {
  fn fecha_validez(&self) -> Option<NaiveDate> { self.fecha_validez }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPassport {
  pub id_caballo:        i64,
  #[validate(length(min = 1, max = 50))]
  pub numero_pasaporte:  String,
  pub fecha_emision:     NaiveDate,
  #[validate(length(min = 1, max = 100))]
  pub autoridad_emisora: String,
  pub fecha_validez:     Option<NaiveDate>,
  #[validate(length(max = 255))]
  pub url_documento:     Option<String>,
  pub estado:            PassportStatus,
  pub id_emisor:         Option<i64>,
}

impl Insert for NewPassport {
  type Record = Passport;

  fn references(&self) -> Vec<Reference> {
    let mut refs = vec![Reference::new(EntityKind::Horse, self.id_caballo)];
    refs.extend(Reference::optional(EntityKind::User, self.id_emisor));
    refs
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> Passport {
    Passport {
      id,
      id_caballo: self.id_caballo,
      numero_pasaporte: self.numero_pasaporte,
      fecha_emision: self.fecha_emision,
      autoridad_emisora: self.autoridad_emisora,
      fecha_validez: self.fecha_validez,
      url_documento: self.url_documento,
      estado: self.estado,
      fecha_registro: now,
      id_emisor: self.id_emisor,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PassportPatch {
  pub id_caballo:        Option<i64>,
  #[validate(length(min = 1, max = 50))]
  pub numero_pasaporte:  Option<String>,
  pub fecha_emision:     Option<NaiveDate>,
  #[validate(length(min = 1, max = 100))]
  pub autoridad_emisora: Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub fecha_validez:     Option<Option<NaiveDate>>,
  #[validate(length(max = 255))]
  #[serde(default, deserialize_with = "nullable")]
  pub url_documento:     Option<Option<String>>,
  pub estado:            Option<PassportStatus>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_emisor:         Option<Option<i64>>,
}

impl Patch for PassportPatch {
  type Record = Passport;

  fn references(&self) -> Vec<Reference> {
    [
      Reference::optional(EntityKind::Horse, self.id_caballo),
      Reference::optional(EntityKind::User, self.id_emisor.flatten()),
    ]
    .into_iter()
    .flatten()
    .collect()
  }

  fn apply(self, passport: &mut Passport, _now: DateTime<Utc>) -> Result<()> {
    merge!(
      passport, self;
      id_caballo, numero_pasaporte, fecha_emision, autoridad_emisora, estado,
    );
    merge!(passport, self; fecha_validez, url_documento, id_emisor);
    Ok(())
  }
}
