//! Horses (`caballos`), the entity every document hangs off.
//!
//! A horse has two independent unique keys: the 15-character UELN and the
//! transponder (microchip) code.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge, nullable},
  user::default_true,
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
pub enum Sex {
  #[serde(alias = "Macho")]
  Macho,
  #[serde(alias = "Hembra")]
  Hembra,
  #[serde(alias = "Castrado")]
  Castrado,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
  pub id:               i64,
  pub ueln:             String,
  pub microchip:        String,
  pub nombre:           String,
  pub fecha_nacimiento: NaiveDate,
  pub sexo:             Sex,
  pub raza:             String,
  pub capa:             String,
  pub pais_origen:      String,
  pub id_explotacion:   Option<i64>,
  pub id_propietario:   Option<i64>,
  pub fecha_registro:   DateTime<Utc>,
  pub activo:           bool,
}

impl Record for Horse {
  const KIND: EntityKind = EntityKind::Horse;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![
      ("ueln", self.ueln.clone()),
      ("microchip", self.microchip.clone()),
    ]
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewHorse {
  #[validate(length(equal = 15))]
  pub ueln:             String,
  #[validate(length(min = 1, max = 23))]
  pub microchip:        String,
  #[validate(length(min = 1, max = 100))]
  pub nombre:           String,
  pub fecha_nacimiento: NaiveDate,
  pub sexo:             Sex,
  #[validate(length(min = 1, max = 100))]
  pub raza:             String,
  #[validate(length(min = 1, max = 50))]
  pub capa:             String,
  #[validate(length(min = 1, max = 50))]
  pub pais_origen:      String,
  pub id_explotacion:   Option<i64>,
  pub id_propietario:   Option<i64>,
  #[serde(default = "default_true")]
  pub activo:           bool,
}

fn horse_references(farm: Option<i64>, owner: Option<i64>) -> Vec<Reference> {
  [
    Reference::optional(EntityKind::Farm, farm),
    Reference::optional(EntityKind::User, owner),
  ]
  .into_iter()
  .flatten()
  .collect()
}

impl Insert for NewHorse {
  type Record = Horse;

  fn references(&self) -> Vec<Reference> {
    horse_references(self.id_explotacion, self.id_propietario)
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> Horse {
    Horse {
      id,
      ueln: self.ueln,
      microchip: self.microchip,
      nombre: self.nombre,
      fecha_nacimiento: self.fecha_nacimiento,
      sexo: self.sexo,
      raza: self.raza,
      capa: self.capa,
      pais_origen: self.pais_origen,
      id_explotacion: self.id_explotacion,
      id_propietario: self.id_propietario,
      fecha_registro: now,
      activo: self.activo,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HorsePatch {
  #[validate(length(equal = 15))]
  pub ueln:             Option<String>,
  #[validate(length(min = 1, max = 23))]
  pub microchip:        Option<String>,
  #[validate(length(min = 1, max = 100))]
  pub nombre:           Option<String>,
  pub fecha_nacimiento: Option<NaiveDate>,
  pub sexo:             Option<Sex>,
  #[validate(length(min = 1, max = 100))]
  pub raza:             Option<String>,
  #[validate(length(min = 1, max = 50))]
  pub capa:             Option<String>,
  #[validate(length(min = 1, max = 50))]
  pub pais_origen:      Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_explotacion:   Option<Option<i64>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_propietario:   Option<Option<i64>>,
  pub activo:           Option<bool>,
}

impl Patch for HorsePatch {
  type Record = Horse;

  fn references(&self) -> Vec<Reference> {
    horse_references(self.id_explotacion.flatten(), self.id_propietario.flatten())
  }

  fn apply(self, horse: &mut Horse, _now: DateTime<Utc>) -> Result<()> {
    merge!(
      horse, self;
      ueln, microchip, nombre, fecha_nacimiento, sexo, raza, capa, pais_origen,
      activo,
    );
    merge!(horse, self; id_explotacion, id_propietario);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn body() -> serde_json::Value {
    serde_json::json!({
      "ueln": "ES123456789012345",
      "microchip": "982000123456789000",
      "nombre": "Test",
      "fechaNacimiento": "2015-04-02",
      "sexo": "macho",
      "raza": "PRE",
      "capa": "Torda",
      "paisOrigen": "España",
    })
  }

  #[test]
  fn ueln_must_be_fifteen_characters() {
    let mut value = body();
    let horse: NewHorse = serde_json::from_value(value.clone()).unwrap();
    // "ES123456789012345" is 17 characters long.
    assert!(horse.validate().is_err());

    value["ueln"] = "724015000012345".into();
    let horse: NewHorse = serde_json::from_value(value).unwrap();
    assert!(horse.validate().is_ok());
    assert!(horse.activo);
  }

  #[test]
  fn capitalised_sex_is_accepted() {
    let mut value = body();
    value["sexo"] = "Hembra".into();
    let horse: NewHorse = serde_json::from_value(value).unwrap();
    assert_eq!(horse.sexo, Sex::Hembra);
  }

  #[test]
  fn references_cover_farm_and_owner() {
    let mut value = body();
    value["idExplotacion"] = 4.into();
    let horse: NewHorse = serde_json::from_value(value).unwrap();
    assert_eq!(horse.references(), vec![Reference::new(EntityKind::Farm, 4)]);
  }

  #[test]
  fn patch_leaves_absent_fields_alone() {
    let mut value = body();
    value["ueln"] = "724015000012345".into();
    let mut horse = serde_json::from_value::<NewHorse>(value)
      .unwrap()
      .into_record(7, Utc::now());

    let patch = HorsePatch {
      nombre: Some("Renamed".into()),
      activo: Some(false),
      ..HorsePatch::default()
    };
    patch.apply(&mut horse, Utc::now()).unwrap();

    assert_eq!(horse.nombre, "Renamed");
    assert!(!horse.activo);
    assert_eq!(horse.ueln, "724015000012345");
    assert_eq!(horse.id, 7);
  }

  #[test]
  fn null_in_patch_clears_the_farm() {
    let absent: HorsePatch = serde_json::from_value(serde_json::json!({ "nombre": "X" })).unwrap();
    assert_eq!(absent.id_explotacion, None);

    let cleared: HorsePatch =
      serde_json::from_value(serde_json::json!({ "idExplotacion": null })).unwrap();
    assert_eq!(cleared.id_explotacion, Some(None));
    assert!(cleared.references().is_empty());

    let mut value = body();
    value["ueln"] = "724015000012345".into();
    value["idExplotacion"] = 4.into();
    let mut horse = serde_json::from_value::<NewHorse>(value)
      .unwrap()
      .into_record(7, Utc::now());
    assert_eq!(horse.id_explotacion, Some(4));

    cleared.apply(&mut horse, Utc::now()).unwrap();
    assert_eq!(horse.id_explotacion, None);
    assert_eq!(horse.nombre, "Test");
  }
}
