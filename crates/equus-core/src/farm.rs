//! Farms (`explotaciones`), identified by their REGA code.
//!
//! Farms are never deleted; closing one is a patch of `activa = false`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge, nullable},
  user::default_true,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
  pub id:               i64,
  pub codigo_rega:      String,
  pub nombre:           String,
  pub direccion:        String,
  pub municipio:        String,
  pub provincia:        String,
  pub codigo_postal:    String,
  pub telefono:         String,
  pub email:            Option<String>,
  pub tipo_explotacion: String,
  pub capacidad_maxima: i32,
  pub fecha_registro:   DateTime<Utc>,
  pub id_propietario:   Option<i64>,
  pub activa:           bool,
}

impl Record for Farm {
  const KIND: EntityKind = EntityKind::Farm;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![("codigo_rega", self.codigo_rega.clone())]
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewFarm {
  #[validate(length(min = 1, max = 50))]
  pub codigo_rega:      String,
  #[validate(length(min = 1, max = 200))]
  pub nombre:           String,
  #[validate(length(min = 1))]
  pub direccion:        String,
  #[validate(length(min = 1, max = 100))]
  pub municipio:        String,
  #[validate(length(min = 1, max = 100))]
  pub provincia:        String,
  #[validate(length(min = 1, max = 10))]
  pub codigo_postal:    String,
  #[validate(length(min = 1, max = 20))]
  pub telefono:         String,
  #[validate(email, length(max = 100))]
  pub email:            Option<String>,
  #[validate(length(min = 1, max = 20))]
  pub tipo_explotacion: String,
  #[validate(range(min = 0))]
  pub capacidad_maxima: i32,
  pub id_propietario:   Option<i64>,
  #[serde(default = "default_true")]
  pub activa:           bool,
}

impl Insert for NewFarm {
  type Record = Farm;

  fn references(&self) -> Vec<Reference> {
    Reference::optional(EntityKind::User, self.id_propietario)
      .into_iter()
      .collect()
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> Farm {
    Farm {
      id,
      codigo_rega: self.codigo_rega,
      nombre: self.nombre,
      direccion: self.direccion,
      municipio: self.municipio,
      provincia: self.provincia,
      codigo_postal: self.codigo_postal,
      telefono: self.telefono,
      email: self.email,
      tipo_explotacion: self.tipo_explotacion,
      capacidad_maxima: self.capacidad_maxima,
      fecha_registro: now,
      id_propietario: self.id_propietario,
      activa: self.activa,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FarmPatch {
  #[validate(length(min = 1, max = 50))]
  pub codigo_rega:      Option<String>,
  #[validate(length(min = 1, max = 200))]
  pub nombre:           Option<String>,
  #[validate(length(min = 1))]
  pub direccion:        Option<String>,
  #[validate(length(min = 1, max = 100))]
  pub municipio:        Option<String>,
  #[validate(length(min = 1, max = 100))]
  pub provincia:        Option<String>,
  #[validate(length(min = 1, max = 10))]
  pub codigo_postal:    Option<String>,
  #[validate(length(min = 1, max = 20))]
  pub telefono:         Option<String>,
  #[validate(email, length(max = 100))]
  #[serde(default, deserialize_with = "nullable")]
  pub email:            Option<Option<String>>,
  #[validate(length(min = 1, max = 20))]
  pub tipo_explotacion: Option<String>,
  #[validate(range(min = 0))]
  pub capacidad_maxima: Option<i32>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_propietario:   Option<Option<i64>>,
  pub activa:           Option<bool>,
}

impl Patch for FarmPatch {
  type Record = Farm;

  fn references(&self) -> Vec<Reference> {
    Reference::optional(EntityKind::User, self.id_propietario.flatten())
      .into_iter()
      .collect()
  }

  fn apply(self, farm: &mut Farm, _now: DateTime<Utc>) -> Result<()> {
    merge!(
      farm, self;
      codigo_rega, nombre, direccion, municipio, provincia, codigo_postal,
      telefono, tipo_explotacion, capacidad_maxima, activa,
    );
    merge!(farm, self; email, id_propietario);
    Ok(())
  }
}
