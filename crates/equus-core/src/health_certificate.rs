//! Health certificates (`certificados_salud`): the outcome of a veterinary
//! examination, valid until a mandatory expiry date.

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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExamOutcome {
  Apto,
  NoApto,
  AptoConRestricciones,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCertificate {
  pub id:                 i64,
  pub id_caballo:         i64,
  pub numero_certificado: String,
  pub fecha_emision:      NaiveDate,
  pub fecha_validez:      NaiveDate,
  pub id_veterinario:     Option<i64>,
  pub resultado:          ExamOutcome,
  pub observaciones:      Option<String>,
  pub vacunas_aplicadas:  Option<String>,
  pub pruebas_realizadas: Option<String>,
  pub url_documento:      Option<String>,
  pub fecha_registro:     DateTime<Utc>,
}

impl Record for HealthCertificate {
  const KIND: EntityKind = EntityKind::HealthCertificate;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![("numero_certificado", self.numero_certificado.clone())]
  }
}

impl Expiring for HealthCertificate {
  fn fecha_validez(&self) -> Option<NaiveDate> { Some(self.fecha_validez) }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewHealthCertificate {
  pub id_caballo:         i64,
  #[validate(length(min = 1, max = 50))]
  pub numero_certificado: String,
  pub fecha_emision:      NaiveDate,
  pub fecha_validez:      NaiveDate,
  pub id_veterinario:     Option<i64>,
  pub resultado:          ExamOutcome,
  pub observaciones:      Option<String>,
  pub vacunas_aplicadas:  Option<String>,
  pub pruebas_realizadas: Option<String>,
  #[validate(length(max = 255))]
  pub url_documento:      Option<String>,
}

impl Insert for NewHealthCertificate {
  type Record = HealthCertificate;

  fn references(&self) -> Vec<Reference> {
    let mut refs = vec![Reference::new(EntityKind::Horse, self.id_caballo)];
    refs.extend(Reference::optional(EntityKind::User, self.id_veterinario));
    refs
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> HealthCertificate {
    HealthCertificate {
      id,
      id_caballo: self.id_caballo,
      numero_certificado: self.numero_certificado,
      fecha_emision: self.fecha_emision,
      fecha_validez: self.fecha_validez,
      id_veterinario: self.id_veterinario,
      resultado: self.resultado,
      observaciones: self.observaciones,
      vacunas_aplicadas: self.vacunas_aplicadas,
      pruebas_realizadas: self.pruebas_realizadas,
      url_documento: self.url_documento,
      fecha_registro: now,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HealthCertificatePatch {
  pub id_caballo:         Option<i64>,
  #[validate(length(min = 1, max = 50))]
  pub numero_certificado: Option<String>,
  pub fecha_emision:      Option<NaiveDate>,
  pub fecha_validez:      Option<NaiveDate>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_veterinario:     Option<Option<i64>>,
  pub resultado:          Option<ExamOutcome>,
  #[serde(default, deserialize_with = "nullable")]
  pub observaciones:      Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub vacunas_aplicadas:  Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub pruebas_realizadas: Option<Option<String>>,
  #[validate(length(max = 255))]
  #[serde(default, deserialize_with = "nullable")]
  pub url_documento:      Option<Option<String>>,
}

impl Patch for HealthCertificatePatch {
  type Record = HealthCertificate;

  fn references(&self) -> Vec<Reference> {
    [
      Reference::optional(EntityKind::Horse, self.id_caballo),
      Reference::optional(EntityKind::User, self.id_veterinario.flatten()),
    ]
    .into_iter()
    .flatten()
    .collect()
  }

  fn apply(self, cert: &mut HealthCertificate, _now: DateTime<Utc>) -> Result<()> {
    merge!(
      cert, self;
      id_caballo, numero_certificado, fecha_emision, fecha_validez, resultado,
    );
    merge!(
      cert, self;
      id_veterinario, observaciones, vacunas_aplicadas, pruebas_realizadas,
      url_documento,
    );
    Ok(())
  }
}
