//! Movement guides (`guias_movimiento`): a horse's transfer between two
//! farms.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge, nullable},
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
pub enum GuideStatus {
  Emitida,
  EnTransito,
  Finalizada,
  Cancelada,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementGuide {
  pub id:                  i64,
  pub id_caballo:          i64,
  pub numero_guia:         String,
  pub fecha_emision:       NaiveDate,
  pub explotacion_origen:  Option<i64>,
  pub explotacion_destino: Option<i64>,
  pub fecha_salida:        DateTime<Utc>,
  pub fecha_llegada:       Option<DateTime<Utc>>,
  pub motivo_traslado:     String,
  pub medio_transporte:    String,
  pub matricula_vehiculo:  Option<String>,
  pub id_transportista:    Option<i64>,
  pub estado:              GuideStatus,
  pub url_documento:       Option<String>,
  pub fecha_registro:      DateTime<Utc>,
  pub id_emisor:           Option<i64>,
}

impl Record for MovementGuide {
  const KIND: EntityKind = EntityKind::MovementGuide;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![("numero_guia", self.numero_guia.clone())]
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewMovementGuide {
  pub id_caballo:          i64,
  #[validate(length(min = 1, max = 50))]
  pub numero_guia:         String,
  pub fecha_emision:       NaiveDate,
  pub explotacion_origen:  Option<i64>,
  pub explotacion_destino: Option<i64>,
  pub fecha_salida:        DateTime<Utc>,
  pub fecha_llegada:       Option<DateTime<Utc>>,
  #[validate(length(min = 1))]
  pub motivo_traslado:     String,
  #[validate(length(min = 1, max = 100))]
  pub medio_transporte:    String,
  #[validate(length(max = 20))]
  pub matricula_vehiculo:  Option<String>,
  pub id_transportista:    Option<i64>,
  pub estado:              GuideStatus,
  #[validate(length(max = 255))]
  pub url_documento:       Option<String>,
  pub id_emisor:           Option<i64>,
}

fn guide_references(
  horse: Option<i64>,
  origin: Option<i64>,
  destination: Option<i64>,
  transporter: Option<i64>,
  issuer: Option<i64>,
) -> Vec<Reference> {
  [
    Reference::optional(EntityKind::Horse, horse),
    Reference::optional(EntityKind::Farm, origin),
    Reference::optional(EntityKind::Farm, destination),
    Reference::optional(EntityKind::User, transporter),
    Reference::optional(EntityKind::User, issuer),
  ]
  .into_iter()
  .flatten()
  .collect()
}

impl Insert for NewMovementGuide {
  type Record = MovementGuide;

  fn references(&self) -> Vec<Reference> {
    guide_references(
      Some(self.id_caballo),
      self.explotacion_origen,
      self.explotacion_destino,
      self.id_transportista,
      self.id_emisor,
    )
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> MovementGuide {
    MovementGuide {
      id,
      id_caballo: self.id_caballo,
      numero_guia: self.numero_guia,
      fecha_emision: self.fecha_emision,
      explotacion_origen: self.explotacion_origen,
      explotacion_destino: self.explotacion_destino,
      fecha_salida: self.fecha_salida,
      fecha_llegada: self.fecha_llegada,
      motivo_traslado: self.motivo_traslado,
      medio_transporte: self.medio_transporte,
      matricula_vehiculo: self.matricula_vehiculo,
      id_transportista: self.id_transportista,
      estado: self.estado,
      url_documento: self.url_documento,
      fecha_registro: now,
      id_emisor: self.id_emisor,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MovementGuidePatch {
  pub id_caballo:          Option<i64>,
  #[validate(length(min = 1, max = 50))]
  pub numero_guia:         Option<String>,
  pub fecha_emision:       Option<NaiveDate>,
  #[serde(default, deserialize_with = "nullable")]
  pub explotacion_origen:  Option<Option<i64>>,
  #[serde(default, deserialize_with = "nullable")]
  pub explotacion_destino: Option<Option<i64>>,
  pub fecha_salida:        Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "nullable")]
  pub fecha_llegada:       Option<Option<DateTime<Utc>>>,
  #[validate(length(min = 1))]
  pub motivo_traslado:     Option<String>,
  #[validate(length(min = 1, max = 100))]
  pub medio_transporte:    Option<String>,
  #[validate(length(max = 20))]
  #[serde(default, deserialize_with = "nullable")]
  pub matricula_vehiculo:  Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_transportista:    Option<Option<i64>>,
  pub estado:              Option<GuideStatus>,
  #[validate(length(max = 255))]
  #[serde(default, deserialize_with = "nullable")]
  pub url_documento:       Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_emisor:           Option<Option<i64>>,
}

impl Patch for MovementGuidePatch {
  type Record = MovementGuide;

  fn references(&self) -> Vec<Reference> {
    guide_references(
      self.id_caballo,
      self.explotacion_origen.flatten(),
      self.explotacion_destino.flatten(),
      self.id_transportista.flatten(),
      self.id_emisor.flatten(),
    )
  }

  fn apply(self, guide: &mut MovementGuide, _now: DateTime<Utc>) -> Result<()> {
    merge!(
      guide, self;
      id_caballo, numero_guia, fecha_emision, fecha_salida, motivo_traslado,
      medio_transporte, estado,
    );
    merge!(
      guide, self;
      explotacion_origen, explotacion_destino, fecha_llegada,
      matricula_vehiculo, id_transportista, url_documento, id_emisor,
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_uses_snake_case_on_the_wire_and_in_storage() {
    assert_eq!(GuideStatus::EnTransito.to_string(), "en_transito");
    assert_eq!(
      serde_json::to_string(&GuideStatus::EnTransito).unwrap(),
      "\"en_transito\""
    );
    assert_eq!("cancelada".parse::<GuideStatus>().unwrap(), GuideStatus::Cancelada);
  }

  #[test]
  fn references_include_both_farms() {
    let guide: NewMovementGuide = serde_json::from_value(serde_json::json!({
      "idCaballo": 1,
      "numeroGuia": "GM-1",
      "fechaEmision": "2026-01-01",
      "explotacionOrigen": 2,
      "explotacionDestino": 3,
      "fechaSalida": "2026-01-02T08:00:00Z",
      "motivoTraslado": "Venta",
      "medioTransporte": "Camión",
      "estado": "emitida",
    }))
    .unwrap();

    assert_eq!(guide.references(), vec![
      Reference::new(EntityKind::Horse, 1),
      Reference::new(EntityKind::Farm, 2),
      Reference::new(EntityKind::Farm, 3),
    ]);
  }
}
