//! EU transport documents (`documentos_transporte_ue`): the companion
//! document for cross-border movements. May point at the health certificate
//! and the movement guide it travels with.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge, nullable},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EuTransportDocument {
  pub id:                       i64,
  pub id_caballo:               i64,
  pub numero_documento:         String,
  pub fecha_emision:            NaiveDate,
  pub pais_origen:              String,
  pub pais_destino:             String,
  pub punto_control_fronterizo: Option<String>,
  pub id_certificado_salud:     Option<i64>,
  pub id_guia_movimiento:       Option<i64>,
  pub url_documento:            Option<String>,
  pub fecha_registro:           DateTime<Utc>,
  pub id_emisor:                Option<i64>,
}

impl Record for EuTransportDocument {
  const KIND: EntityKind = EntityKind::EuTransportDocument;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![("numero_documento", self.numero_documento.clone())]
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewEuTransportDocument {
  pub id_caballo:               i64,
  #[validate(length(min = 1, max = 50))]
  pub numero_documento:         String,
  pub fecha_emision:            NaiveDate,
  #[validate(length(min = 1, max = 50))]
  pub pais_origen:              String,
  #[validate(length(min = 1, max = 50))]
  pub pais_destino:             String,
  #[validate(length(max = 100))]
  pub punto_control_fronterizo: Option<String>,
  pub id_certificado_salud:     Option<i64>,
  pub id_guia_movimiento:       Option<i64>,
  #[validate(length(max = 255))]
  pub url_documento:            Option<String>,
  pub id_emisor:                Option<i64>,
}

fn document_references(
  horse: Option<i64>,
  certificate: Option<i64>,
  guide: Option<i64>,
  issuer: Option<i64>,
) -> Vec<Reference> {
  [
    Reference::optional(EntityKind::Horse, horse),
    Reference::optional(EntityKind::HealthCertificate, certificate),
    Reference::optional(EntityKind::MovementGuide, guide),
    Reference::optional(EntityKind::User, issuer),
  ]
  .into_iter()
  .flatten()
  .collect()
}

impl Insert for NewEuTransportDocument {
  type Record = EuTransportDocument;

  fn references(&self) -> Vec<Reference> {
    document_references(
      Some(self.id_caballo),
      self.id_certificado_salud,
      self.id_guia_movimiento,
      self.id_emisor,
    )
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> EuTransportDocument {
    EuTransportDocument {
      id,
      id_caballo: self.id_caballo,
      numero_documento: self.numero_documento,
      fecha_emision: self.fecha_emision,
      pais_origen: self.pais_origen,
      pais_destino: self.pais_destino,
      punto_control_fronterizo: self.punto_control_fronterizo,
      id_certificado_salud: self.id_certificado_salud,
      id_guia_movimiento: self.id_guia_movimiento,
      url_documento: self.url_documento,
      fecha_registro: now,
      id_emisor: self.id_emisor,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EuTransportDocumentPatch {
  pub id_caballo:               Option<i64>,
  #[validate(length(min = 1, max = 50))]
  pub numero_documento:         Option<String>,
  pub fecha_emision:            Option<NaiveDate>,
  #[validate(length(min = 1, max = 50))]
  pub pais_origen:              Option<String>,
  #[validate(length(min = 1, max = 50))]
  pub pais_destino:             Option<String>,
  #[validate(length(max = 100))]
  #[serde(default, deserialize_with = "nullable")]
  pub punto_control_fronterizo: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_certificado_salud:     Option<Option<i64>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_guia_movimiento:       Option<Option<i64>>,
  #[validate(length(max = 255))]
  #[serde(default, deserialize_with = "nullable")]
  pub url_documento:            Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_emisor:                Option<Option<i64>>,
}

impl Patch for EuTransportDocumentPatch {
  type Record = EuTransportDocument;

  fn references(&self) -> Vec<Reference> {
    document_references(
      self.id_caballo,
      self.id_certificado_salud.flatten(),
      self.id_guia_movimiento.flatten(),
      self.id_emisor.flatten(),
    )
  }

  fn apply(self, doc: &mut EuTransportDocument, _now: DateTime<Utc>) -> Result<()> {
    merge!(
      doc, self;
      id_caballo, numero_documento, fecha_emision, pais_origen, pais_destino,
    );
    merge!(
      doc, self;
      punto_control_fronterizo, id_certificado_salud, id_guia_movimiento,
      url_documento, id_emisor,
    );
    Ok(())
  }
}
