//! Equine identification cards (TME, *Tarjeta de Identificación Equina*) as
//! defined by RD 577/2014.
//!
//! A card bundles the identity of one horse with graphic and security
//! elements, plus three append-only child records: body descriptions
//! (reseñas), movements and veterinary validations.
//!
//! The identity block (UELN, transponder, name, sex, birth date, coat) is
//! fixed once the card is issued. [`IdCardPatch::apply`] refuses any change
//! to it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Error, Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge, nullable},
  horse::Sex,
  user::default_true,
};

pub const DEFAULT_VALIDITY_LEGEND: &str = "Válida solo para movimientos dentro de España";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IdCardStatus {
  #[default]
  Activa,
  Suspendida,
  Extraviada,
  Anulada,
}

// ─── Card ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdCard {
  pub id:                                 i64,
  pub id_caballo:                         i64,
  // Identity, immutable after issue.
  pub ueln:                               String,
  pub codigo_transpondedor:               String,
  pub nombre_equido:                      String,
  pub sexo:                               Sex,
  pub fecha_nacimiento:                   NaiveDate,
  pub capa:                               String,
  // Graphic elements.
  pub fotografia_url:                     Option<String>,
  pub codigo_barras_ueln:                 Option<String>,
  // Issue and validity.
  pub numero_tarjeta:                     String,
  pub fecha_emision:                      NaiveDate,
  pub autoridad_emisora:                  String,
  pub fecha_validez:                      Option<NaiveDate>,
  // Security elements.
  pub tiene_escudo_espana:                bool,
  pub tiene_elementos_seguridad:          bool,
  pub leyenda_validez:                    String,
  // Reverse side.
  pub numero_identificacion_electronico:  Option<String>,
  pub fotografia_reverso_url:             Option<String>,
  pub impresion_codificada_tme:           Option<String>,
  // Voluntary data.
  pub raza:                               Option<String>,
  pub pais_nacimiento:                    Option<String>,
  pub criador:                            Option<String>,
  pub propietario:                        Option<String>,
  pub observaciones:                      Option<String>,
  pub estado:                             IdCardStatus,
  pub motivo_estado:                      Option<String>,
  pub fecha_registro:                     DateTime<Utc>,
  pub id_emisor:                          Option<i64>,
  pub valida_movimientos_espana:          bool,
  pub valida_movimientos_ue:              bool,
  pub valida_movimientos_internacionales: bool,
}

impl Record for IdCard {
  const KIND: EntityKind = EntityKind::IdCard;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![
      ("ueln", self.ueln.clone()),
      ("numero_tarjeta", self.numero_tarjeta.clone()),
    ]
  }
}

fn default_legend() -> String { DEFAULT_VALIDITY_LEGEND.to_owned() }

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewIdCard {
  pub id_caballo:                         i64,
  #[validate(length(equal = 15))]
  pub ueln:                               String,
  #[validate(length(min = 15, max = 23))]
  pub codigo_transpondedor:               String,
  #[validate(length(min = 1, max = 100))]
  pub nombre_equido:                      String,
  pub sexo:                               Sex,
  pub fecha_nacimiento:                   NaiveDate,
  #[validate(length(min = 1, max = 50))]
  pub capa:                               String,
  #[validate(length(max = 255))]
  pub fotografia_url:                     Option<String>,
  pub codigo_barras_ueln:                 Option<String>,
  #[validate(length(min = 1, max = 50))]
  pub numero_tarjeta:                     String,
  pub fecha_emision:                      NaiveDate,
  #[validate(length(min = 1, max = 100))]
  pub autoridad_emisora:                  String,
  pub fecha_validez:                      Option<NaiveDate>,
  #[serde(default = "default_true")]
  pub tiene_escudo_espana:                bool,
  #[serde(default = "default_true")]
  pub tiene_elementos_seguridad:          bool,
  #[serde(default = "default_legend")]
  pub leyenda_validez:                    String,
  #[validate(length(max = 20))]
  pub numero_identificacion_electronico:  Option<String>,
  #[validate(length(max = 255))]
  pub fotografia_reverso_url:             Option<String>,
  pub impresion_codificada_tme:           Option<String>,
  #[validate(length(max = 100))]
  pub raza:                               Option<String>,
  #[validate(length(max = 50))]
  pub pais_nacimiento:                    Option<String>,
  #[validate(length(max = 200))]
  pub criador:                            Option<String>,
  #[validate(length(max = 200))]
  pub propietario:                        Option<String>,
  pub observaciones:                      Option<String>,
  #[serde(default)]
  pub estado:                             IdCardStatus,
  pub motivo_estado:                      Option<String>,
  pub id_emisor:                          Option<i64>,
  #[serde(default = "default_true")]
  pub valida_movimientos_espana:          bool,
  #[serde(default)]
  pub valida_movimientos_ue:              bool,
  #[serde(default)]
  pub valida_movimientos_internacionales: bool,
}

impl Insert for NewIdCard {
  type Record = IdCard;

  fn references(&self) -> Vec<Reference> {
    let mut refs = vec![Reference::new(EntityKind::Horse, self.id_caballo)];
    refs.extend(Reference::optional(EntityKind::User, self.id_emisor));
    refs
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> IdCard {
    IdCard {
      id,
      id_caballo: self.id_caballo,
      ueln: self.ueln,
      codigo_transpondedor: self.codigo_transpondedor,
      nombre_equido: self.nombre_equido,
      sexo: self.sexo,
      fecha_nacimiento: self.fecha_nacimiento,
      capa: self.capa,
      fotografia_url: self.fotografia_url,
      codigo_barras_ueln: self.codigo_barras_ueln,
      numero_tarjeta: self.numero_tarjeta,
      fecha_emision: self.fecha_emision,
      autoridad_emisora: self.autoridad_emisora,
      fecha_validez: self.fecha_validez,
      tiene_escudo_espana: self.tiene_escudo_espana,
      tiene_elementos_seguridad: self.tiene_elementos_seguridad,
      leyenda_validez: self.leyenda_validez,
      numero_identificacion_electronico: self.numero_identificacion_electronico,
      fotografia_reverso_url: self.fotografia_reverso_url,
      impresion_codificada_tme: self.impresion_codificada_tme,
      raza: self.raza,
      pais_nacimiento: self.pais_nacimiento,
      criador: self.criador,
      propietario: self.propietario,
      observaciones: self.observaciones,
      estado: self.estado,
      motivo_estado: self.motivo_estado,
      fecha_registro: now,
      id_emisor: self.id_emisor,
      valida_movimientos_espana: self.valida_movimientos_espana,
      valida_movimientos_ue: self.valida_movimientos_ue,
      valida_movimientos_internacionales: self.valida_movimientos_internacionales,
    }
  }
}

/// Partial update of an [`IdCard`].
///
/// The identity fields are accepted so that a client can resubmit a whole
/// card, but only when they repeat the issued value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdCardPatch {
  pub ueln:                               Option<String>,
  pub codigo_transpondedor:               Option<String>,
  pub nombre_equido:                      Option<String>,
  pub sexo:                               Option<Sex>,
  pub fecha_nacimiento:                   Option<NaiveDate>,
  pub capa:                               Option<String>,
  #[validate(length(max = 255))]
  #[serde(default, deserialize_with = "nullable")]
  pub fotografia_url:                     Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub codigo_barras_ueln:                 Option<Option<String>>,
  #[validate(length(min = 1, max = 50))]
  pub numero_tarjeta:                     Option<String>,
  pub fecha_emision:                      Option<NaiveDate>,
  #[validate(length(min = 1, max = 100))]
  pub autoridad_emisora:                  Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub fecha_validez:                      Option<Option<NaiveDate>>,
  pub tiene_escudo_espana:                Option<bool>,
  pub tiene_elementos_seguridad:          Option<bool>,
  pub leyenda_validez:                    Option<String>,
  #[validate(length(max = 20))]
  #[serde(default, deserialize_with = "nullable")]
  pub numero_identificacion_electronico:  Option<Option<String>>,
  #[validate(length(max = 255))]
  #[serde(default, deserialize_with = "nullable")]
  pub fotografia_reverso_url:             Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub impresion_codificada_tme:           Option<Option<String>>,
  #[validate(length(max = 100))]
  #[serde(default, deserialize_with = "nullable")]
  pub raza:                               Option<Option<String>>,
  #[validate(length(max = 50))]
  #[serde(default, deserialize_with = "nullable")]
  pub pais_nacimiento:                    Option<Option<String>>,
  #[validate(length(max = 200))]
  #[serde(default, deserialize_with = "nullable")]
  pub criador:                            Option<Option<String>>,
  #[validate(length(max = 200))]
  #[serde(default, deserialize_with = "nullable")]
  pub propietario:                        Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub observaciones:                      Option<Option<String>>,
  pub estado:                             Option<IdCardStatus>,
  #[serde(default, deserialize_with = "nullable")]
  pub motivo_estado:                      Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub id_emisor:                          Option<Option<i64>>,
  pub valida_movimientos_espana:          Option<bool>,
  pub valida_movimientos_ue:              Option<bool>,
  pub valida_movimientos_internacionales: Option<bool>,
}

fn unchanged<T: PartialEq>(
  field: &'static str,
  proposed: Option<&T>,
  issued: &T,
) -> Result<()> {
  match proposed {
    Some(value) if value != issued => Err(Error::ImmutableField(field)),
    _ => Ok(()),
  }
}

impl IdCardPatch {
  fn check_identity(&self, card: &IdCard) -> Result<()> {
    unchanged("ueln", self.ueln.as_ref(), &card.ueln)?;
    unchanged(
      "codigoTranspondedor",
      self.codigo_transpondedor.as_ref(),
      &card.codigo_transpondedor,
    )?;
    unchanged("nombreEquido", self.nombre_equido.as_ref(), &card.nombre_equido)?;
    unchanged("sexo", self.sexo.as_ref(), &card.sexo)?;
    unchanged(
      "fechaNacimiento",
      self.fecha_nacimiento.as_ref(),
      &card.fecha_nacimiento,
    )?;
    unchanged("capa", self.capa.as_ref(), &card.capa)
  }
}

impl Patch for IdCardPatch {
  type Record = IdCard;

  fn references(&self) -> Vec<Reference> {
    Reference::optional(EntityKind::User, self.id_emisor.flatten())
      .into_iter()
      .collect()
  }

  fn apply(self, card: &mut IdCard, _now: DateTime<Utc>) -> Result<()> {
    self.check_identity(card)?;
    merge!(
      card, self;
      numero_tarjeta, fecha_emision, autoridad_emisora, tiene_escudo_espana,
      tiene_elementos_seguridad, leyenda_validez, estado,
      valida_movimientos_espana, valida_movimientos_ue,
      valida_movimientos_internacionales,
    );
    merge!(
      card, self;
      fotografia_url, codigo_barras_ueln, fecha_validez,
      numero_identificacion_electronico, fotografia_reverso_url,
      impresion_codificada_tme, raza, pais_nacimiento, criador, propietario,
      observaciones, motivo_estado, id_emisor,
    );
    Ok(())
  }
}

// ─── Reseña ──────────────────────────────────────────────────────────────────

/// Written description of the horse's body and markings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdCardDescription {
  pub id:                       i64,
  pub id_tarjeta:               i64,
  pub cabeza:                   Option<String>,
  pub cuello:                   Option<String>,
  pub tronco:                   Option<String>,
  pub extremidades_anteriores:  Option<String>,
  pub extremidades_posteriores: Option<String>,
  pub marcas_naturales:         Option<String>,
  pub marcas_artificiales:      Option<String>,
  pub cicatrices:               Option<String>,
  pub remolinos:                Option<String>,
  /// Height at the withers, in cm.
  pub alzada_cruz:              Option<String>,
  pub perimetro_toracico:       Option<String>,
  pub perimetro_cana:           Option<String>,
  pub fecha_registro:           DateTime<Utc>,
}

impl Record for IdCardDescription {
  const KIND: EntityKind = EntityKind::IdCardDescription;

  fn id(&self) -> i64 { self.id }
}

/// Body of `POST /tarjetas-tme/{id}/resenas`; the card id comes from the path.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewIdCardDescription {
  #[serde(skip)]
  pub id_tarjeta:               i64,
  pub cabeza:                   Option<String>,
  pub cuello:                   Option<String>,
  pub tronco:                   Option<String>,
  pub extremidades_anteriores:  Option<String>,
  pub extremidades_posteriores: Option<String>,
  pub marcas_naturales:         Option<String>,
  pub marcas_artificiales:      Option<String>,
  pub cicatrices:               Option<String>,
  pub remolinos:                Option<String>,
  #[validate(length(max = 10))]
  pub alzada_cruz:              Option<String>,
  #[validate(length(max = 10))]
  pub perimetro_toracico:       Option<String>,
  #[validate(length(max = 10))]
  pub perimetro_cana:           Option<String>,
}

impl Insert for NewIdCardDescription {
  type Record = IdCardDescription;

  fn references(&self) -> Vec<Reference> {
    vec![Reference::new(EntityKind::IdCard, self.id_tarjeta)]
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> IdCardDescription {
    IdCardDescription {
      id,
      id_tarjeta: self.id_tarjeta,
      cabeza: self.cabeza,
      cuello: self.cuello,
      tronco: self.tronco,
      extremidades_anteriores: self.extremidades_anteriores,
      extremidades_posteriores: self.extremidades_posteriores,
      marcas_naturales: self.marcas_naturales,
      marcas_artificiales: self.marcas_artificiales,
      cicatrices: self.cicatrices,
      remolinos: self.remolinos,
      alzada_cruz: self.alzada_cruz,
      perimetro_toracico: self.perimetro_toracico,
      perimetro_cana: self.perimetro_cana,
      fecha_registro: now,
    }
  }
}

// ─── Movements ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdCardMovement {
  pub id:                   i64,
  pub id_tarjeta:           i64,
  pub fecha_movimiento:     NaiveDate,
  pub lugar_origen:         String,
  pub lugar_destino:        String,
  pub motivo_movimiento:    String,
  pub nombre_transportista: Option<String>,
  pub licencia_transporte:  Option<String>,
  pub vehiculo_matricula:   Option<String>,
  pub autorizado_por:       Option<String>,
  pub sello_oficial:        bool,
  pub fecha_registro:       DateTime<Utc>,
}

impl Record for IdCardMovement {
  const KIND: EntityKind = EntityKind::IdCardMovement;

  fn id(&self) -> i64 { self.id }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewIdCardMovement {
  #[serde(skip)]
  pub id_tarjeta:           i64,
  pub fecha_movimiento:     NaiveDate,
  #[validate(length(min = 1, max = 200))]
  pub lugar_origen:         String,
  #[validate(length(min = 1, max = 200))]
  pub lugar_destino:        String,
  #[validate(length(min = 1, max = 100))]
  pub motivo_movimiento:    String,
  #[validate(length(max = 200))]
  pub nombre_transportista: Option<String>,
  #[validate(length(max = 50))]
  pub licencia_transporte:  Option<String>,
  #[validate(length(max = 20))]
  pub vehiculo_matricula:   Option<String>,
  #[validate(length(max = 200))]
  pub autorizado_por:       Option<String>,
  #[serde(default)]
  pub sello_oficial:        bool,
}

impl Insert for NewIdCardMovement {
  type Record = IdCardMovement;

  fn references(&self) -> Vec<Reference> {
    vec![Reference::new(EntityKind::IdCard, self.id_tarjeta)]
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> IdCardMovement {
    IdCardMovement {
      id,
      id_tarjeta: self.id_tarjeta,
      fecha_movimiento: self.fecha_movimiento,
      lugar_origen: self.lugar_origen,
      lugar_destino: self.lugar_destino,
      motivo_movimiento: self.motivo_movimiento,
      nombre_transportista: self.nombre_transportista,
      licencia_transporte: self.licencia_transporte,
      vehiculo_matricula: self.vehiculo_matricula,
      autorizado_por: self.autorizado_por,
      sello_oficial: self.sello_oficial,
      fecha_registro: now,
    }
  }
}

// ─── Veterinary validations ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinaryValidation {
  pub id:                           i64,
  pub id_tarjeta:                   i64,
  pub fecha_validacion:             NaiveDate,
  /// Vaccination, inspection, treatment…
  pub tipo_validacion:              String,
  pub descripcion:                  String,
  pub nombre_veterinario:           String,
  pub numero_colegiado_veterinario: String,
  pub fecha_validez_hasta:          Option<NaiveDate>,
  pub fecha_registro:               DateTime<Utc>,
}

impl Record for VeterinaryValidation {
  const KIND: EntityKind = EntityKind::VeterinaryValidation;

  fn id(&self) -> i64 { self.id }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewVeterinaryValidation {
  #[serde(skip)]
  pub id_tarjeta:                   i64,
  pub fecha_validacion:             NaiveDate,
  #[validate(length(min = 1, max = 50))]
  pub tipo_validacion:              String,
  #[validate(length(min = 1))]
  pub descripcion:                  String,
  #[validate(length(min = 1, max = 200))]
  pub nombre_veterinario:           String,
  #[validate(length(min = 1, max = 50))]
  pub numero_colegiado_veterinario: String,
  pub fecha_validez_hasta:          Option<NaiveDate>,
}

impl Insert for NewVeterinaryValidation {
  type Record = VeterinaryValidation;

  fn references(&self) -> Vec<Reference> {
    vec![Reference::new(EntityKind::IdCard, self.id_tarjeta)]
  }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> VeterinaryValidation {
    VeterinaryValidation {
      id,
      id_tarjeta: self.id_tarjeta,
      fecha_validacion: self.fecha_validacion,
      tipo_validacion: self.tipo_validacion,
      descripcion: self.descripcion,
      nombre_veterinario: self.nombre_veterinario,
      numero_colegiado_veterinario: self.numero_colegiado_veterinario,
      fecha_validez_hasta: self.fecha_validez_hasta,
      fecha_registro: now,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn card() -> IdCard {
    serde_json::from_value::<NewIdCard>(serde_json::json!({
      "idCaballo": 1,
      "ueln": "724015000012345",
      "codigoTranspondedor": "982000123456789",
      "nombreEquido": "Lucero",
      "sexo": "Macho",
      "fechaNacimiento": "2018-05-01",
      "capa": "Castaña",
      "numeroTarjeta": "TME-0001",
      "fechaEmision": "2026-01-15",
      "autoridadEmisora": "Junta de Andalucía",
    }))
    .unwrap()
    .into_record(1, Utc::now())
  }

  #[test]
  fn defaults_follow_the_regulation() {
    let card = card();
    assert!(card.tiene_escudo_espana);
    assert!(card.tiene_elementos_seguridad);
    assert_eq!(card.leyenda_validez, DEFAULT_VALIDITY_LEGEND);
    assert_eq!(card.estado, IdCardStatus::Activa);
    assert!(card.valida_movimientos_espana);
    assert!(!card.valida_movimientos_ue);
    assert!(!card.valida_movimientos_internacionales);
  }

  #[test]
  fn identity_fields_cannot_change() {
    let mut card = card();
    let patch = IdCardPatch {
      ueln: Some("724015000099999".into()),
      observaciones: Some(Some("should not land".into())),
      ..IdCardPatch::default()
    };

    let err = patch.apply(&mut card, Utc::now()).unwrap_err();
    assert!(matches!(err, Error::ImmutableField("ueln")));
    assert_eq!(card.ueln, "724015000012345");
    assert!(card.observaciones.is_none());
  }

  #[test]
  fn repeating_identity_values_is_accepted() {
    let mut card = card();
    let patch = IdCardPatch {
      nombre_equido: Some("Lucero".into()),
      sexo: Some(Sex::Macho),
      estado: Some(IdCardStatus::Extraviada),
      motivo_estado: Some(Some("Denuncia 12/2026".into())),
      ..IdCardPatch::default()
    };

    patch.apply(&mut card, Utc::now()).unwrap();
    assert_eq!(card.estado, IdCardStatus::Extraviada);
    assert_eq!(card.motivo_estado.as_deref(), Some("Denuncia 12/2026"));
  }

  #[test]
  fn child_bodies_cannot_name_their_card() {
    let body = serde_json::json!({
      "idTarjeta": 9,
      "fechaMovimiento": "2026-02-01",
      "lugarOrigen": "A",
      "lugarDestino": "B",
      "motivoMovimiento": "Concurso",
    });
    assert!(serde_json::from_value::<NewIdCardMovement>(body).is_err());
  }
}
