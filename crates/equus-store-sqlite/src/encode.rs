//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are written as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, enums as their lowercase label and booleans as 0/1. Reads go
//! through rusqlite's `chrono` support, which accepts the same text.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use equus_core::{
  entity::Record,
  eu_transport::EuTransportDocument,
  farm::Farm,
  health_certificate::HealthCertificate,
  horse::Horse,
  id_card::{IdCard, IdCardDescription, IdCardMovement, VeterinaryValidation},
  movement_guide::MovementGuide,
  passport::Passport,
  registry_book::RegistryBook,
  user::User,
};
use rusqlite::{Row, types::{Type, Value}};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> Value { Value::Text(dt.to_rfc3339()) }

pub fn encode_date(date: NaiveDate) -> Value {
  Value::Text(date.format("%F").to_string())
}

pub fn encode_label(label: impl Into<&'static str>) -> Value {
  Value::Text(label.into().to_owned())
}

fn optional<T>(value: Option<T>, encode: impl FnOnce(T) -> Value) -> Value {
  value.map_or(Value::Null, encode)
}

/// Parse an enum column through its `FromStr` (strum) impl.
fn decode_label<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  let idx = row.as_ref().column_index(column)?;
  let text: String = row.get(idx)?;
  text
    .parse()
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// A record that maps one-to-one onto a table row.
///
/// The table name is the record's [`equus_core::entity::EntityKind`]; the
/// primary key is always `id`.
pub trait SqlRow: Record + Sized {
  /// Every column except `id`, in the order [`SqlRow::values`] yields them.
  const COLUMNS: &'static [&'static str];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

  fn values(&self) -> Vec<Value>;
}

impl SqlRow for User {
  const COLUMNS: &'static [&'static str] = &[
    "nombre",
    "apellidos",
    "email",
    "password_hash",
    "tipo_usuario",
    "num_colegiado",
    "num_licencia_transporte",
    "id_autoridad",
    "fecha_registro",
    "ultimo_acceso",
    "activo",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(User {
      id:                      row.get("id")?,
      nombre:                  row.get("nombre")?,
      apellidos:               row.get("apellidos")?,
      email:                   row.get("email")?,
      password_hash:           row.get("password_hash")?,
      tipo_usuario:            decode_label(row, "tipo_usuario")?,
      num_colegiado:           row.get("num_colegiado")?,
      num_licencia_transporte: row.get("num_licencia_transporte")?,
      id_autoridad:            row.get("id_autoridad")?,
      fecha_registro:          row.get("fecha_registro")?,
      ultimo_acceso:           row.get("ultimo_acceso")?,
      activo:                  row.get("activo")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.nombre.clone().into(),
      self.apellidos.clone().into(),
      self.email.clone().into(),
      self.password_hash.clone().into(),
      encode_label(self.tipo_usuario),
      self.num_colegiado.clone().into(),
      self.num_licencia_transporte.clone().into(),
      self.id_autoridad.clone().into(),
      encode_dt(self.fecha_registro),
      optional(self.ultimo_acceso, encode_dt),
      self.activo.into(),
    ]
  }
}

impl SqlRow for Farm {
  const COLUMNS: &'static [&'static str] = &[
    "codigo_rega",
    "nombre",
    "direccion",
    "municipio",
    "provincia",
    "codigo_postal",
    "telefono",
    "email",
    "tipo_explotacion",
    "capacidad_maxima",
    "fecha_registro",
    "id_propietario",
    "activa",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Farm {
      id:               row.get("id")?,
      codigo_rega:      row.get("codigo_rega")?,
      nombre:           row.get("nombre")?,
      direccion:        row.get("direccion")?,
      municipio:        row.get("municipio")?,
      provincia:        row.get("provincia")?,
      codigo_postal:    row.get("codigo_postal")?,
      telefono:         row.get("telefono")?,
      email:            row.get("email")?,
      tipo_explotacion: row.get("tipo_explotacion")?,
      capacidad_maxima: row.get("capacidad_maxima")?,
      fecha_registro:   row.get("fecha_registro")?,
      id_propietario:   row.get("id_propietario")?,
      activa:           row.get("activa")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.codigo_rega.clone().into(),
      self.nombre.clone().into(),
      self.direccion.clone().into(),
      self.municipio.clone().into(),
      self.provincia.clone().into(),
      self.codigo_postal.clone().into(),
      self.telefono.clone().into(),
      self.email.clone().into(),
      self.tipo_explotacion.clone().into(),
      self.capacidad_maxima.into(),
      encode_dt(self.fecha_registro),
      self.id_propietario.into(),
      self.activa.into(),
    ]
  }
}

impl SqlRow for Horse {
  const COLUMNS: &'static [&'static str] = &[
    "ueln",
    "microchip",
    "nombre",
    "fecha_nacimiento",
    "sexo",
    "raza",
    "capa",
    "pais_origen",
    "id_explotacion",
    "id_propietario",
    "fecha_registro",
    "activo",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Horse {
      id:               row.get("id")?,
      ueln:             row.get("ueln")?,
      microchip:        row.get("microchip")?,
      nombre:           row.get("nombre")?,
      fecha_nacimiento: row.get("fecha_nacimiento")?,
      sexo:             decode_label(row, "sexo")?,
      raza:             row.get("raza")?,
      capa:             row.get("capa")?,
      pais_origen:      row.get("pais_origen")?,
      id_explotacion:   row.get("id_explotacion")?,
      id_propietario:   row.get("id_propietario")?,
      fecha_registro:   row.get("fecha_registro")?,
      activo:           row.get("activo")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.ueln.clone().into(),
      self.microchip.clone().into(),
      self.nombre.clone().into(),
      encode_date(self.fecha_nacimiento),
      encode_label(self.sexo),
      self.raza.clone().into(),
      self.capa.clone().into(),
      self.pais_origen.clone().into(),
      self.id_explotacion.into(),
      self.id_propietario.into(),
      encode_dt(self.fecha_registro),
      self.activo.into(),
    ]
  }
}

impl SqlRow for Passport {
  const COLUMNS: &'static [&'static str] = &[
    "id_caballo",
    "numero_pasaporte",
    "fecha_emision",
    "autoridad_emisora",
    "fecha_validez",
    "url_documento",
    "estado",
    "fecha_registro",
    "id_emisor",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Passport {
      id:                row.get("id")?,
      id_caballo:        row.get("id_caballo")?,
      numero_pasaporte:  row.get("numero_pasaporte")?,
      fecha_emision:     row.get("fecha_emision")?,
      autoridad_emisora: row.get("autoridad_emisora")?,
      fecha_validez:     row.get("fecha_validez")?,
      url_documento:     row.get("url_documento")?,
      estado:            decode_label(row, "estado")?,
      fecha_registro:    row.get("fecha_registro")?,
      id_emisor:         row.get("id_emisor")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_caballo.into(),
      self.numero_pasaporte.clone().into(),
      encode_date(self.fecha_emision),
      self.autoridad_emisora.clone().into(),
      optional(self.fecha_validez, encode_date),
      self.url_documento.clone().into(),
      encode_label(self.estado),
      encode_dt(self.fecha_registro),
      self.id_emisor.into(),
    ]
  }
}

impl SqlRow for MovementGuide {
  const COLUMNS: &'static [&'static str] = &[
    "id_caballo",
    "numero_guia",
    "fecha_emision",
    "explotacion_origen",
    "explotacion_destino",
    "fecha_salida",
    "fecha_llegada",
    "motivo_traslado",
    "medio_transporte",
    "matricula_vehiculo",
    "id_transportista",
    "estado",
    "url_documento",
    "fecha_registro",
    "id_emisor",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(MovementGuide {
      id:                  row.get("id")?,
      id_caballo:          row.get("id_caballo")?,
      numero_guia:         row.get("numero_guia")?,
      fecha_emision:       row.get("fecha_emision")?,
      explotacion_origen:  row.get("explotacion_origen")?,
      explotacion_destino: row.get("explotacion_destino")?,
      fecha_salida:        row.get("fecha_salida")?,
      fecha_llegada:       row.get("fecha_llegada")?,
      motivo_traslado:     row.get("motivo_traslado")?,
      medio_transporte:    row.get("medio_transporte")?,
      matricula_vehiculo:  row.get("matricula_vehiculo")?,
      id_transportista:    row.get("id_transportista")?,
      estado:              decode_label(row, "estado")?,
      url_documento:       row.get("url_documento")?,
      fecha_registro:      row.get("fecha_registro")?,
      id_emisor:           row.get("id_emisor")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_caballo.into(),
      self.numero_guia.clone().into(),
      encode_date(self.fecha_emision),
      self.explotacion_origen.into(),
      self.explotacion_destino.into(),
      encode_dt(self.fecha_salida),
      optional(self.fecha_llegada, encode_dt),
      self.motivo_traslado.clone().into(),
      self.medio_transporte.clone().into(),
      self.matricula_vehiculo.clone().into(),
      self.id_transportista.into(),
      encode_label(self.estado),
      self.url_documento.clone().into(),
      encode_dt(self.fecha_registro),
      self.id_emisor.into(),
    ]
  }
}

impl SqlRow for HealthCertificate {
  const COLUMNS: &'static [&'static str] = &[
    "id_caballo",
    "numero_certificado",
    "fecha_emision",
    "fecha_validez",
    "id_veterinario",
    "resultado",
    "observaciones",
    "vacunas_aplicadas",
    "pruebas_realizadas",
    "url_documento",
    "fecha_registro",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(HealthCertificate {
      id:                 row.get("id")?,
      id_caballo:         row.get("id_caballo")?,
      numero_certificado: row.get("numero_certificado")?,
      fecha_emision:      row.get("fecha_emision")?,
      fecha_validez:      row.get("fecha_validez")?,
      id_veterinario:     row.get("id_veterinario")?,
      resultado:          decode_label(row, "resultado")?,
      observaciones:      row.get("observaciones")?,
      vacunas_aplicadas:  row.get("vacunas_aplicadas")?,
      pruebas_realizadas: row.get("pruebas_realizadas")?,
      url_documento:      row.get("url_documento")?,
      fecha_registro:     row.get("fecha_registro")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_caballo.into(),
      self.numero_certificado.clone().into(),
      encode_date(self.fecha_emision),
      encode_date(self.fecha_validez),
      self.id_veterinario.into(),
      encode_label(self.resultado),
      self.observaciones.clone().into(),
      self.vacunas_aplicadas.clone().into(),
      self.pruebas_realizadas.clone().into(),
      self.url_documento.clone().into(),
      encode_dt(self.fecha_registro),
    ]
  }
}

impl SqlRow for EuTransportDocument {
  const COLUMNS: &'static [&'static str] = &[
    "id_caballo",
    "numero_documento",
    "fecha_emision",
    "pais_origen",
    "pais_destino",
    "punto_control_fronterizo",
    "id_certificado_salud",
    "id_guia_movimiento",
    "url_documento",
    "fecha_registro",
    "id_emisor",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(EuTransportDocument {
      id:                       row.get("id")?,
      id_caballo:               row.get("id_caballo")?,
      numero_documento:         row.get("numero_documento")?,
      fecha_emision:            row.get("fecha_emision")?,
      pais_origen:              row.get("pais_origen")?,
      pais_destino:             row.get("pais_destino")?,
      punto_control_fronterizo: row.get("punto_control_fronterizo")?,
      id_certificado_salud:     row.get("id_certificado_salud")?,
      id_guia_movimiento:       row.get("id_guia_movimiento")?,
      url_documento:            row.get("url_documento")?,
      fecha_registro:           row.get("fecha_registro")?,
      id_emisor:                row.get("id_emisor")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_caballo.into(),
      self.numero_documento.clone().into(),
      encode_date(self.fecha_emision),
      self.pais_origen.clone().into(),
      self.pais_destino.clone().into(),
      self.punto_control_fronterizo.clone().into(),
      self.id_certificado_salud.into(),
      self.id_guia_movimiento.into(),
      self.url_documento.clone().into(),
      encode_dt(self.fecha_registro),
      self.id_emisor.into(),
    ]
  }
}

impl SqlRow for RegistryBook {
  const COLUMNS: &'static [&'static str] = &[
    "id_explotacion",
    "fecha_apertura",
    "fecha_ultima_actualizacion",
    "url_documento",
    "observaciones",
    "id_responsable",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(RegistryBook {
      id:                         row.get("id")?,
      id_explotacion:             row.get("id_explotacion")?,
      fecha_apertura:             row.get("fecha_apertura")?,
      fecha_ultima_actualizacion: row.get("fecha_ultima_actualizacion")?,
      url_documento:              row.get("url_documento")?,
      observaciones:              row.get("observaciones")?,
      id_responsable:             row.get("id_responsable")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_explotacion.into(),
      encode_date(self.fecha_apertura),
      encode_dt(self.fecha_ultima_actualizacion),
      self.url_documento.clone().into(),
      self.observaciones.clone().into(),
      self.id_responsable.into(),
    ]
  }
}

impl SqlRow for IdCard {
  const COLUMNS: &'static [&'static str] = &[
    "id_caballo",
    "ueln",
    "codigo_transpondedor",
    "nombre_equido",
    "sexo",
    "fecha_nacimiento",
    "capa",
    "fotografia_url",
    "codigo_barras_ueln",
    "numero_tarjeta",
    "fecha_emision",
    "autoridad_emisora",
    "fecha_validez",
    "tiene_escudo_espana",
    "tiene_elementos_seguridad",
    "leyenda_validez",
    "numero_identificacion_electronico",
    "fotografia_reverso_url",
    "impresion_codificada_tme",
    "raza",
    "pais_nacimiento",
    "criador",
    "propietario",
    "observaciones",
    "estado",
    "motivo_estado",
    "fecha_registro",
    "id_emisor",
    "valida_movimientos_espana",
    "valida_movimientos_ue",
    "valida_movimientos_internacionales",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(IdCard {
      id:                                 row.get("id")?,
      id_caballo:                         row.get("id_caballo")?,
      ueln:                               row.get("ueln")?,
      codigo_transpondedor:               row.get("codigo_transpondedor")?,
      nombre_equido:                      row.get("nombre_equido")?,
      sexo:                               decode_label(row, "sexo")?,
      fecha_nacimiento:                   row.get("fecha_nacimiento")?,
      capa:                               row.get("capa")?,
      fotografia_url:                     row.get("fotografia_url")?,
      codigo_barras_ueln:                 row.get("codigo_barras_ueln")?,
      numero_tarjeta:                     row.get("numero_tarjeta")?,
      fecha_emision:                      row.get("fecha_emision")?,
      autoridad_emisora:                  row.get("autoridad_emisora")?,
      fecha_validez:                      row.get("fecha_validez")?,
      tiene_escudo_espana:                row.get("tiene_escudo_espana")?,
      tiene_elementos_seguridad:          row.get("tiene_elementos_seguridad")?,
      leyenda_validez:                    row.get("leyenda_validez")?,
      numero_identificacion_electronico:  row.get("numero_identificacion_electronico")?,
      fotografia_reverso_url:             row.get("fotografia_reverso_url")?,
      impresion_codificada_tme:           row.get("impresion_codificada_tme")?,
      raza:                               row.get("raza")?,
      pais_nacimiento:                    row.get("pais_nacimiento")?,
      criador:                            row.get("criador")?,
      propietario:                        row.get("propietario")?,
      observaciones:                      row.get("observaciones")?,
      estado:                             decode_label(row, "estado")?,
      motivo_estado:                      row.get("motivo_estado")?,
      fecha_registro:                     row.get("fecha_registro")?,
      id_emisor:                          row.get("id_emisor")?,
      valida_movimientos_espana:          row.get("valida_movimientos_espana")?,
      valida_movimientos_ue:              row.get("valida_movimientos_ue")?,
      valida_movimientos_internacionales: row.get("valida_movimientos_internacionales")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_caballo.into(),
      self.ueln.clone().into(),
      self.codigo_transpondedor.clone().into(),
      self.nombre_equido.clone().into(),
      encode_label(self.sexo),
      encode_date(self.fecha_nacimiento),
      self.capa.clone().into(),
      self.fotografia_url.clone().into(),
      self.codigo_barras_ueln.clone().into(),
      self.numero_tarjeta.clone().into(),
      encode_date(self.fecha_emision),
      self.autoridad_emisora.clone().into(),
      optional(self.fecha_validez, encode_date),
      self.tiene_escudo_espana.into(),
      self.tiene_elementos_seguridad.into(),
      self.leyenda_validez.clone().into(),
      self.numero_identificacion_electronico.clone().into(),
      self.fotografia_reverso_url.clone().into(),
      self.impresion_codificada_tme.clone().into(),
      self.raza.clone().into(),
      self.pais_nacimiento.clone().into(),
      self.criador.clone().into(),
      self.propietario.clone().into(),
      self.observaciones.clone().into(),
      encode_label(self.estado),
      self.motivo_estado.clone().into(),
      encode_dt(self.fecha_registro),
      self.id_emisor.into(),
      self.valida_movimientos_espana.into(),
      self.valida_movimientos_ue.into(),
      self.valida_movimientos_internacionales.into(),
    ]
  }
}

impl SqlRow for IdCardDescription {
  const COLUMNS: &'static [&'static str] = &[
    "id_tarjeta",
    "cabeza",
    "cuello",
    "tronco",
    "extremidades_anteriores",
    "extremidades_posteriores",
    "marcas_naturales",
    "marcas_artificiales",
    "cicatrices",
    "remolinos",
    "alzada_cruz",
    "perimetro_toracico",
    "perimetro_cana",
    "fecha_registro",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(IdCardDescription {
      id:                       row.get("id")?,
      id_tarjeta:               row.get("id_tarjeta")?,
      cabeza:                   row.get("cabeza")?,
      cuello:                   row.get("cuello")?,
      tronco:                   row.get("tronco")?,
      extremidades_anteriores:  row.get("extremidades_anteriores")?,
      extremidades_posteriores: row.get("extremidades_posteriores")?,
      marcas_naturales:         row.get("marcas_naturales")?,
      marcas_artificiales:      row.get("marcas_artificiales")?,
      cicatrices:               row.get("cicatrices")?,
      remolinos:                row.get("remolinos")?,
      alzada_cruz:              row.get("alzada_cruz")?,
      perimetro_toracico:       row.get("perimetro_toracico")?,
      perimetro_cana:           row.get("perimetro_cana")?,
      fecha_registro:           row.get("fecha_registro")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_tarjeta.into(),
      self.cabeza.clone().into(),
      self.cuello.clone().into(),
      self.tronco.clone().into(),
      self.extremidades_anteriores.clone().into(),
      self.extremidades_posteriores.clone().into(),
      self.marcas_naturales.clone().into(),
      self.marcas_artificiales.clone().into(),
      self.cicatrices.clone().into(),
      self.remolinos.clone().into(),
      self.alzada_cruz.clone().into(),
      self.perimetro_toracico.clone().into(),
      self.perimetro_cana.clone().into(),
      encode_dt(self.fecha_registro),
    ]
  }
}

impl SqlRow for IdCardMovement {
  const COLUMNS: &'static [&'static str] = &[
    "id_tarjeta",
    "fecha_movimiento",
    "lugar_origen",
    "lugar_destino",
    "motivo_movimiento",
    "nombre_transportista",
    "licencia_transporte",
    "vehiculo_matricula",
    "autorizado_por",
    "sello_oficial",
    "fecha_registro",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(IdCardMovement {
      id:                   row.get("id")?,
      id_tarjeta:           row.get("id_tarjeta")?,
      fecha_movimiento:     row.get("fecha_movimiento")?,
      lugar_origen:         row.get("lugar_origen")?,
      lugar_destino:        row.get("lugar_destino")?,
      motivo_movimiento:    row.get("motivo_movimiento")?,
      nombre_transportista: row.get("nombre_transportista")?,
      licencia_transporte:  row.get("licencia_transporte")?,
      vehiculo_matricula:   row.get("vehiculo_matricula")?,
      autorizado_por:       row.get("autorizado_por")?,
      sello_oficial:        row.get("sello_oficial")?,
      fecha_registro:       row.get("fecha_registro")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_tarjeta.into(),
      encode_date(self.fecha_movimiento),
      self.lugar_origen.clone().into(),
      self.lugar_destino.clone().into(),
      self.motivo_movimiento.clone().into(),
      self.nombre_transportista.clone().into(),
      self.licencia_transporte.clone().into(),
      self.vehiculo_matricula.clone().into(),
      self.autorizado_por.clone().into(),
      self.sello_oficial.into(),
      encode_dt(self.fecha_registro),
    ]
  }
}

impl SqlRow for VeterinaryValidation {
  const COLUMNS: &'static [&'static str] = &[
    "id_tarjeta",
    "fecha_validacion",
    "tipo_validacion",
    "descripcion",
    "nombre_veterinario",
    "numero_colegiado_veterinario",
    "fecha_validez_hasta",
    "fecha_registro",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(VeterinaryValidation {
      id:                           row.get("id")?,
      id_tarjeta:                   row.get("id_tarjeta")?,
      fecha_validacion:             row.get("fecha_validacion")?,
      tipo_validacion:              row.get("tipo_validacion")?,
      descripcion:                  row.get("descripcion")?,
      nombre_veterinario:           row.get("nombre_veterinario")?,
      numero_colegiado_veterinario: row.get("numero_colegiado_veterinario")?,
      fecha_validez_hasta:          row.get("fecha_validez_hasta")?,
      fecha_registro:               row.get("fecha_registro")?,
    })
  }

  fn values(&self) -> Vec<Value> {
    vec![
      self.id_tarjeta.into(),
      encode_date(self.fecha_validacion),
      self.tipo_validacion.clone().into(),
      self.descripcion.clone().into(),
      self.nombre_veterinario.clone().into(),
      self.numero_colegiado_veterinario.clone().into(),
      optional(self.fecha_validez_hasta, encode_date),
      encode_dt(self.fecha_registro),
    ]
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn dates_sort_as_text() {
    let early = encode_date(NaiveDate::from_ymd_opt(2026, 9, 30).unwrap());
    let late = encode_date(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    match (early, late) {
      (Value::Text(a), Value::Text(b)) => assert!(a < b),
      other => panic!("expected text, got {other:?}"),
    }
  }

  #[test]
  fn timestamps_are_rfc3339() {
    let at = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
    assert_eq!(encode_dt(at), Value::Text("2026-03-10T08:00:00+00:00".into()));
  }

  #[test]
  fn columns_line_up_with_values() {
    fn check<T: SqlRow>(sample: &T) {
      assert_eq!(T::COLUMNS.len(), sample.values().len(), "{}", T::KIND);
    }
    let at = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
    let farm = equus_core::conformance::new_farm("ES0001", None);
    check(&equus_core::entity::Insert::into_record(farm, 1, at));
    let horse = equus_core::conformance::new_horse(1, None, None);
    check(&equus_core::entity::Insert::into_record(horse, 1, at));
    let card = equus_core::conformance::new_id_card(1, 1);
    check(&equus_core::entity::Insert::into_record(card, 1, at));
  }
}
