//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves the server as `{"message": "..."}` with a Spanish,
//! client-presentable text. Store failures are classified by looking for an
//! [`equus_core::Error`] in their source chain; anything unrecognised is a 500
//! whose details only reach the log.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed body, query string or path, or a payload failing validation.
  #[error("invalid request: {0}")]
  Invalid(String),

  #[error("missing query parameter {0}")]
  MissingParameter(&'static str),

  /// Carries the client-facing message, e.g. `Caballo no encontrado`.
  #[error("not found: {0}")]
  NotFound(&'static str),

  #[error("invalid credentials")]
  Unauthorized,

  #[error("email already registered")]
  EmailTaken,

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Box a backend error for later classification.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  fn status_and_message(&self) -> (StatusCode, String) {
    match self {
      Self::Invalid(_) => (StatusCode::BAD_REQUEST, "Datos inválidos".into()),
      Self::MissingParameter(name) => (StatusCode::BAD_REQUEST, missing_parameter_message(name)),
      Self::NotFound(message) => (StatusCode::NOT_FOUND, (*message).into()),
      Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Credenciales inválidas".into()),
      Self::EmailTaken => (StatusCode::BAD_REQUEST, "El email ya está registrado".into()),
      Self::PasswordHash(_) => internal(),
      Self::Store(err) => match equus_core::Error::find(&**err) {
        Some(domain) => (StatusCode::BAD_REQUEST, domain_message(domain)),
        None => internal(),
      },
    }
  }
}

fn internal() -> (StatusCode, String) {
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    "Error interno del servidor".into(),
  )
}

fn domain_message(err: &equus_core::Error) -> String {
  use equus_core::Error;
  match err {
    Error::Duplicate { field, .. } if field == "email" => {
      "El email ya está registrado".into()
    }
    Error::Duplicate { field, .. } => {
      format!("Ya existe un registro con ese valor de {}", field_label(field))
    }
    Error::MissingReference { entity, id } => {
      format!("Referencia inexistente: {entity} {id}")
    }
    Error::ImmutableField(field) => {
      format!("El campo {} no se puede modificar", field_label(field))
    }
  }
}

fn missing_parameter_message(name: &str) -> String {
  match name {
    "userId" => "ID de usuario requerido".into(),
    other => format!("Parámetro {other} requerido"),
  }
}

/// Human-readable name of a unique column.
fn field_label(column: &str) -> String {
  match column {
    "ueln" => "UELN".into(),
    "codigo_rega" => "código REGA".into(),
    "numero_pasaporte" => "número de pasaporte".into(),
    "numero_guia" => "número de guía".into(),
    "numero_certificado" => "número de certificado".into(),
    "numero_documento" => "número de documento".into(),
    "numero_tarjeta" => "número de tarjeta".into(),
    other => other.replace('_', " "),
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = self.status_and_message();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::warn!(error = %self, %status, "request rejected");
    }
    (status, Json(json!({ "message": message }))).into_response()
  }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl From<ValidationErrors> for ApiError {
  fn from(err: ValidationErrors) -> Self { Self::Invalid(err.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(err: JsonRejection) -> Self { Self::Invalid(err.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(err: QueryRejection) -> Self { Self::Invalid(err.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(err: PathRejection) -> Self { Self::Invalid(err.body_text()) }
}

#[cfg(test)]
mod tests {
  use equus_core::entity::EntityKind;

  use super::*;

  #[test]
  fn domain_errors_are_client_errors() {
    let err = ApiError::store(equus_core::Error::MissingReference {
      entity: EntityKind::Horse,
      id:     9,
    });
    let (status, message) = err.status_and_message();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "Referencia inexistente: caballos 9");
  }

  #[test]
  fn wrapped_domain_errors_are_found() {
    #[derive(Debug, Error)]
    #[error("backend")]
    struct Backend(#[source] equus_core::Error);

    let err = ApiError::store(Backend(equus_core::Error::ImmutableField("ueln")));
    let (status, message) = err.status_and_message();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "El campo UELN no se puede modificar");
  }

  #[test]
  fn duplicates_name_the_field_readably() {
    let err = ApiError::store(equus_core::Error::Duplicate {
      entity: EntityKind::Passport,
      field:  "numero_pasaporte".into(),
    });
    let (status, message) = err.status_and_message();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "Ya existe un registro con ese valor de número de pasaporte");

    assert_eq!(field_label("codigo_rega"), "código REGA");
    assert_eq!(field_label("microchip"), "microchip");
    assert_eq!(field_label("codigo_transpondedor"), "codigo transpondedor");
  }

  #[test]
  fn missing_user_id_has_a_readable_message() {
    let (status, message) = ApiError::MissingParameter("userId").status_and_message();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "ID de usuario requerido");
  }

  #[test]
  fn unknown_store_errors_do_not_leak() {
    let err = ApiError::store(std::io::Error::other("disk on fire"));
    let (status, message) = err.status_and_message();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!message.contains("disk"));
  }
}
