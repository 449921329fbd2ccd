//! Users and their roles.
//!
//! The role only gates UI affordances; the server never refuses a request on
//! role grounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Result,
  entity::{EntityKind, Insert, Patch, Record, Reference, merge},
};

/// What kind of actor a user is.
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
pub enum Role {
  /// Horse or farm owner.
  Propietario,
  Veterinario,
  Transportista,
  /// Competent authority; sees everything.
  Autoridad,
}

impl Role {
  pub fn display_name(self) -> &'static str {
    match self {
      Self::Propietario => "Propietario",
      Self::Veterinario => "Veterinario",
      Self::Transportista => "Transportista",
      Self::Autoridad => "Autoridad",
    }
  }

  pub fn can_manage_horses(self) -> bool {
    matches!(self, Self::Propietario | Self::Veterinario | Self::Autoridad)
  }

  pub fn can_issue_health_certificates(self) -> bool {
    self == Self::Veterinario
  }

  pub fn can_manage_transport(self) -> bool {
    matches!(self, Self::Transportista | Self::Autoridad)
  }

  pub fn can_access_all_data(self) -> bool { self == Self::Autoridad }
}

/// A registered account. The password hash is never serialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:                      i64,
  pub nombre:                  String,
  pub apellidos:               String,
  pub email:                   String,
  #[serde(skip_serializing, default)]
  pub password_hash:           String,
  pub tipo_usuario:            Role,
  pub num_colegiado:           Option<String>,
  pub num_licencia_transporte: Option<String>,
  pub id_autoridad:            Option<String>,
  pub fecha_registro:          DateTime<Utc>,
  pub ultimo_acceso:           Option<DateTime<Utc>>,
  pub activo:                  bool,
}

impl User {
  pub fn full_name(&self) -> String { format!("{} {}", self.nombre, self.apellidos) }
}

impl Record for User {
  const KIND: EntityKind = EntityKind::User;

  fn id(&self) -> i64 { self.id }

  fn unique_keys(&self) -> Vec<(&'static str, String)> {
    vec![("email", self.email.clone())]
  }
}

/// Body of `POST /auth/register`. Carries the clear-text password, which is
/// hashed before it reaches a store.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Registration {
  #[validate(length(min = 1, max = 100))]
  pub nombre:                  String,
  #[validate(length(min = 1, max = 100))]
  pub apellidos:               String,
  #[validate(email, length(max = 100))]
  pub email:                   String,
  #[validate(length(min = 8, max = 255))]
  pub password:                String,
  pub tipo_usuario:            Role,
  #[validate(length(max = 50))]
  pub num_colegiado:           Option<String>,
  #[validate(length(max = 50))]
  pub num_licencia_transporte: Option<String>,
  #[validate(length(max = 50))]
  pub id_autoridad:            Option<String>,
  #[serde(default = "default_true")]
  pub activo:                  bool,
}

impl Registration {
  /// Swap the clear-text password for its hash.
  pub fn into_new_user(self, password_hash: String) -> NewUser {
    NewUser {
      nombre: self.nombre,
      apellidos: self.apellidos,
      email: self.email,
      password_hash,
      tipo_usuario: self.tipo_usuario,
      num_colegiado: self.num_colegiado,
      num_licencia_transporte: self.num_licencia_transporte,
      id_autoridad: self.id_autoridad,
      activo: self.activo,
    }
  }
}

/// Input to [`crate::store::RegistryStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub nombre:                  String,
  pub apellidos:               String,
  pub email:                   String,
  pub password_hash:           String,
  pub tipo_usuario:            Role,
  pub num_colegiado:           Option<String>,
  pub num_licencia_transporte: Option<String>,
  pub id_autoridad:            Option<String>,
  pub activo:                  bool,
}

impl Insert for NewUser {
  type Record = User;

  fn references(&self) -> Vec<Reference> { Vec::new() }

  fn into_record(self, id: i64, now: DateTime<Utc>) -> User {
    User {
      id,
      nombre: self.nombre,
      apellidos: self.apellidos,
      email: self.email,
      password_hash: self.password_hash,
      tipo_usuario: self.tipo_usuario,
      num_colegiado: self.num_colegiado,
      num_licencia_transporte: self.num_licencia_transporte,
      id_autoridad: self.id_autoridad,
      fecha_registro: now,
      ultimo_acceso: None,
      activo: self.activo,
    }
  }
}

/// Partial update of a [`User`].
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
  pub nombre:                  Option<String>,
  pub apellidos:               Option<String>,
  pub email:                   Option<String>,
  pub password_hash:           Option<String>,
  pub tipo_usuario:            Option<Role>,
  pub num_colegiado:           Option<Option<String>>,
  pub num_licencia_transporte: Option<Option<String>>,
  pub id_autoridad:            Option<Option<String>>,
  pub ultimo_acceso:           Option<Option<DateTime<Utc>>>,
  pub activo:                  Option<bool>,
}

impl UserPatch {
  /// The patch applied on every successful login.
  pub fn last_access(at: DateTime<Utc>) -> Self {
    Self { ultimo_acceso: Some(Some(at)), ..Self::default() }
  }
}

impl Patch for UserPatch {
  type Record = User;

  fn references(&self) -> Vec<Reference> { Vec::new() }

  fn apply(self, user: &mut User, _now: DateTime<Utc>) -> Result<()> {
    merge!(user, self; nombre, apellidos, email, password_hash, tipo_usuario, activo);
    merge!(
      user, self;
      num_colegiado, num_licencia_transporte, id_autoridad, ultimo_acceso,
    );
    Ok(())
  }
}

pub(crate) fn default_true() -> bool { true }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_predicates() {
    assert!(Role::Propietario.can_manage_horses());
    assert!(!Role::Transportista.can_manage_horses());
    assert!(Role::Veterinario.can_issue_health_certificates());
    assert!(!Role::Autoridad.can_issue_health_certificates());
    assert!(Role::Transportista.can_manage_transport());
    assert!(Role::Autoridad.can_manage_transport());
    assert!(!Role::Propietario.can_manage_transport());
    assert!(Role::Autoridad.can_access_all_data());
    assert!(!Role::Veterinario.can_access_all_data());
  }

  #[test]
  fn role_text_form_matches_wire_form() {
    assert_eq!(Role::Transportista.to_string(), "transportista");
    assert_eq!("autoridad".parse::<Role>().unwrap(), Role::Autoridad);
    let json = serde_json::to_string(&Role::Veterinario).unwrap();
    assert_eq!(json, "\"veterinario\"");
  }

  #[test]
  fn registration_rejects_short_password_and_bad_email() {
    let body = serde_json::json!({
      "nombre": "Ana",
      "apellidos": "García",
      "email": "not-an-email",
      "password": "short",
      "tipoUsuario": "propietario",
    });
    let reg: Registration = serde_json::from_value(body).unwrap();
    let errors = reg.validate().unwrap_err();
    let fields = errors.field_errors();
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("password"));
  }

  #[test]
  fn registration_rejects_client_supplied_timestamp() {
    let body = serde_json::json!({
      "nombre": "Ana",
      "apellidos": "García",
      "email": "ana@example.com",
      "password": "long-enough",
      "tipoUsuario": "propietario",
      "fechaRegistro": "2020-01-01T00:00:00Z",
    });
    assert!(serde_json::from_value::<Registration>(body).is_err());
  }

  #[test]
  fn password_hash_is_not_serialised() {
    let user = Registration {
      nombre:                  "Ana".into(),
      apellidos:               "García".into(),
      email:                   "ana@example.com".into(),
      password:                "long-enough".into(),
      tipo_usuario:            Role::Propietario,
      num_colegiado:           None,
      num_licencia_transporte: None,
      id_autoridad:            None,
      activo:                  true,
    }
    .into_new_user("$argon2id$fake".into())
    .into_record(1, Utc::now());

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert_eq!(json["tipoUsuario"], "propietario");
    assert_eq!(json["activo"], true);
  }
}
