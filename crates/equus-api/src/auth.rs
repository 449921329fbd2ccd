//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login`    | 401 on missing or empty fields, unknown email, wrong password or inactive account |
//! | `POST` | `/auth/register` | 400 if the email is taken |
//!
//! Passwords are stored as argon2 PHC strings. Both endpoints answer with
//! `{"user": {...}}`; the hash is never serialised.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use equus_core::{
  store::RegistryStore,
  user::{Registration, User, UserPatch},
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extract::Valid};

/// Login body. Absent fields read as empty and fail validation, which the
/// handler reports as bad credentials.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct Credentials {
  #[validate(length(min = 1))]
  pub email:    String,
  #[validate(length(min = 1))]
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
  pub user: User,
}

/// Hash `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string. A malformed stored hash
/// counts as a mismatch.
pub fn verify_password(password: &str, stored: &str) -> bool {
  PasswordHash::new(stored).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

/// `POST /auth/login`: body `{"email": ..., "password": ...}`.
pub async fn login<S: RegistryStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
  let Json(credentials) = body?;
  credentials.validate().map_err(|_| ApiError::Unauthorized)?;

  let user = store
    .get_user_by_email(&credentials.email)
    .await
    .map_err(ApiError::store)?
    .filter(|user| user.activo && verify_password(&credentials.password, &user.password_hash))
    .ok_or(ApiError::Unauthorized)?;

  let user = store
    .update_user(user.id, UserPatch::last_access(Utc::now()))
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  tracing::info!(user_id = user.id, "login");
  Ok(Json(UserEnvelope { user }))
}

/// `POST /auth/register`: body is a [`Registration`].
pub async fn register<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(registration): Valid<Registration>,
) -> Result<Json<UserEnvelope>, ApiError> {
  let taken = store
    .get_user_by_email(&registration.email)
    .await
    .map_err(ApiError::store)?;
  if taken.is_some() {
    return Err(ApiError::EmailTaken);
  }

  let password_hash = hash_password(&registration.password)?;
  let user = store
    .create_user(registration.into_new_user(password_hash))
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = user.id, role = %user.tipo_usuario, "registered");
  Ok(Json(UserEnvelope { user }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hashes_verify_only_their_password() {
    let hash = hash_password("correct horse").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("correct horse", &hash));
    assert!(!verify_password("battery staple", &hash));
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("anything", "plaintext"));
    assert!(!verify_password("", ""));
  }
}
