//! `GET /users/{id}`. Accounts are created through `/auth/register`.

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{store::RegistryStore, user::User};

use crate::{error::ApiError, extract::Path};

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
  store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound("Usuario no encontrado"))
}
