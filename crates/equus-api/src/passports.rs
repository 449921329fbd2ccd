//! Handlers for `/pasaportes` endpoints.
//!
//! `GET /pasaportes` filters by `?caballoId=`, or with `?expiring=true`
//! returns the passports whose validity ends within the next 30 days.

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  passport::{NewPassport, Passport, PassportPatch},
  store::RegistryStore,
};

use crate::{
  documents::DocumentParams,
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Pasaporte no encontrado";

pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<DocumentParams>,
) -> Result<Json<Vec<Passport>>, ApiError> {
  let passports = match params.caballo_id {
    Some(horse_id) => store.passports_by_horse(horse_id).await,
    None if params.expiring_only() => store.passports_expiring_soon().await,
    None => store.list_passports().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(passports))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewPassport>,
) -> Result<Json<Passport>, ApiError> {
  let passport = store.create_passport(body).await.map_err(ApiError::store)?;
  Ok(Json(passport))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Passport>, ApiError> {
  store
    .get_passport(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<PassportPatch>,
) -> Result<Json<Passport>, ApiError> {
  store
    .update_passport(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}
