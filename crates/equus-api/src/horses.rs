//! Handlers for `/caballos` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/caballos` | `?userId=` wins over `?explotacionId=` |
//! | `POST`  | `/caballos` | Body: [`NewHorse`]; 400 on duplicate UELN or microchip |
//! | `GET`   | `/caballos/{id}` | 404 if not found |
//! | `PATCH` | `/caballos/{id}` | Body: [`HorsePatch`] |

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  horse::{Horse, HorsePatch, NewHorse},
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Caballo no encontrado";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub user_id:        Option<i64>,
  pub explotacion_id: Option<i64>,
}

pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Horse>>, ApiError> {
  let horses = match (params.user_id, params.explotacion_id) {
    (Some(user_id), _) => store.horses_by_owner(user_id).await,
    (None, Some(farm_id)) => store.horses_by_farm(farm_id).await,
    (None, None) => store.list_horses().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(horses))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewHorse>,
) -> Result<Json<Horse>, ApiError> {
  let horse = store.create_horse(body).await.map_err(ApiError::store)?;
  tracing::debug!(id = horse.id, ueln = %horse.ueln, "horse registered");
  Ok(Json(horse))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Horse>, ApiError> {
  store
    .get_horse(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<HorsePatch>,
) -> Result<Json<Horse>, ApiError> {
  store
    .update_horse(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}
