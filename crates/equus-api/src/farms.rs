//! Handlers for `/explotaciones` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/explotaciones` | Optional `?userId=<owner>` |
//! | `POST`  | `/explotaciones` | Body: [`NewFarm`] |
//! | `GET`   | `/explotaciones/{id}` | 404 if not found |
//! | `PATCH` | `/explotaciones/{id}` | Body: [`FarmPatch`]; 404 if not found |

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  farm::{Farm, FarmPatch, NewFarm},
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Explotación no encontrada";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub user_id: Option<i64>,
}

pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Farm>>, ApiError> {
  let farms = match params.user_id {
    Some(user_id) => store.farms_by_owner(user_id).await,
    None => store.list_farms().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(farms))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewFarm>,
) -> Result<Json<Farm>, ApiError> {
  let farm = store.create_farm(body).await.map_err(ApiError::store)?;
  Ok(Json(farm))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Farm>, ApiError> {
  store
    .get_farm(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<FarmPatch>,
) -> Result<Json<Farm>, ApiError> {
  store
    .update_farm(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}
