//! Handlers for `/guias-movimiento` endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  movement_guide::{MovementGuide, MovementGuidePatch, NewMovementGuide},
  store::RegistryStore,
};

use crate::{
  documents::DocumentParams,
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Guía de movimiento no encontrada";

/// `GET /guias-movimiento[?caballoId=<id>]`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<DocumentParams>,
) -> Result<Json<Vec<MovementGuide>>, ApiError> {
  let guides = match params.caballo_id {
    Some(horse_id) => store.movement_guides_by_horse(horse_id).await,
    None => store.list_movement_guides().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(guides))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewMovementGuide>,
) -> Result<Json<MovementGuide>, ApiError> {
  let guide = store.create_movement_guide(body).await.map_err(ApiError::store)?;
  Ok(Json(guide))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<MovementGuide>, ApiError> {
  store
    .get_movement_guide(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

/// `PATCH /guias-movimiento/{id}`: typically advances `estado` and records
/// `fechaLlegada`.
pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<MovementGuidePatch>,
) -> Result<Json<MovementGuide>, ApiError> {
  store
    .update_movement_guide(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}
