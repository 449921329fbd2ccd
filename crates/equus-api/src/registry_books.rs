//! Handlers for `/libros-registro` endpoints. Books belong to a farm;
//! `?explotacionId=` narrows the list.

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  registry_book::{NewRegistryBook, RegistryBook, RegistryBookPatch},
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Libro de registro no encontrado";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub explotacion_id: Option<i64>,
}

pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RegistryBook>>, ApiError> {
  let books = match params.explotacion_id {
    Some(farm_id) => store.registry_books_by_farm(farm_id).await,
    None => store.list_registry_books().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(books))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewRegistryBook>,
) -> Result<Json<RegistryBook>, ApiError> {
  let book = store.create_registry_book(body).await.map_err(ApiError::store)?;
  Ok(Json(book))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<RegistryBook>, ApiError> {
  store
    .get_registry_book(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

/// `PATCH /libros-registro/{id}`; the store refreshes
/// `fechaUltimaActualizacion`.
pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<RegistryBookPatch>,
) -> Result<Json<RegistryBook>, ApiError> {
  store
    .update_registry_book(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}
