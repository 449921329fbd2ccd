//! Handlers for `/documentos-transporte-ue` endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  eu_transport::{EuTransportDocument, EuTransportDocumentPatch, NewEuTransportDocument},
  store::RegistryStore,
};

use crate::{
  documents::DocumentParams,
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Documento de transporte UE no encontrado";

pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<DocumentParams>,
) -> Result<Json<Vec<EuTransportDocument>>, ApiError> {
  let documents = match params.caballo_id {
    Some(horse_id) => store.eu_transport_documents_by_horse(horse_id).await,
    None => store.list_eu_transport_documents().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(documents))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewEuTransportDocument>,
) -> Result<Json<EuTransportDocument>, ApiError> {
  let document = store
    .create_eu_transport_document(body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(document))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<EuTransportDocument>, ApiError> {
  store
    .get_eu_transport_document(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<EuTransportDocumentPatch>,
) -> Result<Json<EuTransportDocument>, ApiError> {
  store
    .update_eu_transport_document(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}
