//! Handlers for `/certificados-salud` endpoints. Filtering mirrors
//! `/pasaportes`: `?caballoId=` first, then `?expiring=true`.

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  health_certificate::{HealthCertificate, HealthCertificatePatch, NewHealthCertificate},
  store::RegistryStore,
};

use crate::{
  documents::DocumentParams,
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Certificado de salud no encontrado";

pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<DocumentParams>,
) -> Result<Json<Vec<HealthCertificate>>, ApiError> {
  let certificates = match params.caballo_id {
    Some(horse_id) => store.health_certificates_by_horse(horse_id).await,
    None if params.expiring_only() => store.health_certificates_expiring_soon().await,
    None => store.list_health_certificates().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(certificates))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewHealthCertificate>,
) -> Result<Json<HealthCertificate>, ApiError> {
  let certificate = store
    .create_health_certificate(body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(certificate))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<HealthCertificate>, ApiError> {
  store
    .get_health_certificate(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<HealthCertificatePatch>,
) -> Result<Json<HealthCertificate>, ApiError> {
  store
    .update_health_certificate(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}
