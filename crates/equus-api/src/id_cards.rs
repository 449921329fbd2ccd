//! Handlers for `/tarjetas-tme` endpoints: TME identification cards and
//! their append-only child records.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/tarjetas-tme` | Optional `?caballoId=` |
//! | `POST`  | `/tarjetas-tme` | Body: [`NewIdCard`] |
//! | `GET`   | `/tarjetas-tme/{id}` | 404 if not found |
//! | `PATCH` | `/tarjetas-tme/{id}` | Identity fields may only repeat their issued value |
//! | `GET`/`POST` | `/tarjetas-tme/{id}/resenas` | Descriptions |
//! | `GET`/`POST` | `/tarjetas-tme/{id}/movimientos` | Movements |
//! | `GET`/`POST` | `/tarjetas-tme/{id}/validaciones` | Veterinary validations |
//!
//! Child routes answer 404 when the card does not exist.

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  id_card::{
    IdCard, IdCardDescription, IdCardMovement, IdCardPatch, NewIdCard,
    NewIdCardDescription, NewIdCardMovement, NewVeterinaryValidation,
    VeterinaryValidation,
  },
  store::RegistryStore,
};

use crate::{
  documents::DocumentParams,
  error::ApiError,
  extract::{Path, Query, Valid},
};

const NOT_FOUND: &str = "Tarjeta TME no encontrada";

// ─── Cards ───────────────────────────────────────────────────────────────────

pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<DocumentParams>,
) -> Result<Json<Vec<IdCard>>, ApiError> {
  let cards = match params.caballo_id {
    Some(horse_id) => store.id_cards_by_horse(horse_id).await,
    None => store.list_id_cards().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(cards))
}

pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Valid(body): Valid<NewIdCard>,
) -> Result<Json<IdCard>, ApiError> {
  let card = store.create_id_card(body).await.map_err(ApiError::store)?;
  tracing::debug!(id = card.id, numero = %card.numero_tarjeta, "card issued");
  Ok(Json(card))
}

pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<IdCard>, ApiError> {
  store
    .get_id_card(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<IdCardPatch>,
) -> Result<Json<IdCard>, ApiError> {
  store
    .update_id_card(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NotFound(NOT_FOUND))
}

async fn require_card<S: RegistryStore>(store: &S, id: i64) -> Result<(), ApiError> {
  match store.get_id_card(id).await.map_err(ApiError::store)? {
    Some(_) => Ok(()),
    None => Err(ApiError::NotFound(NOT_FOUND)),
  }
}

// ─── Descriptions (reseñas) ──────────────────────────────────────────────────

pub async fn list_descriptions<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<IdCardDescription>>, ApiError> {
  require_card(store.as_ref(), id).await?;
  let descriptions = store.id_card_descriptions(id).await.map_err(ApiError::store)?;
  Ok(Json(descriptions))
}

pub async fn add_description<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(mut body): Valid<NewIdCardDescription>,
) -> Result<Json<IdCardDescription>, ApiError> {
  require_card(store.as_ref(), id).await?;
  body.id_tarjeta = id;
  let description = store
    .add_id_card_description(body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(description))
}

// ─── Movements ───────────────────────────────────────────────────────────────

pub async fn list_movements<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<IdCardMovement>>, ApiError> {
  require_card(store.as_ref(), id).await?;
  let movements = store.id_card_movements(id).await.map_err(ApiError::store)?;
  Ok(Json(movements))
}

pub async fn add_movement<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(mut body): Valid<NewIdCardMovement>,
) -> Result<Json<IdCardMovement>, ApiError> {
  require_card(store.as_ref(), id).await?;
  body.id_tarjeta = id;
  let movement = store.add_id_card_movement(body).await.map_err(ApiError::store)?;
  Ok(Json(movement))
}

// ─── Veterinary validations ──────────────────────────────────────────────────

pub async fn list_validations<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<VeterinaryValidation>>, ApiError> {
  require_card(store.as_ref(), id).await?;
  let validations = store.veterinary_validations(id).await.map_err(ApiError::store)?;
  Ok(Json(validations))
}

pub async fn add_validation<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Valid(mut body): Valid<NewVeterinaryValidation>,
) -> Result<Json<VeterinaryValidation>, ApiError> {
  require_card(store.as_ref(), id).await?;
  body.id_tarjeta = id;
  let validation = store
    .add_veterinary_validation(body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(validation))
}
