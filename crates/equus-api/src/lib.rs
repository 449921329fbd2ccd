//! JSON REST API for the Equus registry.
//!
//! Exposes an axum [`Router`] backed by any [`RegistryStore`]. TLS, tracing
//! layers and the listener are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", equus_api::api_router(store.clone()))
//! ```

pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod eu_transport;
pub mod extract;
pub mod farms;
pub mod health_certificates;
pub mod horses;
pub mod id_cards;
pub mod movement_guides;
pub mod passports;
pub mod registry_books;
pub mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use equus_core::store::RegistryStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RegistryStore + 'static,
{
  Router::new()
    // Accounts
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/register", post(auth::register::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    .route("/dashboard/stats", get(dashboard::stats::<S>))
    // Farms and horses
    .route("/explotaciones", get(farms::list::<S>).post(farms::create::<S>))
    .route("/explotaciones/{id}", get(farms::get_one::<S>).patch(farms::update::<S>))
    .route("/caballos", get(horses::list::<S>).post(horses::create::<S>))
    .route("/caballos/{id}", get(horses::get_one::<S>).patch(horses::update::<S>))
    // Documents
    .route("/pasaportes", get(passports::list::<S>).post(passports::create::<S>))
    .route(
      "/pasaportes/{id}",
      get(passports::get_one::<S>).patch(passports::update::<S>),
    )
    .route(
      "/guias-movimiento",
      get(movement_guides::list::<S>).post(movement_guides::create::<S>),
    )
    .route(
      "/guias-movimiento/{id}",
      get(movement_guides::get_one::<S>).patch(movement_guides::update::<S>),
    )
    .route(
      "/certificados-salud",
      get(health_certificates::list::<S>).post(health_certificates::create::<S>),
    )
    .route(
      "/certificados-salud/{id}",
      get(health_certificates::get_one::<S>).patch(health_certificates::update::<S>),
    )
    .route(
      "/documentos-transporte-ue",
      get(eu_transport::list::<S>).post(eu_transport::create::<S>),
    )
    .route(
      "/documentos-transporte-ue/{id}",
      get(eu_transport::get_one::<S>).patch(eu_transport::update::<S>),
    )
    .route(
      "/libros-registro",
      get(registry_books::list::<S>).post(registry_books::create::<S>),
    )
    .route(
      "/libros-registro/{id}",
      get(registry_books::get_one::<S>).patch(registry_books::update::<S>),
    )
    // TME cards
    .route("/tarjetas-tme", get(id_cards::list::<S>).post(id_cards::create::<S>))
    .route(
      "/tarjetas-tme/{id}",
      get(id_cards::get_one::<S>).patch(id_cards::update::<S>),
    )
    .route(
      "/tarjetas-tme/{id}/resenas",
      get(id_cards::list_descriptions::<S>).post(id_cards::add_description::<S>),
    )
    .route(
      "/tarjetas-tme/{id}/movimientos",
      get(id_cards::list_movements::<S>).post(id_cards::add_movement::<S>),
    )
    .route(
      "/tarjetas-tme/{id}/validaciones",
      get(id_cards::list_validations::<S>).post(id_cards::add_validation::<S>),
    )
    .with_state(store)
}
