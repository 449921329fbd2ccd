//! Domain model of the Equus registry: entities and their payloads, the
//! [`store::RegistryStore`] contract both backends implement, the expiry
//! window and the dashboard aggregation.
//!
//! No HTTP or database code lives here.

// Store methods are declared as `-> impl Future + Send`; implementations use
// `async fn`.
#![allow(async_fn_in_trait)]

pub mod dashboard;
pub mod entity;
pub mod error;
pub mod eu_transport;
pub mod expiry;
pub mod farm;
pub mod health_certificate;
pub mod horse;
pub mod id_card;
pub mod movement_guide;
pub mod passport;
pub mod registry_book;
pub mod store;
pub mod user;

#[cfg(feature = "conformance")]
pub mod conformance;

pub use error::{Error, Result};
