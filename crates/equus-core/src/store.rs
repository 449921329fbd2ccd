//! The `RegistryStore` trait.
//!
//! The trait is implemented by storage backends (`equus-store-memory`,
//! `equus-store-sqlite`). Higher layers (`equus-api`, `equus-server`) depend
//! on this abstraction, not on any concrete backend, and the two backends must
//! be observably identical apart from their error types.
//!
//! Conventions shared by every entity:
//!
//! - `create_*` assigns the id and the registration timestamp; callers never
//!   supply either.
//! - `update_*` merges a partial patch and returns `Ok(None)` when the id does
//!   not exist. A missing id is not an error.
//! - Lists come back in ascending id order.
//! - Foreign keys named by a payload must exist, otherwise the call fails
//!   with [`crate::Error::MissingReference`]. Unique columns clashing with an
//!   existing row fail with [`crate::Error::Duplicate`].

use std::future::Future;

use crate::{
  eu_transport::{EuTransportDocument, EuTransportDocumentPatch, NewEuTransportDocument},
  expiry::ExpiryWindow,
  farm::{Farm, FarmPatch, NewFarm},
  health_certificate::{HealthCertificate, HealthCertificatePatch, NewHealthCertificate},
  horse::{Horse, HorsePatch, NewHorse},
  id_card::{
    IdCard, IdCardDescription, IdCardMovement, IdCardPatch, NewIdCard,
    NewIdCardDescription, NewIdCardMovement, NewVeterinaryValidation,
    VeterinaryValidation,
  },
  movement_guide::{MovementGuide, MovementGuidePatch, NewMovementGuide},
  passport::{NewPassport, Passport, PassportPatch},
  registry_book::{NewRegistryBook, RegistryBook, RegistryBookPatch},
  user::{NewUser, User, UserPatch},
};

/// Abstraction over an equine registry backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Exact, case-sensitive lookup.
  fn get_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: i64,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Farms ─────────────────────────────────────────────────────────────

  fn get_farm(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Farm>, Self::Error>> + Send + '_;

  fn list_farms(&self) -> impl Future<Output = Result<Vec<Farm>, Self::Error>> + Send + '_;

  fn farms_by_owner(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<Farm>, Self::Error>> + Send + '_;

  fn create_farm(
    &self,
    input: NewFarm,
  ) -> impl Future<Output = Result<Farm, Self::Error>> + Send + '_;

  fn update_farm(
    &self,
    id: i64,
    patch: FarmPatch,
  ) -> impl Future<Output = Result<Option<Farm>, Self::Error>> + Send + '_;

  // ── Horses ────────────────────────────────────────────────────────────

  fn get_horse(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Horse>, Self::Error>> + Send + '_;

  fn list_horses(&self) -> impl Future<Output = Result<Vec<Horse>, Self::Error>> + Send + '_;

  fn horses_by_owner(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<Horse>, Self::Error>> + Send + '_;

  fn horses_by_farm(
    &self,
    farm_id: i64,
  ) -> impl Future<Output = Result<Vec<Horse>, Self::Error>> + Send + '_;

  fn create_horse(
    &self,
    input: NewHorse,
  ) -> impl Future<Output = Result<Horse, Self::Error>> + Send + '_;

  fn update_horse(
    &self,
    id: i64,
    patch: HorsePatch,
  ) -> impl Future<Output = Result<Option<Horse>, Self::Error>> + Send + '_;

  // ── Passports ─────────────────────────────────────────────────────────

  fn get_passport(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Passport>, Self::Error>> + Send + '_;

  fn list_passports(
    &self,
  ) -> impl Future<Output = Result<Vec<Passport>, Self::Error>> + Send + '_;

  fn passports_by_horse(
    &self,
    horse_id: i64,
  ) -> impl Future<Output = Result<Vec<Passport>, Self::Error>> + Send + '_;

  /// Passports whose `fechaValidez` falls inside `window`.
  fn passports_expiring_within(
    &self,
    window: ExpiryWindow,
  ) -> impl Future<Output = Result<Vec<Passport>, Self::Error>> + Send + '_;

  /// Passports expiring within the next 30 days.
  fn passports_expiring_soon(
    &self,
  ) -> impl Future<Output = Result<Vec<Passport>, Self::Error>> + Send + '_ {
    self.passports_expiring_within(ExpiryWindow::current())
  }

  fn create_passport(
    &self,
    input: NewPassport,
  ) -> impl Future<Output = Result<Passport, Self::Error>> + Send + '_;

  fn update_passport(
    &self,
    id: i64,
    patch: PassportPatch,
  ) -> impl Future<Output = Result<Option<Passport>, Self::Error>> + Send + '_;

  // ── Movement guides ───────────────────────────────────────────────────

  fn get_movement_guide(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<MovementGuide>, Self::Error>> + Send + '_;

  fn list_movement_guides(
    &self,
  ) -> impl Future<Output = Result<Vec<MovementGuide>, Self::Error>> + Send + '_;

  fn movement_guides_by_horse(
    &self,
    horse_id: i64,
  ) -> impl Future<Output = Result<Vec<MovementGuide>, Self::Error>> + Send + '_;

  fn create_movement_guide(
    &self,
    input: NewMovementGuide,
  ) -> impl Future<Output = Result<MovementGuide, Self::Error>> + Send + '_;

  fn update_movement_guide(
    &self,
    id: i64,
    patch: MovementGuidePatch,
  ) -> impl Future<Output = Result<Option<MovementGuide>, Self::Error>> + Send + '_;

  // ── Health certificates ───────────────────────────────────────────────

  fn get_health_certificate(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<HealthCertificate>, Self::Error>> + Send + '_;

  fn list_health_certificates(
    &self,
  ) -> impl Future<Output = Result<Vec<HealthCertificate>, Self::Error>> + Send + '_;

  fn health_certificates_by_horse(
    &self,
    horse_id: i64,
  ) -> impl Future<Output = Result<Vec<HealthCertificate>, Self::Error>> + Send + '_;

  /// Certificates whose `fechaValidez` falls inside `window`.
  fn health_certificates_expiring_within(
    &self,
    window: ExpiryWindow,
  ) -> impl Future<Output = Result<Vec<HealthCertificate>, Self::Error>> + Send + '_;

  /// Certificates expiring within the next 30 days.
  fn health_certificates_expiring_soon(
    &self,
  ) -> impl Future<Output = Result<Vec<HealthCertificate>, Self::Error>> + Send + '_ {
    self.health_certificates_expiring_within(ExpiryWindow::current())
  }

  fn create_health_certificate(
    &self,
    input: NewHealthCertificate,
  ) -> impl Future<Output = Result<HealthCertificate, Self::Error>> + Send + '_;

  fn update_health_certificate(
    &self,
    id: i64,
    patch: HealthCertificatePatch,
  ) -> impl Future<Output = Result<Option<HealthCertificate>, Self::Error>> + Send + '_;

  // ── EU transport documents ────────────────────────────────────────────

  fn get_eu_transport_document(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<EuTransportDocument>, Self::Error>> + Send + '_;

  fn list_eu_transport_documents(
    &self,
  ) -> impl Future<Output = Result<Vec<EuTransportDocument>, Self::Error>> + Send + '_;

  fn eu_transport_documents_by_horse(
    &self,
    horse_id: i64,
  ) -> impl Future<Output = Result<Vec<EuTransportDocument>, Self::Error>> + Send + '_;

  fn create_eu_transport_document(
    &self,
    input: NewEuTransportDocument,
  ) -> impl Future<Output = Result<EuTransportDocument, Self::Error>> + Send + '_;

  fn update_eu_transport_document(
    &self,
    id: i64,
    patch: EuTransportDocumentPatch,
  ) -> impl Future<Output = Result<Option<EuTransportDocument>, Self::Error>> + Send + '_;

  // ── Registry books ────────────────────────────────────────────────────

  fn get_registry_book(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<RegistryBook>, Self::Error>> + Send + '_;

  fn list_registry_books(
    &self,
  ) -> impl Future<Output = Result<Vec<RegistryBook>, Self::Error>> + Send + '_;

  fn registry_books_by_farm(
    &self,
    farm_id: i64,
  ) -> impl Future<Output = Result<Vec<RegistryBook>, Self::Error>> + Send + '_;

  fn create_registry_book(
    &self,
    input: NewRegistryBook,
  ) -> impl Future<Output = Result<RegistryBook, Self::Error>> + Send + '_;

  /// Also refreshes `fechaUltimaActualizacion`.
  fn update_registry_book(
    &self,
    id: i64,
    patch: RegistryBookPatch,
  ) -> impl Future<Output = Result<Option<RegistryBook>, Self::Error>> + Send + '_;

  // ── TME identification cards ──────────────────────────────────────────

  fn get_id_card(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<IdCard>, Self::Error>> + Send + '_;

  fn list_id_cards(&self) -> impl Future<Output = Result<Vec<IdCard>, Self::Error>> + Send + '_;

  fn id_cards_by_horse(
    &self,
    horse_id: i64,
  ) -> impl Future<Output = Result<Vec<IdCard>, Self::Error>> + Send + '_;

  fn create_id_card(
    &self,
    input: NewIdCard,
  ) -> impl Future<Output = Result<IdCard, Self::Error>> + Send + '_;

  /// Fails with [`crate::Error::ImmutableField`] if the patch changes the
  /// identity block.
  fn update_id_card(
    &self,
    id: i64,
    patch: IdCardPatch,
  ) -> impl Future<Output = Result<Option<IdCard>, Self::Error>> + Send + '_;

  fn add_id_card_description(
    &self,
    input: NewIdCardDescription,
  ) -> impl Future<Output = Result<IdCardDescription, Self::Error>> + Send + '_;

  fn id_card_descriptions(
    &self,
    card_id: i64,
  ) -> impl Future<Output = Result<Vec<IdCardDescription>, Self::Error>> + Send + '_;

  fn add_id_card_movement(
    &self,
    input: NewIdCardMovement,
  ) -> impl Future<Output = Result<IdCardMovement, Self::Error>> + Send + '_;

  fn id_card_movements(
    &self,
    card_id: i64,
  ) -> impl Future<Output = Result<Vec<IdCardMovement>, Self::Error>> + Send + '_;

  fn add_veterinary_validation(
    &self,
    input: NewVeterinaryValidation,
  ) -> impl Future<Output = Result<VeterinaryValidation, Self::Error>> + Send + '_;

  fn veterinary_validations(
    &self,
    card_id: i64,
  ) -> impl Future<Output = Result<Vec<VeterinaryValidation>, Self::Error>> + Send + '_;
}
