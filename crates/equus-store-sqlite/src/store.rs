//! [`SqliteStore`]: the SQLite implementation of [`RegistryStore`].

use std::path::Path;

use equus_core::{
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
  store::RegistryStore,
  user::{NewUser, User, UserPatch},
};
use rusqlite::Connection;

use crate::{
  Result,
  encode::{SqlRow, encode_date},
  query,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Equus registry backed by a single SQLite file.
///
/// Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, keeping domain errors intact.
  async fn call<R, F>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&Connection) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  async fn get<T: SqlRow>(&self, id: i64) -> Result<Option<T>> {
    self.call(move |conn| query::fetch_one(conn, id)).await
  }

  async fn all<T: SqlRow>(&self) -> Result<Vec<T>> {
    self.call(query::fetch_all::<T>).await
  }

  /// Rows whose integer `column` equals `value`.
  async fn by<T: SqlRow>(&self, column: &'static str, value: i64) -> Result<Vec<T>> {
    self
      .call(move |conn| {
        query::fetch_where(conn, &format!("{column} = ?1"), vec![value.into()])
      })
      .await
  }

  async fn expiring<T: SqlRow>(&self, window: ExpiryWindow) -> Result<Vec<T>> {
    let bounds = vec![encode_date(window.from), encode_date(window.until)];
    self
      .call(move |conn| query::fetch_where(conn, "fecha_validez BETWEEN ?1 AND ?2", bounds))
      .await
  }
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn get_user(&self, id: i64) -> Result<Option<User>> { self.get(id).await }

  async fn get_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    let email = email.to_owned();
    let users: Vec<User> = self
      .call(move |conn| query::fetch_where(conn, "email = ?1", vec![email.into()]))
      .await?;
    Ok(users.into_iter().next())
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── Farms ─────────────────────────────────────────────────────────────

  async fn get_farm(&self, id: i64) -> Result<Option<Farm>> { self.get(id).await }

  async fn list_farms(&self) -> Result<Vec<Farm>> { self.all().await }

  async fn farms_by_owner(&self, user_id: i64) -> Result<Vec<Farm>> {
    self.by("id_propietario", user_id).await
  }

  async fn create_farm(&self, input: NewFarm) -> Result<Farm> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_farm(&self, id: i64, patch: FarmPatch) -> Result<Option<Farm>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── Horses ────────────────────────────────────────────────────────────

  async fn get_horse(&self, id: i64) -> Result<Option<Horse>> { self.get(id).await }

  async fn list_horses(&self) -> Result<Vec<Horse>> { self.all().await }

  async fn horses_by_owner(&self, user_id: i64) -> Result<Vec<Horse>> {
    self.by("id_propietario", user_id).await
  }

  async fn horses_by_farm(&self, farm_id: i64) -> Result<Vec<Horse>> {
    self.by("id_explotacion", farm_id).await
  }

  async fn create_horse(&self, input: NewHorse) -> Result<Horse> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_horse(&self, id: i64, patch: HorsePatch) -> Result<Option<Horse>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── Passports ─────────────────────────────────────────────────────────

  async fn get_passport(&self, id: i64) -> Result<Option<Passport>> { self.get(id).await }

  async fn list_passports(&self) -> Result<Vec<Passport>> { self.all().await }

  async fn passports_by_horse(&self, horse_id: i64) -> Result<Vec<Passport>> {
    self.by("id_caballo", horse_id).await
  }

  async fn passports_expiring_within(&self, window: ExpiryWindow) -> Result<Vec<Passport>> {
    self.expiring(window).await
  }

  async fn create_passport(&self, input: NewPassport) -> Result<Passport> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_passport(
    &self,
    id: i64,
    patch: PassportPatch,
  ) -> Result<Option<Passport>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── Movement guides ───────────────────────────────────────────────────

  async fn get_movement_guide(&self, id: i64) -> Result<Option<MovementGuide>> {
    self.get(id).await
  }

  async fn list_movement_guides(&self) -> Result<Vec<MovementGuide>> { self.all().await }

  async fn movement_guides_by_horse(&self, horse_id: i64) -> Result<Vec<MovementGuide>> {
    self.by("id_caballo", horse_id).await
  }

  async fn create_movement_guide(&self, input: NewMovementGuide) -> Result<MovementGuide> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_movement_guide(
    &self,
    id: i64,
    patch: MovementGuidePatch,
  ) -> Result<Option<MovementGuide>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── Health certificates ───────────────────────────────────────────────

  async fn get_health_certificate(&self, id: i64) -> Result<Option<HealthCertificate>> {
    self.get(id).await
  }

  async fn list_health_certificates(&self) -> Result<Vec<HealthCertificate>> {
    self.all().await
  }

  async fn health_certificates_by_horse(
    &self,
    horse_id: i64,
  ) -> Result<Vec<HealthCertificate>> {
    self.by("id_caballo", horse_id).await
  }

  async fn health_certificates_expiring_within(
    &self,
    window: ExpiryWindow,
  ) -> Result<Vec<HealthCertificate>> {
    self.expiring(window).await
  }

  async fn create_health_certificate(
    &self,
    input: NewHealthCertificate,
  ) -> Result<HealthCertificate> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_health_certificate(
    &self,
    id: i64,
    patch: HealthCertificatePatch,
  ) -> Result<Option<HealthCertificate>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── EU transport documents ────────────────────────────────────────────

  async fn get_eu_transport_document(&self, id: i64) -> Result<Option<EuTransportDocument>> {
    self.get(id).await
  }

  async fn list_eu_transport_documents(&self) -> Result<Vec<EuTransportDocument>> {
    self.all().await
  }

  async fn eu_transport_documents_by_horse(
    &self,
    horse_id: i64,
  ) -> Result<Vec<EuTransportDocument>> {
    self.by("id_caballo", horse_id).await
  }

  async fn create_eu_transport_document(
    &self,
    input: NewEuTransportDocument,
  ) -> Result<EuTransportDocument> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_eu_transport_document(
    &self,
    id: i64,
    patch: EuTransportDocumentPatch,
  ) -> Result<Option<EuTransportDocument>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── Registry books ────────────────────────────────────────────────────

  async fn get_registry_book(&self, id: i64) -> Result<Option<RegistryBook>> {
    self.get(id).await
  }

  async fn list_registry_books(&self) -> Result<Vec<RegistryBook>> { self.all().await }

  async fn registry_books_by_farm(&self, farm_id: i64) -> Result<Vec<RegistryBook>> {
    self.by("id_explotacion", farm_id).await
  }

  async fn create_registry_book(&self, input: NewRegistryBook) -> Result<RegistryBook> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_registry_book(
    &self,
    id: i64,
    patch: RegistryBookPatch,
  ) -> Result<Option<RegistryBook>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  // ── TME identification cards ──────────────────────────────────────────

  async fn get_id_card(&self, id: i64) -> Result<Option<IdCard>> { self.get(id).await }

  async fn list_id_cards(&self) -> Result<Vec<IdCard>> { self.all().await }

  async fn id_cards_by_horse(&self, horse_id: i64) -> Result<Vec<IdCard>> {
    self.by("id_caballo", horse_id).await
  }

  async fn create_id_card(&self, input: NewIdCard) -> Result<IdCard> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn update_id_card(&self, id: i64, patch: IdCardPatch) -> Result<Option<IdCard>> {
    self.call(move |conn| query::update(conn, id, patch)).await
  }

  async fn add_id_card_description(
    &self,
    input: NewIdCardDescription,
  ) -> Result<IdCardDescription> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn id_card_descriptions(&self, card_id: i64) -> Result<Vec<IdCardDescription>> {
    self.by("id_tarjeta", card_id).await
  }

  async fn add_id_card_movement(&self, input: NewIdCardMovement) -> Result<IdCardMovement> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn id_card_movements(&self, card_id: i64) -> Result<Vec<IdCardMovement>> {
    self.by("id_tarjeta", card_id).await
  }

  async fn add_veterinary_validation(
    &self,
    input: NewVeterinaryValidation,
  ) -> Result<VeterinaryValidation> {
    self.call(move |conn| query::insert(conn, input)).await
  }

  async fn veterinary_validations(&self, card_id: i64) -> Result<Vec<VeterinaryValidation>> {
    self.by("id_tarjeta", card_id).await
  }
}
