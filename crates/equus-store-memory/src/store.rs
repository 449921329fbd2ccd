//! [`MemoryStore`]: the in-process implementation of [`RegistryStore`].

use chrono::Utc;
use equus_core::{
  Error, Result,
  entity::{EntityKind, Insert, Patch, Reference},
  eu_transport::{EuTransportDocument, EuTransportDocumentPatch, NewEuTransportDocument},
  expiry::{Expiring, ExpiryWindow},
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
use tokio::sync::Mutex;

use crate::table::Table;

// ─── Store ───────────────────────────────────────────────────────────────────

/// Registry kept entirely in memory.
///
/// Each collection has its own lock and its own id counter. No operation
/// holds two locks at once: references are checked first, then the target
/// collection is locked for the write.
#[derive(Default)]
pub struct MemoryStore {
  users:                  Mutex<Table<User>>,
  farms:                  Mutex<Table<Farm>>,
  horses:                 Mutex<Table<Horse>>,
  passports:              Mutex<Table<Passport>>,
  movement_guides:        Mutex<Table<MovementGuide>>,
  health_certificates:    Mutex<Table<HealthCertificate>>,
  eu_transport_documents: Mutex<Table<EuTransportDocument>>,
  registry_books:         Mutex<Table<RegistryBook>>,
  id_cards:               Mutex<Table<IdCard>>,
  id_card_descriptions:   Mutex<Table<IdCardDescription>>,
  id_card_movements:      Mutex<Table<IdCardMovement>>,
  veterinary_validations: Mutex<Table<VeterinaryValidation>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  async fn exists(&self, reference: Reference) -> bool {
    let id = reference.id;
    match reference.kind {
      EntityKind::User => self.users.lock().await.contains(id),
      EntityKind::Farm => self.farms.lock().await.contains(id),
      EntityKind::Horse => self.horses.lock().await.contains(id),
      EntityKind::Passport => self.passports.lock().await.contains(id),
      EntityKind::MovementGuide => self.movement_guides.lock().await.contains(id),
      EntityKind::HealthCertificate => {
        self.health_certificates.lock().await.contains(id)
      }
      EntityKind::EuTransportDocument => {
        self.eu_transport_documents.lock().await.contains(id)
      }
      EntityKind::RegistryBook => self.registry_books.lock().await.contains(id),
      EntityKind::IdCard => self.id_cards.lock().await.contains(id),
      EntityKind::IdCardDescription => {
        self.id_card_descriptions.lock().await.contains(id)
      }
      EntityKind::IdCardMovement => self.id_card_movements.lock().await.contains(id),
      EntityKind::VeterinaryValidation => {
        self.veterinary_validations.lock().await.contains(id)
      }
    }
  }

  async fn check_references(&self, references: Vec<Reference>) -> Result<()> {
    for reference in references {
      if !self.exists(reference).await {
        return Err(Error::MissingReference {
          entity: reference.kind,
          id:     reference.id,
        });
      }
    }
    Ok(())
  }

  async fn create<I: Insert>(
    &self,
    table: &Mutex<Table<I::Record>>,
    input: I,
  ) -> Result<I::Record> {
    self.check_references(input.references()).await?;
    table.lock().await.insert(input, Utc::now())
  }

  async fn update<P: Patch>(
    &self,
    table: &Mutex<Table<P::Record>>,
    id: i64,
    patch: P,
  ) -> Result<Option<P::Record>> {
    if !table.lock().await.contains(id) {
      return Ok(None);
    }
    self.check_references(patch.references()).await?;
    table.lock().await.update(id, patch, Utc::now())
  }
}

fn expiring<T: Expiring>(window: ExpiryWindow) -> impl Fn(&T) -> bool {
  move |doc: &T| window.contains(doc.fecha_validez())
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for MemoryStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    Ok(self.users.lock().await.get(id))
  }

  async fn get_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    let users = self.users.lock().await;
    Ok(users.select(|u| u.email == email).into_iter().next())
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    self.create(&self.users, input).await
  }

  async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
    self.update(&self.users, id, patch).await
  }

  // ── Farms ─────────────────────────────────────────────────────────────

  async fn get_farm(&self, id: i64) -> Result<Option<Farm>> {
    Ok(self.farms.lock().await.get(id))
  }

  async fn list_farms(&self) -> Result<Vec<Farm>> { Ok(self.farms.lock().await.all()) }

  async fn farms_by_owner(&self, user_id: i64) -> Result<Vec<Farm>> {
    Ok(
      self
        .farms
        .lock()
        .await
        .select(|f| f.id_propietario == Some(user_id)),
    )
  }

  async fn create_farm(&self, input: NewFarm) -> Result<Farm> {
    self.create(&self.farms, input).await
  }

  async fn update_farm(&self, id: i64, patch: FarmPatch) -> Result<Option<Farm>> {
    self.update(&self.farms, id, patch).await
  }

  // ── Horses ────────────────────────────────────────────────────────────

  async fn get_horse(&self, id: i64) -> Result<Option<Horse>> {
    Ok(self.horses.lock().await.get(id))
  }

  async fn list_horses(&self) -> Result<Vec<Horse>> { Ok(self.horses.lock().await.all()) }

  async fn horses_by_owner(&self, user_id: i64) -> Result<Vec<Horse>> {
    Ok(
      self
        .horses
        .lock()
        .await
        .select(|h| h.id_propietario == Some(user_id)),
    )
  }

  async fn horses_by_farm(&self, farm_id: i64) -> Result<Vec<Horse>> {
    Ok(
      self
        .horses
        .lock()
        .await
        .select(|h| h.id_explotacion == Some(farm_id)),
    )
  }

  async fn create_horse(&self, input: NewHorse) -> Result<Horse> {
    self.create(&self.horses, input).await
  }

  async fn update_horse(&self, id: i64, patch: HorsePatch) -> Result<Option<Horse>> {
    self.update(&self.horses, id, patch).await
  }

  // ── Passports ─────────────────────────────────────────────────────────

  async fn get_passport(&self, id: i64) -> Result<Option<Passport>> {
    Ok(self.passports.lock().await.get(id))
  }

  async fn list_passports(&self) -> Result<Vec<Passport>> {
    Ok(self.passports.lock().await.all())
  }

  async fn passports_by_horse(&self, horse_id: i64) -> Result<Vec<Passport>> {
    Ok(self.passports.lock().await.select(|p| p.id_caballo == horse_id))
  }

  async fn passports_expiring_within(&self, window: ExpiryWindow) -> Result<Vec<Passport>> {
    Ok(self.passports.lock().await.select(expiring(window)))
  }

  async fn create_passport(&self, input: NewPassport) -> Result<Passport> {
    self.create(&self.passports, input).await
  }

  async fn update_passport(
    &self,
    id: i64,
    patch: PassportPatch,
  ) -> Result<Option<Passport>> {
    self.update(&self.passports, id, patch).await
  }

  // ── Movement guides ───────────────────────────────────────────────────

  async fn get_movement_guide(&self, id: i64) -> Result<Option<MovementGuide>> {
    Ok(self.movement_guides.lock().await.get(id))
  }

  async fn list_movement_guides(&self) -> Result<Vec<MovementGuide>> {
    Ok(self.movement_guides.lock().await.all())
  }

  async fn movement_guides_by_horse(&self, horse_id: i64) -> Result<Vec<MovementGuide>> {
    Ok(
      self
        .movement_guides
        .lock()
        .await
        .select(|g| g.id_caballo == horse_id),
    )
  }

  async fn create_movement_guide(&self, input: NewMovementGuide) -> Result<MovementGuide> {
    self.create(&self.movement_guides, input).await
  }

  async fn update_movement_guide(
    &self,
    id: i64,
    patch: MovementGuidePatch,
  ) -> Result<Option<MovementGuide>> {
    self.update(&self.movement_guides, id, patch).await
  }

  // ── Health certificates ───────────────────────────────────────────────

  async fn get_health_certificate(&self, id: i64) -> Result<Option<HealthCertificate>> {
    Ok(self.health_certificates.lock().await.get(id))
  }

  async fn list_health_certificates(&self) -> Result<Vec<HealthCertificate>> {
    Ok(self.health_certificates.lock().await.all())
  }

  async fn health_certificates_by_horse(
    &self,
    horse_id: i64,
  ) -> Result<Vec<HealthCertificate>> {
    Ok(
      self
        .health_certificates
        .lock()
        .await
        .select(|c| c.id_caballo == horse_id),
    )
  }

  async fn health_certificates_expiring_within(
    &self,
    window: ExpiryWindow,
  ) -> Result<Vec<HealthCertificate>> {
    Ok(self.health_certificates.lock().await.select(expiring(window)))
  }

  async fn create_health_certificate(
    &self,
    input: NewHealthCertificate,
  ) -> Result<HealthCertificate> {
    self.create(&self.health_certificates, input).await
  }

  async fn update_health_certificate(
    &self,
    id: i64,
    patch: HealthCertificatePatch,
  ) -> Result<Option<HealthCertificate>> {
    self.update(&self.health_certificates, id, patch).await
  }

  // ── EU transport documents ────────────────────────────────────────────

  async fn get_eu_transport_document(&self, id: i64) -> Result<Option<EuTransportDocument>> {
    Ok(self.eu_transport_documents.lock().await.get(id))
  }

  async fn list_eu_transport_documents(&self) -> Result<Vec<EuTransportDocument>> {
    Ok(self.eu_transport_documents.lock().await.all())
  }

  async fn eu_transport_documents_by_horse(
    &self,
    horse_id: i64,
  ) -> Result<Vec<EuTransportDocument>> {
    Ok(
      self
        .eu_transport_documents
        .lock()
        .await
        .select(|d| d.id_caballo == horse_id),
    )
  }

  async fn create_eu_transport_document(
    &self,
    input: NewEuTransportDocument,
  ) -> Result<EuTransportDocument> {
    self.create(&self.eu_transport_documents, input).await
  }

  async fn update_eu_transport_document(
    &self,
    id: i64,
    patch: EuTransportDocumentPatch,
  ) -> Result<Option<EuTransportDocument>> {
    self.update(&self.eu_transport_documents, id, patch).await
  }

  // ── Registry books ────────────────────────────────────────────────────

  async fn get_registry_book(&self, id: i64) -> Result<Option<RegistryBook>> {
    Ok(self.registry_books.lock().await.get(id))
  }

  async fn list_registry_books(&self) -> Result<Vec<RegistryBook>> {
    Ok(self.registry_books.lock().await.all())
  }

  async fn registry_books_by_farm(&self, farm_id: i64) -> Result<Vec<RegistryBook>> {
    Ok(
      self
        .registry_books
        .lock()
        .await
        .select(|b| b.id_explotacion == farm_id),
    )
  }

  async fn create_registry_book(&self, input: NewRegistryBook) -> Result<RegistryBook> {
    self.create(&self.registry_books, input).await
  }

  async fn update_registry_book(
    &self,
    id: i64,
    patch: RegistryBookPatch,
  ) -> Result<Option<RegistryBook>> {
    self.update(&self.registry_books, id, patch).await
  }

  // ── TME identification cards ──────────────────────────────────────────

  async fn get_id_card(&self, id: i64) -> Result<Option<IdCard>> {
    Ok(self.id_cards.lock().await.get(id))
  }

  async fn list_id_cards(&self) -> Result<Vec<IdCard>> { Ok(self.id_cards.lock().await.all()) }

  async fn id_cards_by_horse(&self, horse_id: i64) -> Result<Vec<IdCard>> {
    Ok(self.id_cards.lock().await.select(|c| c.id_caballo == horse_id))
  }

  async fn create_id_card(&self, input: NewIdCard) -> Result<IdCard> {
    self.create(&self.id_cards, input).await
  }

  async fn update_id_card(&self, id: i64, patch: IdCardPatch) -> Result<Option<IdCard>> {
    self.update(&self.id_cards, id, patch).await
  }

  async fn add_id_card_description(
    &self,
    input: NewIdCardDescription,
  ) -> Result<IdCardDescription> {
    self.create(&self.id_card_descriptions, input).await
  }

  async fn id_card_descriptions(&self, card_id: i64) -> Result<Vec<IdCardDescription>> {
    Ok(
      self
        .id_card_descriptions
        .lock()
        .await
        .select(|d| d.id_tarjeta == card_id),
    )
  }

  async fn add_id_card_movement(&self, input: NewIdCardMovement) -> Result<IdCardMovement> {
    self.create(&self.id_card_movements, input).await
  }

  async fn id_card_movements(&self, card_id: i64) -> Result<Vec<IdCardMovement>> {
    Ok(
      self
        .id_card_movements
        .lock()
        .await
        .select(|m| m.id_tarjeta == card_id),
    )
  }

  async fn add_veterinary_validation(
    &self,
    input: NewVeterinaryValidation,
  ) -> Result<VeterinaryValidation> {
    self.create(&self.veterinary_validations, input).await
  }

  async fn veterinary_validations(&self, card_id: i64) -> Result<Vec<VeterinaryValidation>> {
    Ok(
      self
        .veterinary_validations
        .lock()
        .await
        .select(|v| v.id_tarjeta == card_id),
    )
  }
}
