//! Behavioural checks every [`RegistryStore`] backend must pass.
//!
//! Each check is a plain async function over any store. Backend crates run
//! the whole set from their test modules with [`conformance_suite!`]:
//!
//! ```ignore
//! async fn store() -> MemoryStore { MemoryStore::new() }
//!
//! equus_core::conformance_suite!(store);
//! ```
//!
//! The fixture builders are public so the HTTP tests can reuse them.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::{
  Error,
  dashboard::{DashboardStats, dashboard_stats},
  entity::EntityKind,
  eu_transport::{EuTransportDocumentPatch, NewEuTransportDocument},
  expiry::ExpiryWindow,
  farm::{FarmPatch, NewFarm},
  health_certificate::{ExamOutcome, HealthCertificatePatch, NewHealthCertificate},
  horse::{HorsePatch, NewHorse, Sex},
  id_card::{
    IdCardPatch, IdCardStatus, NewIdCard, NewIdCardDescription,
    NewIdCardMovement, NewVeterinaryValidation, DEFAULT_VALIDITY_LEGEND,
  },
  movement_guide::{GuideStatus, MovementGuidePatch, NewMovementGuide},
  passport::{NewPassport, PassportPatch, PassportStatus},
  registry_book::{NewRegistryBook, RegistryBookPatch},
  store::RegistryStore,
  user::{NewUser, Role, UserPatch},
};

/// Expand to one `#[tokio::test]` per conformance check, each opening a
/// fresh store through the async constructor `$open`.
#[macro_export]
macro_rules! conformance_suite {
  ($open:path) => {
    $crate::conformance_suite!(
      $open;
      user_email_is_unique,
      user_lookup_is_exact,
      login_refreshes_last_access,
      farm_filters_by_owner,
      farm_rega_code_is_unique,
      horse_create_echoes_identifiers,
      horse_identifiers_are_unique,
      horse_filters_by_owner_and_farm,
      horse_patch_merges_present_fields,
      nullable_fields_can_be_cleared,
      missing_references_are_rejected,
      update_of_missing_id_returns_none,
      lists_are_ordered_by_id,
      passport_expiry_window,
      passport_leaves_window_after_patch,
      health_certificate_expiry_window,
      movement_guide_lifecycle,
      eu_transport_document_links,
      registry_book_refreshes_timestamp,
      id_card_defaults_and_lookup,
      id_card_identity_is_immutable,
      id_card_child_records,
      dashboard_is_zero_for_empty_user,
      dashboard_counts_user_documents,
    );
  };
  ($open:path; $($check:ident),* $(,)?) => {
    $(
      #[tokio::test]
      async fn $check() {
        let store = $open().await;
        $crate::conformance::$check(&store).await;
      }
    )*
  };
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// Today (UTC) shifted by `days`.
pub fn days_from_today(days: i64) -> NaiveDate {
  (Utc::now() + TimeDelta::days(days)).date_naive()
}

/// A well-formed 15-character UELN.
pub fn ueln(n: u32) -> String { format!("724{n:012}") }

pub fn microchip(n: u32) -> String { format!("941000{n:09}") }

pub fn new_user(email: &str) -> NewUser {
  NewUser {
    nombre:                  "Lucía".into(),
    apellidos:               "Martín Gómez".into(),
    email:                   email.into(),
    password_hash:           "$argon2id$placeholder".into(),
    tipo_usuario:            Role::Propietario,
    num_colegiado:           None,
    num_licencia_transporte: None,
    id_autoridad:            None,
    activo:                  true,
  }
}

pub fn new_farm(rega: &str, owner: Option<i64>) -> NewFarm {
  NewFarm {
    codigo_rega:      rega.into(),
    nombre:           "Yeguada El Olivar".into(),
    direccion:        "Camino del Río 4".into(),
    municipio:        "Jerez de la Frontera".into(),
    provincia:        "Cádiz".into(),
    codigo_postal:    "11401".into(),
    telefono:         "956000000".into(),
    email:            None,
    tipo_explotacion: "cria".into(),
    capacidad_maxima: 40,
    id_propietario:   owner,
    activa:           true,
  }
}

pub fn new_horse(n: u32, owner: Option<i64>, farm: Option<i64>) -> NewHorse {
  NewHorse {
    ueln:             ueln(n),
    microchip:        microchip(n),
    nombre:           format!("Caballo {n}"),
    fecha_nacimiento: date(2018, 4, 12),
    sexo:             Sex::Macho,
    raza:             "Pura Raza Española".into(),
    capa:             "Torda".into(),
    pais_origen:      "España".into(),
    id_explotacion:   farm,
    id_propietario:   owner,
    activo:           true,
  }
}

pub fn new_passport(number: &str, horse: i64, validity: Option<NaiveDate>) -> NewPassport {
  NewPassport {
    id_caballo:        horse,
    numero_pasaporte:  number.into(),
    fecha_emision:     date(2020, 1, 15),
    autoridad_emisora: "ANCCE".into(),
    fecha_validez:     validity,
    url_documento:     None,
    estado:            PassportStatus::Vigente,
    id_emisor:         None,
  }
}

pub fn new_health_certificate(
  number: &str,
  horse: i64,
  validity: NaiveDate,
) -> NewHealthCertificate {
  NewHealthCertificate {
    id_caballo:         horse,
    numero_certificado: number.into(),
    fecha_emision:      date(2025, 11, 3),
    fecha_validez:      validity,
    id_veterinario:     None,
    resultado:          ExamOutcome::Apto,
    observaciones:      None,
    vacunas_aplicadas:  Some("gripe equina".into()),
    pruebas_realizadas: None,
    url_documento:      None,
  }
}

pub fn new_movement_guide(number: &str, horse: i64) -> NewMovementGuide {
  NewMovementGuide {
    id_caballo:          horse,
    numero_guia:         number.into(),
    fecha_emision:       date(2026, 2, 1),
    explotacion_origen:  None,
    explotacion_destino: None,
    fecha_salida:        Utc::now(),
    fecha_llegada:       None,
    motivo_traslado:     "concurso".into(),
    medio_transporte:    "camión".into(),
    matricula_vehiculo:  Some("1234ABC".into()),
    id_transportista:    None,
    estado:              GuideStatus::Emitida,
    url_documento:       None,
    id_emisor:           None,
  }
}

pub fn new_eu_transport_document(number: &str, horse: i64) -> NewEuTransportDocument {
  NewEuTransportDocument {
    id_caballo:               horse,
    numero_documento:         number.into(),
    fecha_emision:            date(2026, 2, 1),
    pais_origen:              "España".into(),
    pais_destino:             "Francia".into(),
    punto_control_fronterizo: Some("La Jonquera".into()),
    id_certificado_salud:     None,
    id_guia_movimiento:       None,
    url_documento:            None,
    id_emisor:                None,
  }
}

pub fn new_registry_book(farm: i64) -> NewRegistryBook {
  NewRegistryBook {
    id_explotacion: farm,
    fecha_apertura: date(2024, 1, 1),
    url_documento:  None,
    observaciones:  None,
    id_responsable: None,
  }
}

pub fn new_id_card(n: u32, horse: i64) -> NewIdCard {
  NewIdCard {
    id_caballo:                         horse,
    ueln:                               ueln(n),
    codigo_transpondedor:               microchip(n),
    nombre_equido:                      format!("Caballo {n}"),
    sexo:                               Sex::Macho,
    fecha_nacimiento:                   date(2018, 4, 12),
    capa:                               "Torda".into(),
    fotografia_url:                     None,
    codigo_barras_ueln:                 None,
    numero_tarjeta:                     format!("TME-{n:06}"),
    fecha_emision:                      date(2026, 1, 10),
    autoridad_emisora:                  "Junta de Andalucía".into(),
    fecha_validez:                      None,
    tiene_escudo_espana:                true,
    tiene_elementos_seguridad:          true,
    leyenda_validez:                    DEFAULT_VALIDITY_LEGEND.into(),
    numero_identificacion_electronico:  None,
    fotografia_reverso_url:             None,
    impresion_codificada_tme:           None,
    raza:                               Some("Pura Raza Española".into()),
    pais_nacimiento:                    Some("España".into()),
    criador:                            None,
    propietario:                        None,
    observaciones:                      None,
    estado:                             IdCardStatus::Activa,
    motivo_estado:                      None,
    id_emisor:                          None,
    valida_movimientos_espana:          true,
    valida_movimientos_ue:              false,
    valida_movimientos_internacionales: false,
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn domain_error<E: std::error::Error + 'static>(err: &E) -> &Error {
  Error::find(err).unwrap_or_else(|| panic!("expected a domain error, got {err}"))
}

fn assert_duplicate<T: std::fmt::Debug, E: std::error::Error + 'static>(
  result: Result<T, E>,
  entity: EntityKind,
  field: &str,
) {
  let err = result.expect_err("duplicate insert must fail");
  match domain_error(&err) {
    Error::Duplicate { entity: e, field: f } => {
      assert_eq!(*e, entity);
      assert_eq!(f, field);
    }
    other => panic!("expected duplicate {entity}.{field}, got {other}"),
  }
}

fn assert_missing<T: std::fmt::Debug, E: std::error::Error + 'static>(
  result: Result<T, E>,
  entity: EntityKind,
  id: i64,
) {
  let err = result.expect_err("dangling reference must fail");
  match domain_error(&err) {
    Error::MissingReference { entity: e, id: i } => {
      assert_eq!((*e, *i), (entity, id));
    }
    other => panic!("expected missing {entity} {id}, got {other}"),
  }
}

fn assert_recent(at: DateTime<Utc>) {
  let drift = (Utc::now() - at).num_seconds().abs();
  assert!(drift < 5, "timestamp {at} is {drift}s away from now");
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub async fn user_email_is_unique<S: RegistryStore>(store: &S) {
  let user = store.create_user(new_user("ana@example.es")).await.unwrap();
  assert!(user.id > 0);
  assert_recent(user.fecha_registro);
  assert!(user.ultimo_acceso.is_none());

  assert_duplicate(
    store.create_user(new_user("ana@example.es")).await,
    EntityKind::User,
    "email",
  );
}

pub async fn user_lookup_is_exact<S: RegistryStore>(store: &S) {
  let user = store.create_user(new_user("pablo@example.es")).await.unwrap();

  let found = store.get_user_by_email("pablo@example.es").await.unwrap();
  assert_eq!(found.map(|u| u.id), Some(user.id));

  assert!(store.get_user_by_email("Pablo@example.es").await.unwrap().is_none());
  assert!(store.get_user(user.id + 100).await.unwrap().is_none());
}

pub async fn login_refreshes_last_access<S: RegistryStore>(store: &S) {
  let user = store.create_user(new_user("eva@example.es")).await.unwrap();
  let at = Utc::now();

  let updated = store
    .update_user(user.id, UserPatch::last_access(at))
    .await
    .unwrap()
    .expect("user exists");
  assert!(updated.ultimo_acceso.is_some());
  assert_eq!(updated.email, user.email);
  assert_eq!(updated.password_hash, user.password_hash);

  let reread = store.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(reread.ultimo_acceso, updated.ultimo_acceso);
}

// ─── Farms ───────────────────────────────────────────────────────────────────

pub async fn farm_filters_by_owner<S: RegistryStore>(store: &S) {
  let a = store.create_user(new_user("a@example.es")).await.unwrap();
  let b = store.create_user(new_user("b@example.es")).await.unwrap();

  store.create_farm(new_farm("ES110010000001", Some(a.id))).await.unwrap();
  store.create_farm(new_farm("ES110010000002", Some(b.id))).await.unwrap();
  store.create_farm(new_farm("ES110010000003", Some(a.id))).await.unwrap();

  let owned = store.farms_by_owner(a.id).await.unwrap();
  assert_eq!(owned.len(), 2);
  assert!(owned.iter().all(|f| f.id_propietario == Some(a.id)));
  assert_eq!(store.list_farms().await.unwrap().len(), 3);
}

pub async fn farm_rega_code_is_unique<S: RegistryStore>(store: &S) {
  let farm = store.create_farm(new_farm("ES410910000001", None)).await.unwrap();
  assert!(farm.activa);
  assert_recent(farm.fecha_registro);

  assert_duplicate(
    store.create_farm(new_farm("ES410910000001", None)).await,
    EntityKind::Farm,
    "codigo_rega",
  );

  // Renaming onto an existing code is caught as well.
  let other = store.create_farm(new_farm("ES410910000002", None)).await.unwrap();
  let patch = FarmPatch {
    codigo_rega: Some("ES410910000001".into()),
    ..FarmPatch::default()
  };
  assert_duplicate(
    store.update_farm(other.id, patch).await,
    EntityKind::Farm,
    "codigo_rega",
  );
}

// ─── Horses ──────────────────────────────────────────────────────────────────

pub async fn horse_create_echoes_identifiers<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  assert!(horse.id > 0);
  assert_eq!(horse.ueln, ueln(1));
  assert_eq!(horse.microchip, microchip(1));
  assert_eq!(horse.sexo, Sex::Macho);
  assert_recent(horse.fecha_registro);

  let fetched = store.get_horse(horse.id).await.unwrap().expect("horse exists");
  assert_eq!(fetched.ueln, horse.ueln);
  assert_eq!(fetched.fecha_nacimiento, horse.fecha_nacimiento);
  assert_eq!(fetched.fecha_registro, horse.fecha_registro);
}

pub async fn horse_identifiers_are_unique<S: RegistryStore>(store: &S) {
  store.create_horse(new_horse(1, None, None)).await.unwrap();

  let mut same_ueln = new_horse(2, None, None);
  same_ueln.ueln = ueln(1);
  assert_duplicate(
    store.create_horse(same_ueln).await,
    EntityKind::Horse,
    "ueln",
  );

  let mut same_chip = new_horse(3, None, None);
  same_chip.microchip = microchip(1);
  assert_duplicate(
    store.create_horse(same_chip).await,
    EntityKind::Horse,
    "microchip",
  );

  assert_eq!(store.list_horses().await.unwrap().len(), 1);
}

pub async fn horse_filters_by_owner_and_farm<S: RegistryStore>(store: &S) {
  let owner = store.create_user(new_user("owner@example.es")).await.unwrap();
  let farm = store.create_farm(new_farm("ES290670000001", None)).await.unwrap();

  store.create_horse(new_horse(1, Some(owner.id), Some(farm.id))).await.unwrap();
  store.create_horse(new_horse(2, Some(owner.id), None)).await.unwrap();
  store.create_horse(new_horse(3, None, Some(farm.id))).await.unwrap();
  store.create_horse(new_horse(4, None, None)).await.unwrap();

  assert_eq!(store.horses_by_owner(owner.id).await.unwrap().len(), 2);
  assert_eq!(store.horses_by_farm(farm.id).await.unwrap().len(), 2);
  assert!(store.horses_by_owner(owner.id + 50).await.unwrap().is_empty());
}

pub async fn horse_patch_merges_present_fields<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();

  let patch = HorsePatch {
    nombre: Some("Relámpago".into()),
    activo: Some(false),
    ..HorsePatch::default()
  };
  let updated = store.update_horse(horse.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.nombre, "Relámpago");
  assert!(!updated.activo);
  assert_eq!(updated.ueln, horse.ueln);
  assert_eq!(updated.raza, horse.raza);
  assert_eq!(updated.fecha_registro, horse.fecha_registro);

  let reread = store.get_horse(horse.id).await.unwrap().unwrap();
  assert_eq!(reread.nombre, "Relámpago");
}

pub async fn nullable_fields_can_be_cleared<S: RegistryStore>(store: &S) {
  let farm = store.create_farm(new_farm("ES110010000001", None)).await.unwrap();
  let horse = store.create_horse(new_horse(1, None, Some(farm.id))).await.unwrap();

  let patch = HorsePatch { id_explotacion: Some(None), ..HorsePatch::default() };
  let updated = store.update_horse(horse.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.id_explotacion, None);
  assert_eq!(updated.nombre, horse.nombre);
  assert!(store.horses_by_farm(farm.id).await.unwrap().is_empty());

  let passport = store
    .create_passport(new_passport("P-1", horse.id, Some(days_from_today(10))))
    .await
    .unwrap();
  let patch = PassportPatch { fecha_validez: Some(None), ..PassportPatch::default() };
  let updated = store.update_passport(passport.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.fecha_validez, None);
  assert!(store.passports_expiring_soon().await.unwrap().is_empty());

  let reread = store.get_passport(passport.id).await.unwrap().unwrap();
  assert_eq!(reread.fecha_validez, None);
}

// ─── Shared invariants ───────────────────────────────────────────────────────

pub async fn missing_references_are_rejected<S: RegistryStore>(store: &S) {
  assert_missing(
    store.create_horse(new_horse(1, None, Some(999))).await,
    EntityKind::Farm,
    999,
  );
  assert_missing(
    store.create_horse(new_horse(1, Some(998), None)).await,
    EntityKind::User,
    998,
  );
  assert_missing(
    store.create_passport(new_passport("P-1", 997, None)).await,
    EntityKind::Horse,
    997,
  );
  assert_missing(
    store.create_registry_book(new_registry_book(996)).await,
    EntityKind::Farm,
    996,
  );

  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  let patch = HorsePatch { id_explotacion: Some(Some(995)), ..HorsePatch::default() };
  assert_missing(store.update_horse(horse.id, patch).await, EntityKind::Farm, 995);

  let unchanged = store.get_horse(horse.id).await.unwrap().unwrap();
  assert_eq!(unchanged.id_explotacion, None);
}

pub async fn update_of_missing_id_returns_none<S: RegistryStore>(store: &S) {
  assert!(store.update_user(42, UserPatch::default()).await.unwrap().is_none());
  assert!(store.update_farm(42, FarmPatch::default()).await.unwrap().is_none());
  assert!(store.update_horse(42, HorsePatch::default()).await.unwrap().is_none());
  assert!(
    store
      .update_passport(42, PassportPatch::default())
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    store
      .update_movement_guide(42, MovementGuidePatch::default())
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    store
      .update_health_certificate(42, HealthCertificatePatch::default())
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    store
      .update_eu_transport_document(42, EuTransportDocumentPatch::default())
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    store
      .update_registry_book(42, RegistryBookPatch::default())
      .await
      .unwrap()
      .is_none()
  );
  assert!(store.update_id_card(42, IdCardPatch::default()).await.unwrap().is_none());
}

pub async fn lists_are_ordered_by_id<S: RegistryStore>(store: &S) {
  for n in 1..=4 {
    store.create_horse(new_horse(n, None, None)).await.unwrap();
  }
  let ids: Vec<i64> = store
    .list_horses()
    .await
    .unwrap()
    .iter()
    .map(|h| h.id)
    .collect();
  let mut sorted = ids.clone();
  sorted.sort_unstable();
  sorted.dedup();
  assert_eq!(ids, sorted);
  assert_eq!(ids.len(), 4);
}

// ─── Passports and certificates ──────────────────────────────────────────────

pub async fn passport_expiry_window<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();

  for (number, validity) in [
    ("P-TODAY", Some(days_from_today(0))),
    ("P-20", Some(days_from_today(20))),
    ("P-30", Some(days_from_today(30))),
    ("P-31", Some(days_from_today(31))),
    ("P-LAPSED", Some(days_from_today(-1))),
    ("P-NONE", None),
  ] {
    store
      .create_passport(new_passport(number, horse.id, validity))
      .await
      .unwrap();
  }

  let mut expiring: Vec<String> = store
    .passports_expiring_soon()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.numero_pasaporte)
    .collect();
  expiring.sort();
  assert_eq!(expiring, ["P-20", "P-30", "P-TODAY"]);

  // A fixed window isolates the query from the wall clock.
  let window = ExpiryWindow { from: days_from_today(25), until: days_from_today(35) };
  let numbers: Vec<String> = store
    .passports_expiring_within(window)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.numero_pasaporte)
    .collect();
  assert_eq!(numbers, ["P-30", "P-31"]);

  assert_eq!(store.passports_by_horse(horse.id).await.unwrap().len(), 6);
}

pub async fn passport_leaves_window_after_patch<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  let passport = store
    .create_passport(new_passport("P-1", horse.id, Some(days_from_today(20))))
    .await
    .unwrap();
  assert_recent(passport.fecha_registro);
  assert_eq!(store.passports_expiring_soon().await.unwrap().len(), 1);

  let patch = PassportPatch {
    fecha_validez: Some(Some(days_from_today(40))),
    ..PassportPatch::default()
  };
  let updated = store.update_passport(passport.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.fecha_validez, Some(days_from_today(40)));
  assert_eq!(updated.numero_pasaporte, "P-1");
  assert!(store.passports_expiring_soon().await.unwrap().is_empty());

  assert_duplicate(
    store.create_passport(new_passport("P-1", horse.id, None)).await,
    EntityKind::Passport,
    "numero_pasaporte",
  );
}

pub async fn health_certificate_expiry_window<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  store
    .create_health_certificate(new_health_certificate("C-SOON", horse.id, days_from_today(10)))
    .await
    .unwrap();
  store
    .create_health_certificate(new_health_certificate("C-LATER", horse.id, days_from_today(90)))
    .await
    .unwrap();
  store
    .create_health_certificate(new_health_certificate("C-PAST", horse.id, days_from_today(-3)))
    .await
    .unwrap();

  let soon = store.health_certificates_expiring_soon().await.unwrap();
  assert_eq!(soon.len(), 1);
  assert_eq!(soon[0].numero_certificado, "C-SOON");
  assert_eq!(soon[0].resultado, ExamOutcome::Apto);

  assert_eq!(store.health_certificates_by_horse(horse.id).await.unwrap().len(), 3);
  assert_eq!(store.list_health_certificates().await.unwrap().len(), 3);

  assert_duplicate(
    store
      .create_health_certificate(new_health_certificate("C-SOON", horse.id, days_from_today(5)))
      .await,
    EntityKind::HealthCertificate,
    "numero_certificado",
  );
}

// ─── Movements and transport ─────────────────────────────────────────────────

pub async fn movement_guide_lifecycle<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  let origin = store.create_farm(new_farm("ES110010000009", None)).await.unwrap();

  let mut input = new_movement_guide("G-1", horse.id);
  input.explotacion_origen = Some(origin.id);
  let guide = store.create_movement_guide(input).await.unwrap();
  assert_eq!(guide.estado, GuideStatus::Emitida);
  assert_eq!(guide.explotacion_origen, Some(origin.id));

  let arrival = Utc::now();
  let patch = MovementGuidePatch {
    estado: Some(GuideStatus::Finalizada),
    fecha_llegada: Some(Some(arrival)),
    ..MovementGuidePatch::default()
  };
  let updated = store.update_movement_guide(guide.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.estado, GuideStatus::Finalizada);
  assert!(updated.fecha_llegada.is_some());
  assert_eq!(updated.numero_guia, "G-1");

  let mut bad = new_movement_guide("G-2", horse.id);
  bad.explotacion_destino = Some(777);
  assert_missing(store.create_movement_guide(bad).await, EntityKind::Farm, 777);

  assert_eq!(store.movement_guides_by_horse(horse.id).await.unwrap().len(), 1);
  assert_duplicate(
    store.create_movement_guide(new_movement_guide("G-1", horse.id)).await,
    EntityKind::MovementGuide,
    "numero_guia",
  );
}

pub async fn eu_transport_document_links<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  let cert = store
    .create_health_certificate(new_health_certificate("C-1", horse.id, days_from_today(60)))
    .await
    .unwrap();
  let guide = store
    .create_movement_guide(new_movement_guide("G-1", horse.id))
    .await
    .unwrap();

  let mut input = new_eu_transport_document("UE-1", horse.id);
  input.id_certificado_salud = Some(cert.id);
  input.id_guia_movimiento = Some(guide.id);
  let doc = store.create_eu_transport_document(input).await.unwrap();
  assert_eq!(doc.id_certificado_salud, Some(cert.id));
  assert_eq!(doc.id_guia_movimiento, Some(guide.id));

  let patch = EuTransportDocumentPatch {
    id_guia_movimiento: Some(Some(guide.id + 100)),
    ..EuTransportDocumentPatch::default()
  };
  assert_missing(
    store.update_eu_transport_document(doc.id, patch).await,
    EntityKind::MovementGuide,
    guide.id + 100,
  );

  let patch = EuTransportDocumentPatch {
    pais_destino: Some("Portugal".into()),
    ..EuTransportDocumentPatch::default()
  };
  let updated = store
    .update_eu_transport_document(doc.id, patch)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.pais_destino, "Portugal");
  assert_eq!(updated.pais_origen, "España");

  assert_eq!(store.eu_transport_documents_by_horse(horse.id).await.unwrap().len(), 1);
  assert_eq!(store.list_eu_transport_documents().await.unwrap().len(), 1);
}

pub async fn registry_book_refreshes_timestamp<S: RegistryStore>(store: &S) {
  let farm = store.create_farm(new_farm("ES110010000001", None)).await.unwrap();
  let book = store.create_registry_book(new_registry_book(farm.id)).await.unwrap();
  assert_recent(book.fecha_ultima_actualizacion);

  let patch = RegistryBookPatch {
    observaciones: Some(Some("revisado por inspección".into())),
    ..RegistryBookPatch::default()
  };
  let updated = store.update_registry_book(book.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.observaciones.as_deref(), Some("revisado por inspección"));
  assert!(updated.fecha_ultima_actualizacion >= book.fecha_ultima_actualizacion);
  assert_eq!(updated.fecha_apertura, book.fecha_apertura);

  assert_eq!(store.registry_books_by_farm(farm.id).await.unwrap().len(), 1);
  assert!(store.registry_books_by_farm(farm.id + 1).await.unwrap().is_empty());
}

// ─── TME cards ───────────────────────────────────────────────────────────────

pub async fn id_card_defaults_and_lookup<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  let card = store.create_id_card(new_id_card(1, horse.id)).await.unwrap();

  assert_eq!(card.estado, IdCardStatus::Activa);
  assert_eq!(card.leyenda_validez, DEFAULT_VALIDITY_LEGEND);
  assert!(card.valida_movimientos_espana);
  assert!(!card.valida_movimientos_ue);
  assert_recent(card.fecha_registro);

  let fetched = store.get_id_card(card.id).await.unwrap().unwrap();
  assert_eq!(fetched.numero_tarjeta, card.numero_tarjeta);
  assert_eq!(store.id_cards_by_horse(horse.id).await.unwrap().len(), 1);

  let mut again = new_id_card(2, horse.id);
  again.ueln = ueln(1);
  assert_duplicate(store.create_id_card(again).await, EntityKind::IdCard, "ueln");
}

pub async fn id_card_identity_is_immutable<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  let card = store.create_id_card(new_id_card(1, horse.id)).await.unwrap();

  let patch = IdCardPatch {
    ueln: Some(ueln(9)),
    observaciones: Some(Some("cambio".into())),
    ..IdCardPatch::default()
  };
  let err = store.update_id_card(card.id, patch).await.expect_err("ueln is fixed");
  assert!(matches!(domain_error(&err), Error::ImmutableField("ueln")));

  let stored = store.get_id_card(card.id).await.unwrap().unwrap();
  assert_eq!(stored.ueln, card.ueln);
  assert_eq!(stored.observaciones, None);

  let patch = IdCardPatch {
    ueln: Some(card.ueln.clone()),
    estado: Some(IdCardStatus::Suspendida),
    motivo_estado: Some(Some("pendiente de revisión".into())),
    ..IdCardPatch::default()
  };
  let updated = store.update_id_card(card.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.estado, IdCardStatus::Suspendida);
  assert_eq!(updated.ueln, card.ueln);
}

pub async fn id_card_child_records<S: RegistryStore>(store: &S) {
  let horse = store.create_horse(new_horse(1, None, None)).await.unwrap();
  let card = store.create_id_card(new_id_card(1, horse.id)).await.unwrap();

  let description = store
    .add_id_card_description(NewIdCardDescription {
      id_tarjeta: card.id,
      cabeza: Some("lucero".into()),
      alzada_cruz: Some("1,62 m".into()),
      ..NewIdCardDescription::default()
    })
    .await
    .unwrap();
  assert_eq!(description.id_tarjeta, card.id);
  assert_recent(description.fecha_registro);

  store
    .add_id_card_movement(NewIdCardMovement {
      id_tarjeta:           card.id,
      fecha_movimiento:     date(2026, 3, 1),
      lugar_origen:         "Jerez".into(),
      lugar_destino:        "Sevilla".into(),
      motivo_movimiento:    "feria".into(),
      nombre_transportista: None,
      licencia_transporte:  None,
      vehiculo_matricula:   None,
      autorizado_por:       None,
      sello_oficial:        true,
    })
    .await
    .unwrap();

  store
    .add_veterinary_validation(NewVeterinaryValidation {
      id_tarjeta:                   card.id,
      fecha_validacion:             date(2026, 3, 2),
      tipo_validacion:              "vacunacion".into(),
      descripcion:                  "gripe equina".into(),
      nombre_veterinario:           "Dra. Ruiz".into(),
      numero_colegiado_veterinario: "11/1234".into(),
      fecha_validez_hasta:          Some(date(2027, 3, 2)),
    })
    .await
    .unwrap();

  assert_eq!(store.id_card_descriptions(card.id).await.unwrap().len(), 1);
  let movements = store.id_card_movements(card.id).await.unwrap();
  assert_eq!(movements.len(), 1);
  assert!(movements[0].sello_oficial);
  assert_eq!(store.veterinary_validations(card.id).await.unwrap().len(), 1);
  assert!(store.id_card_movements(card.id + 1).await.unwrap().is_empty());

  assert_missing(
    store
      .add_id_card_description(NewIdCardDescription {
        id_tarjeta: card.id + 1,
        ..NewIdCardDescription::default()
      })
      .await,
    EntityKind::IdCard,
    card.id + 1,
  );
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub async fn dashboard_is_zero_for_empty_user<S: RegistryStore>(store: &S) {
  // Records owned by someone else must not leak into the counts.
  let other = store.create_user(new_user("other@example.es")).await.unwrap();
  let horse = store.create_horse(new_horse(1, Some(other.id), None)).await.unwrap();
  store
    .create_passport(new_passport("P-1", horse.id, Some(days_from_today(5))))
    .await
    .unwrap();

  let user = store.create_user(new_user("nobody@example.es")).await.unwrap();
  let stats = dashboard_stats(store, user.id, ExpiryWindow::current()).await.unwrap();
  assert_eq!(stats, DashboardStats::default());
}

pub async fn dashboard_counts_user_documents<S: RegistryStore>(store: &S) {
  let user = store.create_user(new_user("maria@example.es")).await.unwrap();
  store.create_farm(new_farm("ES110010000001", Some(user.id))).await.unwrap();
  let first = store.create_horse(new_horse(1, Some(user.id), None)).await.unwrap();
  let second = store.create_horse(new_horse(2, Some(user.id), None)).await.unwrap();

  store
    .create_passport(new_passport("P-1", first.id, Some(days_from_today(20))))
    .await
    .unwrap();
  store
    .create_passport(new_passport("P-2", second.id, Some(days_from_today(200))))
    .await
    .unwrap();
  store
    .create_health_certificate(new_health_certificate("C-1", second.id, days_from_today(3)))
    .await
    .unwrap();

  let stats = dashboard_stats(store, user.id, ExpiryWindow::current()).await.unwrap();
  assert_eq!(
    stats,
    DashboardStats {
      total_caballos:     2,
      documentos_activos: 3,
      proximos_vencer:    2,
      explotaciones:      1,
    }
  );
}
