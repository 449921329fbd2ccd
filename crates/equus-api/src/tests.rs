//! Router tests: real requests through `tower::ServiceExt::oneshot` against
//! both backends.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use equus_core::{conformance::days_from_today, store::RegistryStore};
use equus_store_memory::MemoryStore;
use equus_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

// ─── Harness ─────────────────────────────────────────────────────────────────

fn app<S: RegistryStore + 'static>(store: S) -> Router {
  Router::new().nest("/api", api_router(Arc::new(store)))
}

fn memory_app() -> Router { app(MemoryStore::new()) }

async fn sqlite_app() -> Router {
  app(SqliteStore::open_in_memory().await.expect("in-memory store"))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
  send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
  send(app, Method::POST, uri, Some(body)).await
}

async fn patch(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
  send(app, Method::PATCH, uri, Some(body)).await
}

/// POST that must succeed; returns the created id.
async fn create(app: &Router, uri: &str, body: Value) -> i64 {
  let (status, value) = post(app, uri, body).await;
  assert_eq!(status, StatusCode::OK, "POST {uri}: {value}");
  value["id"].as_i64().expect("created record has an id")
}

// ─── Bodies ──────────────────────────────────────────────────────────────────

fn registration(email: &str) -> Value {
  json!({
    "nombre": "Ana",
    "apellidos": "García López",
    "email": email,
    "password": "caballo-blanco",
    "tipoUsuario": "propietario",
  })
}

fn farm(rega: &str, owner: Option<i64>) -> Value {
  json!({
    "codigoRega": rega,
    "nombre": "Yeguada del Sur",
    "direccion": "Camino Real s/n",
    "municipio": "Jerez de la Frontera",
    "provincia": "Cádiz",
    "codigoPostal": "11400",
    "telefono": "956000000",
    "tipoExplotacion": "cria",
    "capacidadMaxima": 40,
    "idPropietario": owner,
  })
}

fn horse(ueln: &str, microchip: &str, owner: Option<i64>, farm: Option<i64>) -> Value {
  json!({
    "ueln": ueln,
    "microchip": microchip,
    "nombre": "Test",
    "fechaNacimiento": "2015-04-02",
    "sexo": "macho",
    "raza": "PRE",
    "capa": "Torda",
    "paisOrigen": "España",
    "idPropietario": owner,
    "idExplotacion": farm,
  })
}

fn passport(number: &str, horse: i64, days: i64) -> Value {
  json!({
    "idCaballo": horse,
    "numeroPasaporte": number,
    "fechaEmision": "2024-01-10",
    "autoridadEmisora": "ANCCE",
    "fechaValidez": days_from_today(days),
    "estado": "vigente",
  })
}

fn id_card(horse: i64) -> Value {
  json!({
    "idCaballo": horse,
    "ueln": "724015000012345",
    "codigoTranspondedor": "982000123456789",
    "nombreEquido": "Lucero",
    "sexo": "Macho",
    "fechaNacimiento": "2018-05-01",
    "capa": "Castaña",
    "numeroTarjeta": "TME-0001",
    "fechaEmision": "2026-01-15",
    "autoridadEmisora": "Junta de Andalucía",
  })
}

// ─── Scenarios run against both backends ─────────────────────────────────────

async fn horse_identifiers_are_echoed_and_unique(app: Router) {
  let (status, created) =
    post(&app, "/api/caballos", horse("724015000012345", "982000123456789000", None, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(created["ueln"], "724015000012345");
  assert_eq!(created["microchip"], "982000123456789000");

  let registered: DateTime<Utc> = serde_json::from_value(created["fechaRegistro"].clone()).unwrap();
  assert!((Utc::now() - registered).num_seconds().abs() < 5);

  let (status, body) =
    post(&app, "/api/caballos", horse("724015000012345", "982000999999999000", None, None)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Ya existe un registro con ese valor de UELN");
}

async fn passport_expiry_follows_patches(app: Router) {
  let horse_id =
    create(&app, "/api/caballos", horse("724015000012345", "982000123456789000", None, None)).await;
  let passport_id = create(&app, "/api/pasaportes", passport("TIE-001", horse_id, 20)).await;
  create(&app, "/api/pasaportes", passport("TIE-002", horse_id, -1)).await;

  let (status, expiring) = get(&app, "/api/pasaportes?expiring=true").await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<_> = expiring.as_array().unwrap().iter().map(|p| p["id"].as_i64()).collect();
  assert_eq!(ids, vec![Some(passport_id)]);

  let (status, patched) = patch(
    &app,
    &format!("/api/pasaportes/{passport_id}"),
    json!({ "fechaValidez": days_from_today(40) }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["numeroPasaporte"], "TIE-001");

  let (_, expiring) = get(&app, "/api/pasaportes?expiring=true").await;
  assert_eq!(expiring, json!([]));

  // The horse filter wins over `expiring`.
  let (_, by_horse) = get(&app, &format!("/api/pasaportes?caballoId={horse_id}&expiring=true")).await;
  assert_eq!(by_horse.as_array().unwrap().len(), 2);
}

async fn duplicate_email_is_rejected(app: Router) {
  let (status, _) = post(&app, "/api/auth/register", registration("ana@example.es")).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = post(&app, "/api/auth/register", registration("ana@example.es")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "El email ya está registrado");
}

async fn dangling_reference_is_a_client_error(app: Router) {
  let (status, body) = post(&app, "/api/pasaportes", passport("TIE-404", 404, 10)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().starts_with("Referencia inexistente"));
}

async fn null_clears_nullable_fields(app: Router) {
  let farm_id = create(&app, "/api/explotaciones", farm("ES110000000001", None)).await;
  let horse_id = create(
    &app,
    "/api/caballos",
    horse("724015000012345", "982000123456789000", None, Some(farm_id)),
  )
  .await;
  let passport_id = create(&app, "/api/pasaportes", passport("TIE-001", horse_id, 20)).await;

  let (status, patched) =
    patch(&app, &format!("/api/pasaportes/{passport_id}"), json!({ "fechaValidez": null })).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["fechaValidez"], Value::Null);
  assert_eq!(patched["numeroPasaporte"], "TIE-001");

  let (_, expiring) = get(&app, "/api/pasaportes?expiring=true").await;
  assert_eq!(expiring, json!([]));
  let (_, reread) = get(&app, &format!("/api/pasaportes/{passport_id}")).await;
  assert_eq!(reread["fechaValidez"], Value::Null);

  let (status, patched) =
    patch(&app, &format!("/api/caballos/{horse_id}"), json!({ "idExplotacion": null })).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["idExplotacion"], Value::Null);
  assert_eq!(patched["ueln"], "724015000012345");

  let (_, housed) = get(&app, &format!("/api/caballos?explotacionId={farm_id}")).await;
  assert_eq!(housed, json!([]));
}

macro_rules! on_both_backends {
  ($($scenario:ident),* $(,)?) => {
    mod memory {
      $(
        #[tokio::test]
        async fn $scenario() { super::$scenario(super::memory_app()).await }
      )*
    }

    mod sqlite {
      $(
        #[tokio::test]
        async fn $scenario() { super::$scenario(super::sqlite_app().await).await }
      )*
    }
  };
}

on_both_backends!(
  horse_identifiers_are_echoed_and_unique,
  passport_expiry_follows_patches,
  null_clears_nullable_fields,
  duplicate_email_is_rejected,
  dangling_reference_is_a_client_error,
);

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_login() {
  let app = memory_app();
  let (status, registered) = post(&app, "/api/auth/register", registration("ana@example.es")).await;
  assert_eq!(status, StatusCode::OK);
  assert!(registered["user"].get("passwordHash").is_none());
  assert!(registered["user"].get("password").is_none());
  assert_eq!(registered["user"]["ultimoAcceso"], Value::Null);

  let (status, logged_in) = post(
    &app,
    "/api/auth/login",
    json!({ "email": "ana@example.es", "password": "caballo-blanco" }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);
  assert!(logged_in["user"]["ultimoAcceso"].is_string());
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
  let app = memory_app();
  post(&app, "/api/auth/register", registration("ana@example.es")).await;

  for (email, password) in [("ana@example.es", "wrong-password"), ("nadie@example.es", "caballo-blanco")] {
    let (status, body) =
      post(&app, "/api/auth/login", json!({ "email": email, "password": password })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciales inválidas");
  }
}

#[tokio::test]
async fn incomplete_credentials_are_unauthorized() {
  let app = memory_app();
  post(&app, "/api/auth/register", registration("ana@example.es")).await;

  for body in [
    json!({ "email": "ana@example.es", "password": "" }),
    json!({ "email": "", "password": "caballo-blanco" }),
    json!({ "password": "caballo-blanco" }),
    json!({ "email": "ana@example.es" }),
    json!({}),
  ] {
    let (status, response) = post(&app, "/api/auth/login", body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");
    assert_eq!(response["message"], "Credenciales inválidas");
  }
}

#[tokio::test]
async fn inactive_accounts_cannot_log_in() {
  let app = memory_app();
  let mut body = registration("baja@example.es");
  body["activo"] = false.into();
  post(&app, "/api/auth/register", body).await;

  let (status, _) = post(
    &app,
    "/api/auth/login",
    json!({ "email": "baja@example.es", "password": "caballo-blanco" }),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_registration_is_rejected() {
  let app = memory_app();
  let mut body = registration("ana@example.es");
  body["password"] = "short".into();

  let (status, body) = post(&app, "/api/auth/register", body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Datos inválidos");
}

// ─── Validation and lookup ───────────────────────────────────────────────────

#[tokio::test]
async fn generated_fields_cannot_be_supplied() {
  let app = memory_app();
  let mut body = horse("724015000012345", "982000123456789000", None, None);
  body["fechaRegistro"] = "2001-01-01T00:00:00Z".into();
  let (status, _) = post(&app, "/api/caballos", body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let mut body = horse("724015000012345", "982000123456789000", None, None);
  body["id"] = 99.into();
  let (status, _) = post(&app, "/api/caballos", body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_input_is_a_client_error() {
  let app = memory_app();

  let (status, body) = post(&app, "/api/caballos", json!({ "nombre": "Sin UELN" })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Datos inválidos");

  let (status, _) = get(&app, "/api/caballos/abc").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = get(&app, "/api/caballos?userId=uno").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unrecognised_expiring_values_list_everything() {
  let app = memory_app();
  let horse_id =
    create(&app, "/api/caballos", horse("724015000012345", "982000123456789000", None, None)).await;
  create(&app, "/api/pasaportes", passport("TIE-001", horse_id, 20)).await;
  create(&app, "/api/pasaportes", passport("TIE-002", horse_id, 400)).await;

  for query in ["expiring=yes", "expiring=1", "expiring=false", "expiring="] {
    let (status, all) = get(&app, &format!("/api/pasaportes?{query}")).await;
    assert_eq!(status, StatusCode::OK, "{query}");
    assert_eq!(all.as_array().unwrap().len(), 2, "{query}");
  }

  let (_, expiring) = get(&app, "/api/pasaportes?expiring=true").await;
  assert_eq!(expiring.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_records_are_not_found() {
  let app = memory_app();
  for uri in ["/api/users/7", "/api/explotaciones/7", "/api/caballos/7", "/api/tarjetas-tme/7"] {
    let (status, body) = get(&app, uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    assert!(body["message"].as_str().unwrap().contains("no encontrad"));
  }

  let (status, body) = patch(&app, "/api/caballos/7", json!({ "nombre": "Nadie" })).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["message"], "Caballo no encontrado");
}

#[tokio::test]
async fn horse_list_filters_prefer_owner() {
  let app = memory_app();
  let (_, registered) = post(&app, "/api/auth/register", registration("ana@example.es")).await;
  let owner = registered["user"]["id"].as_i64().unwrap();
  let farm_id = create(&app, "/api/explotaciones", farm("ES110000000001", Some(owner))).await;

  create(&app, "/api/caballos", horse("724015000000001", "941000000000001", Some(owner), None)).await;
  create(&app, "/api/caballos", horse("724015000000002", "941000000000002", None, Some(farm_id))).await;

  let (_, owned) = get(&app, &format!("/api/caballos?userId={owner}&explotacionId={farm_id}")).await;
  assert_eq!(owned.as_array().unwrap().len(), 1);
  assert_eq!(owned[0]["ueln"], "724015000000001");

  let (_, housed) = get(&app, &format!("/api/caballos?explotacionId={farm_id}")).await;
  assert_eq!(housed[0]["ueln"], "724015000000002");

  let (_, all) = get(&app, "/api/caballos").await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (_, farms) = get(&app, &format!("/api/explotaciones?userId={owner}")).await;
  assert_eq!(farms[0]["codigoRega"], "ES110000000001");
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_requires_user_id() {
  let (status, body) = get(&memory_app(), "/api/dashboard/stats").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "ID de usuario requerido");
}

#[tokio::test]
async fn dashboard_counts_only_the_users_documents() {
  let app = memory_app();
  let (_, registered) = post(&app, "/api/auth/register", registration("ana@example.es")).await;
  let owner = registered["user"]["id"].as_i64().unwrap();

  let (status, empty) = get(&app, &format!("/api/dashboard/stats?userId={owner}")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    empty,
    json!({ "totalCaballos": 0, "documentosActivos": 0, "proximosVencer": 0, "explotaciones": 0 })
  );

  let mine =
    create(&app, "/api/caballos", horse("724015000000001", "941000000000001", Some(owner), None)).await;
  let stranger =
    create(&app, "/api/caballos", horse("724015000000002", "941000000000002", None, None)).await;
  create(&app, "/api/pasaportes", passport("TIE-1", mine, 10)).await;
  create(&app, "/api/pasaportes", passport("TIE-2", mine, 90)).await;
  create(&app, "/api/pasaportes", passport("TIE-3", stranger, 10)).await;

  let (_, stats) = get(&app, &format!("/api/dashboard/stats?userId={owner}")).await;
  assert_eq!(stats["totalCaballos"], 1);
  assert_eq!(stats["documentosActivos"], 2);
  assert_eq!(stats["proximosVencer"], 1);
}

// ─── TME cards ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn card_identity_is_immutable_over_http() {
  let app = memory_app();
  let horse_id =
    create(&app, "/api/caballos", horse("724015000012345", "982000123456789", None, None)).await;
  let card_id = create(&app, "/api/tarjetas-tme", id_card(horse_id)).await;

  let (status, body) = patch(
    &app,
    &format!("/api/tarjetas-tme/{card_id}"),
    json!({ "ueln": "724015000099999" }),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "El campo UELN no se puede modificar");

  let (status, body) = patch(
    &app,
    &format!("/api/tarjetas-tme/{card_id}"),
    json!({ "estado": "suspendida", "motivoEstado": "Inspección" }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["estado"], "suspendida");
}

#[tokio::test]
async fn card_children_hang_off_the_path() {
  let app = sqlite_app().await;
  let horse_id =
    create(&app, "/api/caballos", horse("724015000012345", "982000123456789", None, None)).await;
  let card_id = create(&app, "/api/tarjetas-tme", id_card(horse_id)).await;
  let base = format!("/api/tarjetas-tme/{card_id}");

  let (status, description) =
    post(&app, &format!("{base}/resenas"), json!({ "cabeza": "Lucero", "alzadaCruz": "1,62" })).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(description["idTarjeta"], card_id);

  create(
    &app,
    &format!("{base}/movimientos"),
    json!({
      "fechaMovimiento": "2026-02-01",
      "lugarOrigen": "Jerez",
      "lugarDestino": "Sevilla",
      "motivoMovimiento": "Concurso",
    }),
  )
  .await;
  create(
    &app,
    &format!("{base}/validaciones"),
    json!({
      "fechaValidacion": "2026-02-03",
      "tipoValidacion": "vacunacion",
      "descripcion": "Gripe equina",
      "nombreVeterinario": "Luis Pérez",
      "numeroColegiadoVeterinario": "11-1234",
    }),
  )
  .await;

  for child in ["resenas", "movimientos", "validaciones"] {
    let (status, list) = get(&app, &format!("{base}/{child}")).await;
    assert_eq!(status, StatusCode::OK, "{child}");
    assert_eq!(list.as_array().unwrap().len(), 1, "{child}");
  }

  let (status, _) = get(&app, "/api/tarjetas-tme/999/movimientos").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = post(&app, "/api/tarjetas-tme/999/resenas", json!({})).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
