//! Integration tests for `SqliteStore` against an in-memory database.

use equus_core::{
  conformance::{days_from_today, new_horse, new_passport, new_user},
  store::RegistryStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

equus_core::conformance_suite!(store);

// ─── Backend specifics ───────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_surfaces_as_core_error() {
  let s = store().await;
  s.create_user(new_user("ana@example.es")).await.unwrap();

  let err = s.create_user(new_user("ana@example.es")).await.unwrap_err();
  assert!(matches!(err, Error::Core(equus_core::Error::Duplicate { .. })));
}

#[tokio::test]
async fn schema_init_is_idempotent() {
  let path = std::env::temp_dir().join(format!("equus-{}-reopen.db", std::process::id()));
  let _ = std::fs::remove_file(&path);

  let first = SqliteStore::open(&path).await.unwrap();
  let horse = first.create_horse(new_horse(1, None, None)).await.unwrap();
  first
    .create_passport(new_passport("P-1", horse.id, Some(days_from_today(3))))
    .await
    .unwrap();
  drop(first);

  let second = SqliteStore::open(&path).await.unwrap();
  let reread = second.get_horse(horse.id).await.unwrap().expect("persisted");
  assert_eq!(reread.ueln, horse.ueln);
  assert_eq!(reread.fecha_registro, horse.fecha_registro);
  assert_eq!(second.passports_expiring_soon().await.unwrap().len(), 1);

  drop(second);
  let _ = std::fs::remove_file(&path);
}
