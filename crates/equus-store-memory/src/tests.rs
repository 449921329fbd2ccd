//! Tests for `MemoryStore`.

use equus_core::{
  conformance::{new_farm, new_horse, new_passport, new_user},
  store::RegistryStore,
};

use crate::MemoryStore;

async fn store() -> MemoryStore { MemoryStore::new() }

equus_core::conformance_suite!(store);

// ─── Backend specifics ───────────────────────────────────────────────────────

#[tokio::test]
async fn each_collection_counts_its_own_ids() {
  let s = store().await;

  let user = s.create_user(new_user("ana@example.es")).await.unwrap();
  let farm = s.create_farm(new_farm("ES110010000001", None)).await.unwrap();
  let horse = s.create_horse(new_horse(1, None, None)).await.unwrap();
  let passport = s.create_passport(new_passport("P-1", horse.id, None)).await.unwrap();

  assert_eq!((user.id, farm.id, horse.id, passport.id), (1, 1, 1, 1));
}

#[tokio::test]
async fn rejected_insert_does_not_consume_an_id() {
  let s = store().await;

  s.create_horse(new_horse(1, None, None)).await.unwrap();
  s.create_horse(new_horse(1, None, None)).await.unwrap_err();
  s.create_horse(new_horse(2, None, Some(42))).await.unwrap_err();
  let next = s.create_horse(new_horse(3, None, None)).await.unwrap();

  assert_eq!(next.id, 2);
}
