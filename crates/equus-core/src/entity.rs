//! Shared plumbing for every persisted entity.
//!
//! Each entity comes as a triple: the stored record, an insert payload
//! (`New*`) without generated fields, and a partial patch (`*Patch`). The
//! traits below let backends handle all of them with one code path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::Result;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// Every entity collection. The string form is the table / collection name.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
pub enum EntityKind {
  #[strum(serialize = "users")]
  User,
  #[strum(serialize = "explotaciones")]
  Farm,
  #[strum(serialize = "caballos")]
  Horse,
  #[strum(serialize = "pasaportes")]
  Passport,
  #[strum(serialize = "guias_movimiento")]
  MovementGuide,
  #[strum(serialize = "certificados_salud")]
  HealthCertificate,
  #[strum(serialize = "documentos_transporte_ue")]
  EuTransportDocument,
  #[strum(serialize = "libros_registro")]
  RegistryBook,
  #[strum(serialize = "tarjetas_tme")]
  IdCard,
  #[strum(serialize = "resenas_tme")]
  IdCardDescription,
  #[strum(serialize = "movimientos_tme")]
  IdCardMovement,
  #[strum(serialize = "validaciones_veterinarias")]
  VeterinaryValidation,
}

impl EntityKind {
  pub fn table(self) -> &'static str { self.into() }
}

/// A foreign key named by a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
  pub kind: EntityKind,
  pub id:   i64,
}

impl Reference {
  pub fn new(kind: EntityKind, id: i64) -> Self { Self { kind, id } }

  pub fn optional(kind: EntityKind, id: Option<i64>) -> Option<Self> {
    id.map(|id| Self::new(kind, id))
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A persisted row.
pub trait Record: Clone + Send + Sync + 'static {
  const KIND: EntityKind;

  fn id(&self) -> i64;

  /// `(column, value)` pairs that must be unique within the collection.
  fn unique_keys(&self) -> Vec<(&'static str, String)> { Vec::new() }
}

/// An insert payload: everything the client supplies for a new record.
pub trait Insert: Send + 'static {
  type Record: Record;

  /// Foreign keys that must resolve before the insert.
  fn references(&self) -> Vec<Reference>;

  /// Build the stored record. `now` becomes the server-assigned timestamp.
  fn into_record(self, id: i64, now: DateTime<Utc>) -> Self::Record;
}

/// A partial update: every field optional, absent fields left untouched.
pub trait Patch: Send + 'static {
  type Record: Record;

  /// Foreign keys the patch would point the record at.
  fn references(&self) -> Vec<Reference>;

  /// Merge into `record`. Fails without touching anything if a field may not
  /// change.
  fn apply(self, record: &mut Self::Record, now: DateTime<Utc>) -> Result<()>;
}

// ─── Nullable patch fields ───────────────────────────────────────────────────

/// `deserialize_with` for nullable patch fields. An absent key stays `None`
/// through `#[serde(default)]`; an explicit `null` becomes `Some(None)`.
pub fn nullable<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

// ─── Merge helpers ───────────────────────────────────────────────────────────

/// Copy every `Some` field of a patch onto the record. Nullable columns take
/// `Option<Option<T>>` patch fields, so `Some(None)` clears them.
macro_rules! merge {
  ($record:expr, $patch:expr; $($field:ident),* $(,)?) => {
    $(
      if let Some(value) = $patch.$field {
        $record.$field = value;
      }
    )*
  };
}

pub(crate) use merge;
