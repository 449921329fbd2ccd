//! Query parameters shared by the per-horse document collections.

use serde::Deserialize;

/// `?caballoId=<id>&expiring=true`. Where both are given the horse filter
/// wins; `expiring` is ignored by collections without a validity date. Any
/// `expiring` value other than the literal `true` counts as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentParams {
  pub caballo_id: Option<i64>,
  pub expiring:   Option<String>,
}

impl DocumentParams {
  pub fn expiring_only(&self) -> bool { self.expiring.as_deref() == Some("true") }
}
