//! Per-user summary counts shown on the landing page.

use serde::{Deserialize, Serialize};

use crate::{
  expiry::{Expiring, ExpiryWindow},
  store::RegistryStore,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub total_caballos:     usize,
  /// Passports plus health certificates of the user's horses.
  pub documentos_activos: usize,
  /// The subset of `documentos_activos` inside the expiry window.
  pub proximos_vencer:    usize,
  pub explotaciones:      usize,
}

/// Compute the dashboard for `user_id`.
///
/// Every count goes through the user's own horses and farms, so a user who
/// owns nothing gets all zeros regardless of what else is registered.
pub async fn dashboard_stats<S: RegistryStore>(
  store: &S,
  user_id: i64,
  window: ExpiryWindow,
) -> Result<DashboardStats, S::Error> {
  let horses = store.horses_by_owner(user_id).await?;
  let farms = store.farms_by_owner(user_id).await?;

  let mut stats = DashboardStats {
    total_caballos: horses.len(),
    explotaciones: farms.len(),
    ..DashboardStats::default()
  };

  for horse in &horses {
    let passports = store.passports_by_horse(horse.id).await?;
    let certificates = store.health_certificates_by_horse(horse.id).await?;

    stats.documentos_activos += passports.len() + certificates.len();
    stats.proximos_vencer += count_expiring(&passports, &window)
      + count_expiring(&certificates, &window);
  }

  Ok(stats)
}

fn count_expiring<T: Expiring>(docs: &[T], window: &ExpiryWindow) -> usize {
  docs
    .iter()
    .filter(|doc| window.contains(doc.fecha_validez()))
    .count()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serializes_camel_case() {
    let stats = DashboardStats {
      total_caballos:     2,
      documentos_activos: 3,
      proximos_vencer:    1,
      explotaciones:      1,
    };
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "totalCaballos": 2,
        "documentosActivos": 3,
        "proximosVencer": 1,
        "explotaciones": 1,
      })
    );
  }
}
