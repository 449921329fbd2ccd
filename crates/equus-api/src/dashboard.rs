//! `GET /dashboard/stats?userId=<id>`

use std::sync::Arc;

use axum::{Json, extract::State};
use equus_core::{
  dashboard::{DashboardStats, dashboard_stats},
  expiry::ExpiryWindow,
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::Query};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
  pub user_id: Option<i64>,
}

pub async fn stats<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<StatsParams>,
) -> Result<Json<DashboardStats>, ApiError> {
  let user_id = params.user_id.ok_or(ApiError::MissingParameter("userId"))?;
  let stats = dashboard_stats(store.as_ref(), user_id, ExpiryWindow::current())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(stats))
}
