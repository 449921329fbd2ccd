//! HTTP server wiring for Equus: configuration, backend selection and the
//! top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use equus_core::store::RegistryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`RegistryStore`] implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  Sqlite,
  /// Process-local; everything is lost on exit.
  Memory,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `EQUUS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub backend:    Backend,
  /// SQLite database file. Ignored by the memory backend.
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Layer defaults, the TOML file at `path` (optional) and `EQUUS_*`
/// environment variables, later sources winning.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5000)?
    .set_default("backend", "sqlite")?
    .set_default("store_path", "~/.local/share/equus/equus.db")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("EQUUS").try_parsing(true))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/") {
    if let Ok(home) = std::env::var("HOME") {
      return PathBuf::from(home).join(rest);
    }
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, traced per request.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: RegistryStore + 'static,
{
  Router::new()
    .nest("/api", equus_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use equus_store_memory::MemoryStore;
  use tower::ServiceExt as _;

  use super::*;

  fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("equus-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let config = load_config(Path::new("/nonexistent/equus.toml")).unwrap();
    assert_eq!(config.backend, Backend::Sqlite);
    assert!(config.store_path.ends_with("equus.db"));
  }

  #[test]
  fn file_values_override_defaults() {
    let path = scratch_file(
      "config.toml",
      "host = \"0.0.0.0\"\nport = 8080\nbackend = \"memory\"\nstore_path = \"/var/lib/equus.db\"\n",
    );
    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.address(), "0.0.0.0:8080");
    assert_eq!(config.backend, Backend::Memory);
    assert_eq!(config.store_path, PathBuf::from("/var/lib/equus.db"));
  }

  #[test]
  fn unknown_backend_is_rejected() {
    let path = scratch_file("bad-backend.toml", "backend = \"postgres\"\n");
    let result = load_config(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(result.is_err());
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/equus/equus.db")),
      PathBuf::from(home).join("equus/equus.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/equus.db")), PathBuf::from("/abs/equus.db"));
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let app = app(Arc::new(MemoryStore::new()));

    let req = Request::builder().uri("/api/caballos").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(serde_json::from_slice::<serde_json::Value>(&bytes).unwrap(), serde_json::json!([]));

    let req = Request::builder().uri("/caballos").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
