//! In-process backend for the Equus registry.
//!
//! Every collection lives in its own [`tokio::sync::Mutex`]. Nothing is
//! persisted; the store is meant for tests, demos and the `memory` server
//! backend.

mod store;
mod table;

pub use store::MemoryStore;

#[cfg(test)]
mod tests;
