//! Storage backends
//!
//! Two interchangeable backends implement the domain repositories: an
//! in-memory store for development and tests, and a single-document
//! JSON file store for durable installs.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use tracing::info;

use crate::config::StorageConfig;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Initialize the repository provider selected by configuration.
pub async fn init_store(config: &StorageConfig) -> DomainResult<Arc<dyn RepositoryProvider>> {
    match config.backend.as_str() {
        "memory" => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        "file" => {
            info!("Opening data file: {}", config.path.display());
            let store = JsonFileStore::open(&config.path).await?;
            info!("Data file ready");
            Ok(Arc::new(store))
        }
        other => Err(DomainError::Validation(format!(
            "unknown storage backend '{other}', expected 'file' or 'memory'"
        ))),
    }
}
