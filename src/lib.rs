//! # Pascabill
//!
//! Postpaid electricity billing service: tariff catalog, customer
//! directory, monthly bill lifecycle and revenue reporting.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Business logic and use cases
//! - **infrastructure**: External concerns (storage, password hashing)
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Reusable server runtime with graceful shutdown
//! - **shared**: Cross-cutting types (errors, shutdown signal)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, default_data_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::{init_store, JsonFileStore, MemoryStore};

// Re-export API router
pub use interfaces::http::create_api_router;

// Re-export server runtime
pub use server::{init_tracing, ServerHandle, ServerOptions};
