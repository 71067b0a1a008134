//! Interface adapters
//!
//! Inbound adapters exposing the application over transport protocols.
//! Currently only HTTP (REST + Swagger UI).

pub mod http;

pub use http::create_api_router;
