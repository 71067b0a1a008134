//! Reports module: dashboard aggregates and printable report documents

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
