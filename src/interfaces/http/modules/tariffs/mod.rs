//! Tariffs module: rate plan catalog (admin CRUD)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
