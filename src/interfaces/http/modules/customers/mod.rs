//! Customers module: customer directory (admin CRUD) and statements

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
