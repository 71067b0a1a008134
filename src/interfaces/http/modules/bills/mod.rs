//! Bills module: bill issuing, payment and receipts

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
