//! Health module: service liveness endpoint

pub mod handlers;

pub use handlers::*;
