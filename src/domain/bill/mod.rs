//! Bill aggregate
//!
//! Contains the Bill entity, payment state machine, and repository
//! interface.

pub mod model;
pub mod repository;

pub use model::{Bill, BillStatus, PaymentMethod};
pub use repository::BillRepository;
