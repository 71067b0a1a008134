//! Tariff aggregate
//!
//! Contains the Tariff entity, the frozen snapshot embedded in bills,
//! and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Tariff, TariffSnapshot};
pub use repository::TariffRepository;
