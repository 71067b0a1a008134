pub mod bill;
pub mod customer;
pub mod repositories;
pub mod tariff;
pub mod user;

// Re-export commonly used types
pub use bill::{Bill, BillRepository, BillStatus, PaymentMethod};
pub use customer::{Customer, CustomerRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use tariff::{Tariff, TariffRepository, TariffSnapshot};
pub use user::{UserAccount, UserRepository, UserRole};

// Re-export DomainError from shared for convenience
pub use crate::shared::types::errors::DomainError;
