//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::bill::BillRepository;
use super::customer::CustomerRepository;
use super::tariff::TariffRepository;
use super::user::UserRepository;
use crate::shared::types::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let customer = repos.customers().find_by_id("...").await?;
///     let bills = repos.bills().find_by_customer_number(&customer.customer_number).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn tariffs(&self) -> &dyn TariffRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn bills(&self) -> &dyn BillRepository;
    fn users(&self) -> &dyn UserRepository;
}
