//! Customer repository interface

use async_trait::async_trait;

use super::model::Customer;
use crate::domain::DomainResult;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Customer>>;
    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Option<Customer>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Customer>>;
    async fn find_all(&self) -> DomainResult<Vec<Customer>>;
    async fn save(&self, customer: Customer) -> DomainResult<Customer>;
    async fn update(&self, customer: Customer) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
