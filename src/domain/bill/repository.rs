//! Bill repository interface

use async_trait::async_trait;

use super::model::Bill;
use crate::domain::DomainResult;

#[async_trait]
pub trait BillRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Bill>>;
    async fn find_all(&self) -> DomainResult<Vec<Bill>>;
    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Vec<Bill>>;
    async fn save(&self, bill: Bill) -> DomainResult<Bill>;
    async fn update(&self, bill: Bill) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
