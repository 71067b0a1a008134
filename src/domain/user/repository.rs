//! User account repository interface

use async_trait::async_trait;

use super::model::UserAccount;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<UserAccount>>;
    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Option<UserAccount>>;
    async fn find_all(&self) -> DomainResult<Vec<UserAccount>>;
    async fn count(&self) -> DomainResult<u64>;
    async fn save(&self, account: UserAccount) -> DomainResult<UserAccount>;
    async fn update(&self, account: UserAccount) -> DomainResult<()>;
    async fn delete_by_customer_number(&self, number: &str) -> DomainResult<()>;
}
