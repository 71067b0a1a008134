//! JSON file store implementation

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::{
    Bill, BillRepository, Customer, CustomerRepository, DomainError, DomainResult,
    RepositoryProvider, Tariff, TariffRepository, UserAccount, UserRepository,
};
use crate::shared::types::InfraError;

/// Whole-store document as it is laid out on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    tariffs: Vec<Tariff>,
    #[serde(default)]
    customers: Vec<Customer>,
    #[serde(default)]
    bills: Vec<Bill>,
    #[serde(default)]
    users: Vec<UserAccount>,
}

/// Durable store that keeps all collections in a single JSON document.
///
/// State is held in memory behind an [`RwLock`]; every mutation rewrites
/// the document through a temp file so a crash mid-write never leaves a
/// truncated store behind.
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories and starting
    /// from an empty document when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, InfraError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    async fn persist(&self, state: &StoreState) -> Result<(), InfraError> {
        let json = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TariffRepository for JsonFileStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Tariff>> {
        let state = self.state.read().await;
        Ok(state.tariffs.iter().find(|t| t.id == id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Tariff>> {
        Ok(self.state.read().await.tariffs.clone())
    }

    async fn save(&self, tariff: Tariff) -> DomainResult<Tariff> {
        let mut state = self.state.write().await;
        state.tariffs.push(tariff.clone());
        self.persist(&state).await?;
        Ok(tariff)
    }

    async fn update(&self, tariff: Tariff) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .tariffs
            .iter_mut()
            .find(|t| t.id == tariff.id)
            .ok_or_else(|| DomainError::not_found("tariff", "id", tariff.id.clone()))?;
        *slot = tariff;
        self.persist(&state).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let before = state.tariffs.len();
        state.tariffs.retain(|t| t.id != id);
        if state.tariffs.len() == before {
            return Err(DomainError::not_found("tariff", "id", id));
        }
        self.persist(&state).await?;
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for JsonFileStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state
            .customers
            .iter()
            .find(|c| c.customer_number == number)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state
            .customers
            .iter()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        Ok(self.state.read().await.customers.clone())
    }

    async fn save(&self, customer: Customer) -> DomainResult<Customer> {
        let mut state = self.state.write().await;
        state.customers.push(customer.clone());
        self.persist(&state).await?;
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or_else(|| DomainError::not_found("customer", "id", customer.id.clone()))?;
        *slot = customer;
        self.persist(&state).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let before = state.customers.len();
        state.customers.retain(|c| c.id != id);
        if state.customers.len() == before {
            return Err(DomainError::not_found("customer", "id", id));
        }
        self.persist(&state).await?;
        Ok(())
    }
}

#[async_trait]
impl BillRepository for JsonFileStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Bill>> {
        let state = self.state.read().await;
        Ok(state.bills.iter().find(|b| b.id == id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Bill>> {
        Ok(self.state.read().await.bills.clone())
    }

    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Vec<Bill>> {
        let state = self.state.read().await;
        Ok(state
            .bills
            .iter()
            .filter(|b| b.customer_number == number)
            .cloned()
            .collect())
    }

    async fn save(&self, bill: Bill) -> DomainResult<Bill> {
        let mut state = self.state.write().await;
        state.bills.push(bill.clone());
        self.persist(&state).await?;
        Ok(bill)
    }

    async fn update(&self, bill: Bill) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .bills
            .iter_mut()
            .find(|b| b.id == bill.id)
            .ok_or_else(|| DomainError::not_found("bill", "id", bill.id.clone()))?;
        *slot = bill;
        self.persist(&state).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let before = state.bills.len();
        state.bills.retain(|b| b.id != id);
        if state.bills.len() == before {
            return Err(DomainError::not_found("bill", "id", id));
        }
        self.persist(&state).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for JsonFileStore {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<UserAccount>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Option<UserAccount>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.customer_number.as_deref() == Some(number))
            .cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<UserAccount>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.state.read().await.users.len() as u64)
    }

    async fn save(&self, account: UserAccount) -> DomainResult<UserAccount> {
        let mut state = self.state.write().await;
        state.users.push(account.clone());
        self.persist(&state).await?;
        Ok(account)
    }

    async fn update(&self, account: UserAccount) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .users
            .iter_mut()
            .find(|u| u.id == account.id)
            .ok_or_else(|| DomainError::not_found("user", "id", account.id.clone()))?;
        *slot = account;
        self.persist(&state).await?;
        Ok(())
    }

    async fn delete_by_customer_number(&self, number: &str) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state
            .users
            .retain(|u| u.customer_number.as_deref() != Some(number));
        if state.users.len() == before {
            // Customers without a login are legal, nothing to remove.
            return Ok(());
        }
        self.persist(&state).await?;
        Ok(())
    }
}

impl RepositoryProvider for JsonFileStore {
    fn tariffs(&self) -> &dyn TariffRepository {
        self
    }

    fn customers(&self) -> &dyn CustomerRepository {
        self
    }

    fn bills(&self) -> &dyn BillRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }
}
