//! In-memory store implementation

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{
    Bill, BillRepository, Customer, CustomerRepository, DomainError, DomainResult,
    RepositoryProvider, Tariff, TariffRepository, UserAccount, UserRepository,
};

/// In-memory store for development and testing.
///
/// Every collection is keyed by entity id; secondary lookups scan the
/// map. Contents do not survive process exit.
pub struct MemoryStore {
    tariffs: DashMap<String, Tariff>,
    customers: DashMap<String, Customer>,
    bills: DashMap<String, Bill>,
    users: DashMap<String, UserAccount>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tariffs: DashMap::new(),
            customers: DashMap::new(),
            bills: DashMap::new(),
            users: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TariffRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Tariff>> {
        Ok(self.tariffs.get(id).map(|t| t.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Tariff>> {
        Ok(self.tariffs.iter().map(|e| e.value().clone()).collect())
    }

    async fn save(&self, tariff: Tariff) -> DomainResult<Tariff> {
        self.tariffs.insert(tariff.id.clone(), tariff.clone());
        Ok(tariff)
    }

    async fn update(&self, tariff: Tariff) -> DomainResult<()> {
        if !self.tariffs.contains_key(&tariff.id) {
            return Err(DomainError::not_found("tariff", "id", tariff.id));
        }
        self.tariffs.insert(tariff.id.clone(), tariff);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.tariffs
            .remove(id)
            .ok_or_else(|| DomainError::not_found("tariff", "id", id))?;
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Customer>> {
        Ok(self.customers.get(id).map(|c| c.clone()))
    }

    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Option<Customer>> {
        Ok(self
            .customers
            .iter()
            .find(|c| c.customer_number == number)
            .map(|c| c.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Customer>> {
        Ok(self
            .customers
            .iter()
            .find(|c| c.username == username)
            .map(|c| c.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        Ok(self.customers.iter().map(|e| e.value().clone()).collect())
    }

    async fn save(&self, customer: Customer) -> DomainResult<Customer> {
        self.customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> DomainResult<()> {
        if !self.customers.contains_key(&customer.id) {
            return Err(DomainError::not_found("customer", "id", customer.id));
        }
        self.customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.customers
            .remove(id)
            .ok_or_else(|| DomainError::not_found("customer", "id", id))?;
        Ok(())
    }
}

#[async_trait]
impl BillRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Bill>> {
        Ok(self.bills.get(id).map(|b| b.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Bill>> {
        Ok(self.bills.iter().map(|e| e.value().clone()).collect())
    }

    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Vec<Bill>> {
        Ok(self
            .bills
            .iter()
            .filter(|b| b.customer_number == number)
            .map(|b| b.clone())
            .collect())
    }

    async fn save(&self, bill: Bill) -> DomainResult<Bill> {
        self.bills.insert(bill.id.clone(), bill.clone());
        Ok(bill)
    }

    async fn update(&self, bill: Bill) -> DomainResult<()> {
        if !self.bills.contains_key(&bill.id) {
            return Err(DomainError::not_found("bill", "id", bill.id));
        }
        self.bills.insert(bill.id.clone(), bill);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.bills
            .remove(id)
            .ok_or_else(|| DomainError::not_found("bill", "id", id))?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<UserAccount>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_by_customer_number(&self, number: &str) -> DomainResult<Option<UserAccount>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.customer_number.as_deref() == Some(number))
            .map(|u| u.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<UserAccount>> {
        Ok(self.users.iter().map(|e| e.value().clone()).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn save(&self, account: UserAccount) -> DomainResult<UserAccount> {
        self.users.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn update(&self, account: UserAccount) -> DomainResult<()> {
        if !self.users.contains_key(&account.id) {
            return Err(DomainError::not_found("user", "id", account.id));
        }
        self.users.insert(account.id.clone(), account);
        Ok(())
    }

    async fn delete_by_customer_number(&self, number: &str) -> DomainResult<()> {
        // Customers without a login are legal, so a missing account is not an error.
        let id = self
            .users
            .iter()
            .find(|u| u.customer_number.as_deref() == Some(number))
            .map(|u| u.id.clone());
        if let Some(id) = id {
            self.users.remove(&id);
        }
        Ok(())
    }
}

impl RepositoryProvider for MemoryStore {
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
