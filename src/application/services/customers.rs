//! Customer directory operations
//!
//! Besides the directory itself, every mutation is written through to
//! the `users` collection so a customer always carries a matching login
//! record. Passwords are write-only: they arrive in plain text, leave as
//! bcrypt hashes, and are never read back by the billing core.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Customer, DomainError, DomainResult, RepositoryProvider, UserAccount};
use crate::infrastructure::crypto::password::hash_password;

/// Input for registering a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub customer_number: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub address: String,
    pub phone: String,
    pub tariff_id: String,
    pub meter_number: String,
}

/// Input for editing a customer. `password: None` keeps the stored hash.
#[derive(Debug, Clone)]
pub struct CustomerUpdate {
    pub customer_number: String,
    pub name: String,
    pub username: String,
    pub password: Option<String>,
    pub address: String,
    pub phone: String,
    pub tariff_id: String,
    pub meter_number: String,
}

/// Service for directory maintenance and lookup.
pub struct CustomerService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CustomerService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// List customers, optionally narrowed by a free-text term matched
    /// against name, customer number and phone.
    pub async fn list(&self, search: Option<&str>) -> DomainResult<Vec<Customer>> {
        let mut customers = self.repos.customers().find_all().await?;
        if let Some(term) = search {
            customers.retain(|c| c.matches_search(term));
        }
        Ok(customers)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Option<Customer>> {
        self.repos.customers().find_by_id(id).await
    }

    pub async fn create(&self, input: NewCustomer) -> DomainResult<Customer> {
        self.repos
            .tariffs()
            .find_by_id(&input.tariff_id)
            .await?
            .ok_or_else(|| DomainError::not_found("tariff", "id", input.tariff_id.clone()))?;

        if self
            .repos
            .customers()
            .find_by_customer_number(&input.customer_number)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "customer number '{}' is already in use",
                input.customer_number
            )));
        }
        if self
            .repos
            .customers()
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "username '{}' is already in use",
                input.username
            )));
        }

        let customer = self
            .repos
            .customers()
            .save(Customer::new(
                input.customer_number,
                input.name,
                input.username,
                input.address,
                input.phone,
                input.tariff_id,
                input.meter_number,
            ))
            .await?;

        let password_hash = hash_password(&input.password)?;
        self.repos
            .users()
            .save(UserAccount::for_customer(
                customer.username.clone(),
                password_hash,
                customer.name.clone(),
                customer.customer_number.clone(),
            ))
            .await?;

        info!(
            customer_id = %customer.id,
            customer_number = %customer.customer_number,
            "Customer registered"
        );
        Ok(customer)
    }

    pub async fn update(&self, id: &str, changes: CustomerUpdate) -> DomainResult<Customer> {
        let existing = self
            .repos
            .customers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("customer", "id", id))?;

        if let Some(other) = self
            .repos
            .customers()
            .find_by_customer_number(&changes.customer_number)
            .await?
        {
            if other.id != id {
                return Err(DomainError::Conflict(format!(
                    "customer number '{}' is already in use",
                    changes.customer_number
                )));
            }
        }
        if let Some(other) = self
            .repos
            .customers()
            .find_by_username(&changes.username)
            .await?
        {
            if other.id != id {
                return Err(DomainError::Conflict(format!(
                    "username '{}' is already in use",
                    changes.username
                )));
            }
        }
        if changes.tariff_id != existing.tariff_id {
            self.repos
                .tariffs()
                .find_by_id(&changes.tariff_id)
                .await?
                .ok_or_else(|| DomainError::not_found("tariff", "id", changes.tariff_id.clone()))?;
        }

        let mut customer = existing.clone();
        customer.customer_number = changes.customer_number;
        customer.name = changes.name;
        customer.username = changes.username;
        customer.address = changes.address;
        customer.phone = changes.phone;
        customer.tariff_id = changes.tariff_id;
        customer.meter_number = changes.meter_number;

        self.repos.customers().update(customer.clone()).await?;
        self.write_through_user(&existing, &customer, changes.password.as_deref())
            .await?;

        info!(
            customer_id = %customer.id,
            customer_number = %customer.customer_number,
            "Customer updated"
        );
        Ok(customer)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let existing = self
            .repos
            .customers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("customer", "id", id))?;

        self.repos.customers().delete(id).await?;
        self.repos
            .users()
            .delete_by_customer_number(&existing.customer_number)
            .await?;

        info!(
            customer_id = %id,
            customer_number = %existing.customer_number,
            "Customer deleted"
        );
        Ok(())
    }

    /// Sync the login record with the directory entry, keyed by the
    /// customer number the record was created under.
    async fn write_through_user(
        &self,
        before: &Customer,
        after: &Customer,
        password: Option<&str>,
    ) -> DomainResult<()> {
        let account = self
            .repos
            .users()
            .find_by_customer_number(&before.customer_number)
            .await?;

        match account {
            Some(mut account) => {
                account.username = after.username.clone();
                account.name = after.name.clone();
                account.customer_number = Some(after.customer_number.clone());
                if let Some(password) = password {
                    account.password_hash = hash_password(password)?;
                }
                self.repos.users().update(account).await?;
            }
            None => {
                // A directory entry without a login record only happens with
                // hand-edited data; recreate it when we have a password.
                if let Some(password) = password {
                    let password_hash = hash_password(password)?;
                    self.repos
                        .users()
                        .save(UserAccount::for_customer(
                            after.username.clone(),
                            password_hash,
                            after.name.clone(),
                            after.customer_number.clone(),
                        ))
                        .await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{Tariff, UserRole};
    use crate::infrastructure::storage::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, CustomerService, Tariff) {
        let store = Arc::new(MemoryStore::new());
        let tariff = store
            .tariffs()
            .save(Tariff::new("Rumah Tangga 900VA", Decimal::new(1352, 0), Decimal::ZERO, ""))
            .await
            .unwrap();
        let service = CustomerService::new(store.clone());
        (store, service, tariff)
    }

    fn john(tariff_id: &str) -> NewCustomer {
        NewCustomer {
            customer_number: "C001".to_string(),
            name: "John Doe".to_string(),
            username: "customer1".to_string(),
            password: "customer123".to_string(),
            address: "Jl. Merdeka No. 123, Jakarta".to_string(),
            phone: "081234567890".to_string(),
            tariff_id: tariff_id.to_string(),
            meter_number: "M001".to_string(),
        }
    }

    #[tokio::test]
    async fn create_writes_through_a_login_record() {
        let (store, service, tariff) = setup().await;

        let customer = service.create(john(&tariff.id)).await.unwrap();

        let account = store
            .users()
            .find_by_customer_number("C001")
            .await
            .unwrap()
            .expect("login record");
        assert_eq!(account.username, "customer1");
        assert_eq!(account.role, UserRole::Customer);
        assert_eq!(account.name, customer.name);
        assert_ne!(account.password_hash, "customer123");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_number_and_username() {
        let (_store, service, tariff) = setup().await;
        service.create(john(&tariff.id)).await.unwrap();

        let mut dup_number = john(&tariff.id);
        dup_number.username = "someone-else".to_string();
        let err = service.create(dup_number).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let mut dup_username = john(&tariff.id);
        dup_username.customer_number = "C099".to_string();
        let err = service.create(dup_username).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_with_unknown_tariff_is_not_found() {
        let (_store, service, _tariff) = setup().await;

        let err = service.create(john("missing-tariff")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "tariff", .. }));
    }

    #[tokio::test]
    async fn update_syncs_the_login_record() {
        let (store, service, tariff) = setup().await;
        let customer = service.create(john(&tariff.id)).await.unwrap();
        let old_hash = store
            .users()
            .find_by_customer_number("C001")
            .await
            .unwrap()
            .unwrap()
            .password_hash;

        let updated = service
            .update(
                &customer.id,
                CustomerUpdate {
                    customer_number: "C010".to_string(),
                    name: "John D.".to_string(),
                    username: "johnd".to_string(),
                    password: None,
                    address: customer.address.clone(),
                    phone: customer.phone.clone(),
                    tariff_id: tariff.id.clone(),
                    meter_number: customer.meter_number.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.customer_number, "C010");
        let account = store
            .users()
            .find_by_customer_number("C010")
            .await
            .unwrap()
            .expect("login record follows the number change");
        assert_eq!(account.username, "johnd");
        assert_eq!(account.name, "John D.");
        // No password supplied, hash untouched.
        assert_eq!(account.password_hash, old_hash);
    }

    #[tokio::test]
    async fn update_allows_keeping_own_identifiers() {
        let (_store, service, tariff) = setup().await;
        let customer = service.create(john(&tariff.id)).await.unwrap();

        // Same number and username, only the phone changes.
        let updated = service
            .update(
                &customer.id,
                CustomerUpdate {
                    customer_number: customer.customer_number.clone(),
                    name: customer.name.clone(),
                    username: customer.username.clone(),
                    password: None,
                    address: customer.address.clone(),
                    phone: "089999999999".to_string(),
                    tariff_id: customer.tariff_id.clone(),
                    meter_number: customer.meter_number.clone(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone, "089999999999");
    }

    #[tokio::test]
    async fn delete_removes_customer_and_login_record() {
        let (store, service, tariff) = setup().await;
        let customer = service.create(john(&tariff.id)).await.unwrap();

        service.delete(&customer.id).await.unwrap();

        assert!(store.customers().find_by_id(&customer.id).await.unwrap().is_none());
        assert!(store
            .users()
            .find_by_customer_number("C001")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_missing_customer_is_not_found() {
        let (_store, service, _tariff) = setup().await;
        let err = service.delete("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "customer", .. }));
    }
}
