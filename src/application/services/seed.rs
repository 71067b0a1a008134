//! Demo data and first-boot provisioning

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::config::AdminConfig;
use crate::domain::{
    Bill, BillStatus, Customer, DomainError, DomainResult, RepositoryProvider, Tariff,
    TariffSnapshot, UserAccount,
};
use crate::infrastructure::crypto::password::hash_password;

/// Password shared by the seeded customer logins.
const DEMO_PASSWORD: &str = "customer123";

fn demo_date(year: i32, month: u32, day: u32) -> DomainResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DomainError::Validation(format!("invalid demo date {year}-{month:02}-{day:02}"))
    })
}

/// Populate an empty store with a small demo dataset: three tariffs,
/// three customers with login records, and one January bill each.
///
/// The seed runs only when the tariff, customer and bill collections are
/// all empty, so restarting against an existing data file is a no-op.
pub async fn seed_demo_data(repos: &dyn RepositoryProvider) -> DomainResult<()> {
    let has_data = !repos.tariffs().find_all().await?.is_empty()
        || !repos.customers().find_all().await?.is_empty()
        || !repos.bills().find_all().await?.is_empty();
    if has_data {
        debug!("Store already holds data, skipping demo seed");
        return Ok(());
    }

    info!("Seeding demo data...");

    let mut tariffs = Vec::new();
    for (name, price_per_kwh, basic_fee, description) in [
        (
            "Rumah Tangga 900VA",
            Decimal::new(1352, 0),
            Decimal::ZERO,
            "Tarif untuk rumah tangga dengan daya 900VA",
        ),
        (
            "Rumah Tangga 1300VA",
            Decimal::new(144_470, 2),
            Decimal::ZERO,
            "Tarif untuk rumah tangga dengan daya 1300VA",
        ),
        (
            "Bisnis 2200VA",
            Decimal::new(169_953, 2),
            Decimal::new(44_000, 0),
            "Tarif untuk usaha dengan daya 2200VA",
        ),
    ] {
        let tariff = repos
            .tariffs()
            .save(Tariff::new(name, price_per_kwh, basic_fee, description))
            .await?;
        tariffs.push(tariff);
    }

    let mut customers = Vec::new();
    for (i, (number, name, username, address, phone, meter)) in [
        (
            "C001",
            "John Doe",
            "customer1",
            "Jl. Merdeka No. 123, Jakarta",
            "081234567890",
            "M001",
        ),
        (
            "C002",
            "Jane Smith",
            "customer2",
            "Jl. Sudirman No. 456, Jakarta",
            "081234567891",
            "M002",
        ),
        (
            "C003",
            "Bob Wilson",
            "customer3",
            "Jl. Thamrin No. 789, Jakarta",
            "081234567892",
            "M003",
        ),
    ]
    .into_iter()
    .enumerate()
    {
        let customer = repos
            .customers()
            .save(Customer::new(
                number,
                name,
                username,
                address,
                phone,
                &tariffs[i].id,
                meter,
            ))
            .await?;
        customers.push(customer);
    }

    // The demo accounts share one password, so hash it once.
    let password_hash = hash_password(DEMO_PASSWORD)?;
    for customer in &customers {
        repos
            .users()
            .save(UserAccount::for_customer(
                &customer.username,
                &password_hash,
                &customer.name,
                &customer.customer_number,
            ))
            .await?;
    }

    let due_date = demo_date(2024, 2, 15)?;
    let paid_at = demo_date(2024, 1, 20)?.and_time(NaiveTime::MIN).and_utc();
    for (i, customer) in customers.iter().enumerate() {
        let previous = Decimal::from(1000 + 100 * i as i64);
        let usage = Decimal::from(150 + 50 * i as i64);
        let mut bill = Bill::new(
            customer,
            "2024-01",
            previous,
            previous + usage,
            TariffSnapshot::of(&tariffs[i]),
            due_date,
        );
        // The first customer keeps an open bill; the rest are settled.
        if i > 0 {
            bill.status = BillStatus::Paid;
            bill.paid_date = Some(paid_at);
        }
        repos.bills().save(bill).await?;
    }

    info!(tariffs = 3, customers = 3, bills = 3, "Demo data seeded");
    Ok(())
}

/// Create the administrator account when the user collection is empty.
///
/// Must run before [`seed_demo_data`], which adds customer logins and
/// would otherwise hide the first boot. Failures are logged, never
/// propagated: a broken admin seed must not keep the service down.
pub async fn create_default_admin(repos: &dyn RepositoryProvider, admin: &AdminConfig) {
    match repos.users().count().await {
        Ok(0) => {
            info!("Creating default admin user...");
            let password_hash = match hash_password(&admin.password) {
                Ok(hash) => hash,
                Err(e) => {
                    error!("Failed to hash default admin password: {e}");
                    return;
                }
            };
            let account = UserAccount::admin(&admin.username, password_hash, &admin.name);
            match repos.users().save(account).await {
                Ok(_) => {
                    info!(username = %admin.username, "Default admin user created");
                    info!("⚠️  Please change the admin password immediately!");
                }
                Err(e) => error!("Failed to create default admin user: {e}"),
            }
        }
        Ok(_) => {}
        Err(e) => error!("Failed to count user accounts: {e}"),
    }
}

// ── Tests ──────────────────────────────────────────────────────
