
pub mod bills;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod tariffs;
