//! Application services

mod bills;
mod calculation;
mod customers;
mod reports;
mod seed;
mod tariffs;

pub use bills::{BillChanges, BillService, NewBill};
pub use calculation::{BillComputation, CalculationService};
pub use customers::{CustomerService, CustomerUpdate, NewCustomer};
pub use reports::{
    CustomerStatement, DashboardSummary, PaymentReceipt, ReportDocument, ReportFilter, ReportKind,
    ReportService, TariffCustomerCount, TariffRevenue,
};
pub use seed::{create_default_admin, seed_demo_data};
pub use tariffs::TariffService;
