pub mod services;

// Re-export key types for convenience
pub use services::{
    BillService, CalculationService, CustomerService, ReportService, TariffService,
};
