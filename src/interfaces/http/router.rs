//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{
    BillService, CustomerService, CustomerStatement, DashboardSummary, PaymentReceipt,
    ReportDocument, ReportService, TariffCustomerCount, TariffRevenue, TariffService,
};
use crate::domain::{Bill, BillStatus, Customer, PaymentMethod, RepositoryProvider, Tariff, TariffSnapshot};
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::{bills, customers, health, metrics, reports, tariffs};

/// Shared state for the billing routes. One service set, cloned per route.
#[derive(Clone)]
pub struct AppState {
    pub tariff_service: Arc<TariffService>,
    pub customer_service: Arc<CustomerService>,
    pub bill_service: Arc<BillService>,
    pub report_service: Arc<ReportService>,
}

impl AppState {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            tariff_service: Arc::new(TariffService::new(repos.clone())),
            customer_service: Arc::new(CustomerService::new(repos.clone())),
            bill_service: Arc::new(BillService::new(repos.clone())),
            report_service: Arc::new(ReportService::new(repos)),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Tariffs
        tariffs::list_tariffs,
        tariffs::get_tariff,
        tariffs::create_tariff,
        tariffs::update_tariff,
        tariffs::delete_tariff,
        // Customers
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        customers::get_customer_statement,
        // Bills
        bills::list_bills,
        bills::get_bill,
        bills::create_bill,
        bills::update_bill,
        bills::delete_bill,
        bills::toggle_bill_status,
        bills::pay_bill,
        bills::get_bill_receipt,
        // Reports
        reports::dashboard_summary,
        reports::revenue_by_tariff,
        reports::report_document,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            health::HealthResponse,
            // Domain
            Tariff,
            TariffSnapshot,
            Customer,
            Bill,
            BillStatus,
            PaymentMethod,
            // Tariffs
            tariffs::CreateTariffRequest,
            tariffs::UpdateTariffRequest,
            // Customers
            customers::CreateCustomerRequest,
            customers::UpdateCustomerRequest,
            // Bills
            bills::CreateBillRequest,
            bills::UpdateBillRequest,
            bills::PayBillRequest,
            // Reports
            DashboardSummary,
            TariffCustomerCount,
            TariffRevenue,
            CustomerStatement,
            ReportDocument,
            PaymentReceipt,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Tariffs", description = "Electricity tariff catalog management"),
        (name = "Customers", description = "Customer directory and billing statements"),
        (name = "Bills", description = "Monthly bill issuing, payment and receipts"),
        (name = "Reports", description = "Dashboard aggregates and printable report documents"),
    ),
    info(
        title = "Pascabill API",
        version = "1.0.0",
        description = "REST API for postpaid electricity billing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(repos: Arc<dyn RepositoryProvider>, prometheus: PrometheusHandle) -> Router {
    let state = AppState::new(repos);

    let health_state = health::HealthState {
        started_at: Arc::new(Instant::now()),
    };
    let metrics_state = metrics::MetricsState { handle: prometheus };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Tariff routes
    let tariff_routes = Router::new()
        .route("/", get(tariffs::list_tariffs).post(tariffs::create_tariff))
        .route(
            "/{id}",
            get(tariffs::get_tariff)
                .put(tariffs::update_tariff)
                .delete(tariffs::delete_tariff),
        )
        .with_state(state.clone());

    // Customer routes
    let customer_routes = Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/{id}/statement", get(customers::get_customer_statement))
        .with_state(state.clone());

    // Bill routes
    let bill_routes = Router::new()
        .route("/", get(bills::list_bills).post(bills::create_bill))
        .route(
            "/{id}",
            get(bills::get_bill)
                .put(bills::update_bill)
                .delete(bills::delete_bill),
        )
        .route("/{id}/toggle-status", post(bills::toggle_bill_status))
        .route("/{id}/pay", post(bills::pay_bill))
        .route("/{id}/receipt", get(bills::get_bill_receipt))
        .with_state(state.clone());

    // Report routes
    let report_routes = Router::new()
        .route("/summary", get(reports::dashboard_summary))
        .route("/revenue-by-tariff", get(reports::revenue_by_tariff))
        .route("/document", get(reports::report_document))
        .with_state(state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + metrics
        .route("/health", get(health::health_check).with_state(health_state))
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics_state),
        )
        // Billing API
        .nest("/api/v1/tariffs", tariff_routes)
        .nest("/api/v1/customers", customer_routes)
        .nest("/api/v1/bills", bill_routes)
        .nest("/api/v1/reports", report_routes)
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
