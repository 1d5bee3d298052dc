use axum::Json;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::seed::{self, Quote};

/// Service banner returned from the API root.
#[derive(Debug, Serialize)]
pub struct ServiceBanner {
    pub message: &'static str,
    pub version: &'static str,
}

/// Service health report.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub message: &'static str,
}

/// Handler for the API root banner
///
/// This function handles GET requests to `/api/`.
///
/// ### Returns
///
/// The service name and version as JSON
pub async fn root_handler() -> Json<ServiceBanner> {
    Json(ServiceBanner {
        message: "Abhyasa API is running!",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler for the health check probe
///
/// This function handles GET requests to `/api/health`.
///
/// ### Returns
///
/// A static health report as JSON
pub async fn health_handler() -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy",
        message: "Abhyasa API is operational",
    })
}

/// Handler for serving a random motivational quote
///
/// This function handles GET requests to `/api/quote`.
///
/// ### Returns
///
/// A randomly chosen quote and study tip as JSON
#[instrument]
pub async fn quote_handler() -> Json<Quote> {
    debug!("Serving motivational quote");

    Json(seed::random_quote())
}
