pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

use axum::routing::get;
use axum::Router;
use estate_core::store::ReportStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all reporting routes and middleware.
/// Generic over the store so integration tests can run against the
/// in-memory store.
pub fn build_router<S: ReportStore + Clone>(store: S) -> Router {
    let app_state = state::AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route(
            "/api/reports/properties/stats",
            get(routes::properties::property_stats::<S>),
        )
        .route(
            "/api/reports/properties",
            get(routes::properties::list_properties::<S>),
        )
        .route(
            "/api/reports/tenants/stats",
            get(routes::tenants::tenant_stats::<S>),
        )
        .route(
            "/api/reports/financial",
            get(routes::financial::financial_summary::<S>),
        )
        .route(
            "/api/reports/maintenance",
            get(routes::maintenance::maintenance_summary::<S>),
        )
        .route(
            "/api/reports/occupancy",
            get(routes::occupancy::occupancy_summary::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve the reporting API on a pre-bound listener. Accepting the
/// listener lets the caller read the actual port first (useful when the
/// OS picks a free port).
pub async fn serve<S: ReportStore + Clone>(
    store: S,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(store);

    tracing::info!("estate reporting API listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
