use axum::{Router, http::header, routing::get};
use homebudget::{
    api::{ApiDoc, AppService, api_routes},
    config::{CONFIG, StorageBackend},
    core::{format::format_percentage, live::LiveBudget, models::BudgetStatus, services::BudgetService},
    infrastructure::{
        notifications::in_memory::InMemoryNotifications,
        storage::{Storage, blob::FileBlobStore, in_memory::InMemoryStorage, local::LocalStorage},
    },
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn open_storage() -> Result<Arc<dyn Storage>, Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = match CONFIG.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Arc::new(InMemoryStorage::new())
        }
        StorageBackend::Local => {
            info!("Using local storage in {}", CONFIG.data_dir.display());
            Arc::new(LocalStorage::open(FileBlobStore::new(&CONFIG.data_dir)).await?)
        }
    };
    Ok(storage)
}

/// Logs whenever the budget crosses into another status band.
async fn monitor_budget(mut live: LiveBudget) {
    let summary = &live.state().summary;
    let mut status = summary.status;
    info!(
        "Budget status {} at {} spent",
        status,
        format_percentage(summary.percentage_spent)
    );

    while let Some(state) = live.next_update().await {
        let summary = &state.summary;
        if summary.status == status {
            continue;
        }
        status = summary.status;
        match status {
            BudgetStatus::NearExhaustion | BudgetStatus::OverBudget => warn!(
                "{} ({} spent)",
                status.message(),
                format_percentage(summary.percentage_spent)
            ),
            _ => info!(
                "{} ({} spent)",
                status.message(),
                format_percentage(summary.percentage_spent)
            ),
        }
    }
    live.close();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Initialize storage and notifications
    let storage = open_storage().await?;
    let notifications = InMemoryNotifications::new();
    let service: Arc<AppService> = Arc::new(BudgetService::new(storage, notifications, CONFIG.budget_settings()));

    if CONFIG.seed_on_first_run {
        let seeded = service.ensure_seeded().await?;
        info!(
            "Seed check done (expenses seeded: {}, to-do items seeded: {})",
            seeded.expenses, seeded.todo_items
        );
    }

    let monitor = match service.live(Default::default()).await {
        Ok(live) => Some(tokio::spawn(monitor_budget(live))),
        Err(e) => {
            error!("Budget monitor not started: {}", e);
            None
        }
    };

    let app = Router::new()
        // add / route with a simple health check
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30))) // 30-second timeout
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PATCH,
                    http::Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(monitor) = monitor {
        monitor.abort();
    }
    Ok(())
}
