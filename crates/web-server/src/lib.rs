use axum::{
    routing::{get, post, put},
    Router,
};
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
}

/// Assembles the application router.
///
/// Collections use plural paths; single items use an id path segment.
/// Factored out of `run_server` so tests can drive it directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::read_root))
        .route("/customers", get(handlers::get_customers))
        .route(
            "/customer/:customer_id",
            get(handlers::get_customer).delete(handlers::delete_customer),
        )
        .route(
            "/customer/",
            post(handlers::create_customer).put(handlers::update_customer),
        )
        .route("/purchases", get(handlers::get_purchases))
        .route(
            "/purchase/:purchase_id",
            get(handlers::get_purchase).delete(handlers::delete_purchase),
        )
        .route("/purchases/:customer_id", get(handlers::get_customer_purchases))
        .route("/purchases/", post(handlers::create_purchase))
        .route("/purchase/", put(handlers::update_purchase))
        .route("/loyalty_levels", get(handlers::get_loyalty_levels))
        .route(
            "/loyalty_level/:level_id",
            get(handlers::get_loyalty_level).delete(handlers::delete_loyalty_level),
        )
        .route(
            "/loyalty_level/",
            post(handlers::create_loyalty_level).put(handlers::update_loyalty_level),
        )
        .with_state(state)
}

/// The main function to configure and run the web server.
///
/// Connects to the database, bootstraps the schema if it is missing, serves
/// until Ctrl-C, and — only when `ephemeral` is set — drops the loyalty
/// tables on the way out.
pub async fn run_server(addr: SocketAddr, ephemeral: bool) -> anyhow::Result<()> {
    let settings = configuration::load_database_settings()?;
    let db_pool = database::connect(&settings).await?;
    database::ensure_schema(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool.clone());

    let app_state = Arc::new(AppState { db_repo });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    let app = build_router(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http());

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if ephemeral {
        tracing::info!("Ephemeral mode: tearing the loyalty schema down");
        database::drop_schema(&db_pool).await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
    }
    tracing::info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;

    // A lazy pool never dials out, which is enough to prove the route table
    // itself is consistent (axum panics on conflicting paths at build time).
    #[tokio::test]
    async fn router_builds_without_route_conflicts() {
        let settings = configuration::load_database_settings().expect("settings");
        let pool = database::connection::connect_lazy(&settings).expect("lazy pool");
        let state = Arc::new(AppState {
            db_repo: DbRepository::new(pool),
        });
        let _router = build_router(state);
    }
}
