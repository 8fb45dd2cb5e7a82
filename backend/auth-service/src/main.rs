use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use auth_service::{
    config::Config,
    handlers,
    store::{MemoryUserStore, UserStore},
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::default());

    let port = config.port;
    let state = web::Data::new(AppState { config, users });

    tracing::info!(port, "Starting auth service");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .configure(handlers::register_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
