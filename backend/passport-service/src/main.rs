use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use auth_middleware::RemoteVerifier;
use event_bus::EventProducer;
use passport_service::{
    config::Config,
    events::{LifecycleEvents, PassportEvents},
    handlers,
    store::{MemoryPassportStore, PassportStore},
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

    // The event path is a startup requirement: an unreachable broker
    // aborts the process instead of serving without lifecycle events.
    let producer = Arc::new(EventProducer::connect(&config.kafka_brokers, "battery-passport").await?);

    let store: Arc<dyn PassportStore> = Arc::new(MemoryPassportStore::default());
    let events: Arc<dyn LifecycleEvents> = Arc::new(PassportEvents::new(producer.clone()));
    let state = web::Data::new(AppState { store, events });

    let verifier = RemoteVerifier::new(&config.auth_service_url, config.verify_timeout)?;

    tracing::info!(port = config.port, "Starting battery passport service");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .configure(|cfg| handlers::register_routes(cfg, verifier.clone()))
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    // Drain in-flight events before releasing the producer connection.
    tracing::info!("HTTP server stopped; releasing Kafka producer");
    if let Err(e) = producer.flush(Duration::from_secs(5)) {
        tracing::warn!(error = %e, "producer flush failed during shutdown");
    }

    Ok(())
}
