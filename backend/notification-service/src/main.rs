use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use event_bus::EventConsumer;
use notification_service::{
    config::Config, handlers, LogMailer, Mailer, NotificationStats, PassportEventHandlers,
    SmtpMailer,
};
use tokio::sync::watch;
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

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp, &config.from_email)?),
        None => {
            tracing::info!("SMTP_HOST not set; emails go to the log");
            Arc::new(LogMailer)
        }
    };

    let stats = Arc::new(NotificationStats::default());
    let handlers_binding = Arc::new(PassportEventHandlers::new(
        mailer,
        config.admin_email.clone(),
        stats.clone(),
    ));

    // Subscribe before the HTTP server accepts traffic; an unreachable
    // broker aborts startup.
    let mut consumer = EventConsumer::new(&config.kafka_brokers, &config.kafka_group_id);
    handlers_binding.register(&mut consumer);
    let consumer = consumer.connect()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let consumer_task = tokio::spawn(consumer.run(shutdown_rx));

    let stats_data = web::Data::new(stats);

    tracing::info!(port = config.port, "Starting notification service");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(stats_data.clone())
            .route("/health", web::get().to(handlers::health))
            .configure(handlers::register_routes)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    // Release the consumer-group connection before exiting.
    tracing::info!("HTTP server stopped; releasing Kafka consumer");
    let _ = shutdown_tx.send(true);
    let _ = consumer_task.await;

    Ok(())
}
