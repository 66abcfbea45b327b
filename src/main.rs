use actix_web::{web, App, HttpServer};
use anyhow::Context;
use engagement_service::aggregates::{self, CounterStore};
use engagement_service::consumers::{
    ConsumerLoop, EmailEventProcessor, MetricEventProcessor, NotificationEventProcessor,
};
use engagement_service::repository::{FollowRepository, NotificationRepository, UserRepository};
use engagement_service::services::{EmailDispatcher, EmailService, NotificationFanout};
use engagement_service::{db, metrics, Config};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,engagement_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting engagement-service");

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    tracing::info!("Database pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    aggregates::validate_registry().context("Aggregate registry is inconsistent")?;

    let store = CounterStore::new(pool.clone());
    if let Err(err) = store.verify_schema().await {
        tracing::warn!("Schema verification failed: {}", err);
    }

    let fanout = NotificationFanout::new(
        FollowRepository::new(pool.clone()),
        NotificationRepository::new(pool.clone()),
    );

    let mailer = EmailService::new(&config.smtp).context("Failed to configure SMTP")?;
    let dispatcher = EmailDispatcher::new(
        UserRepository::new(pool.clone()),
        mailer,
        config.smtp.site_url.clone(),
        config.smtp.brand_name.clone(),
    );

    // Consumers stop when this sender flips to true at shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let kafka = &config.kafka;
    let metric_loop = ConsumerLoop::new(
        &kafka.brokers,
        &kafka.metric_topic,
        &kafka.metric_group_id,
        shutdown_rx.clone(),
    )
    .context("Failed to create metric consumer")?;
    tokio::spawn(metric_loop.run(MetricEventProcessor::new(store)));

    let notification_loop = ConsumerLoop::new(
        &kafka.brokers,
        &kafka.notification_topic,
        &kafka.notification_group_id,
        shutdown_rx.clone(),
    )
    .context("Failed to create notification consumer")?;
    tokio::spawn(notification_loop.run(NotificationEventProcessor::new(fanout)));

    let email_loop = ConsumerLoop::new(
        &kafka.brokers,
        &kafka.email_topic,
        &kafka.email_group_id,
        shutdown_rx,
    )
    .context("Failed to create email consumer")?;
    tokio::spawn(email_loop.run(EmailEventProcessor::new(dispatcher)));

    let addr = format!("{}:{}", config.app.host, config.app.http_port);
    tracing::info!("Starting liveness server on {}", addr);

    HttpServer::new(|| {
        App::new()
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/metrics", web::get().to(metrics::serve_metrics))
    })
    .bind(&addr)?
    .run()
    .await?;

    // HTTP server returned: process shutdown. Stop the consumer tasks so
    // they unsubscribe before the runtime winds down.
    let _ = shutdown_tx.send(true);
    tracing::info!("engagement-service stopped");

    Ok(())
}
