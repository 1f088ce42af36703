//! Service entry point: configuration, adapters, dispatcher, HTTP server.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use agendly::adapters::gateway::RestPaymentGateway;
use agendly::adapters::http::{router, AppState};
use agendly::adapters::notification::{ChatApiConfig, HttpChatSender, SmtpEmailSender};
use agendly::adapters::postgres::{
    PostgresAppointmentRepository, PostgresCatalogReader, PostgresNotificationOutbox,
    PostgresPaymentRepository, PostgresSubscriptionRepository, PostgresTenantConfigReader,
    PostgresUserDirectory,
};
use agendly::application::notifications::NotificationDispatcher;
use agendly::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let outbox = Arc::new(PostgresNotificationOutbox::new(pool.clone()));
    let tenant_config = Arc::new(PostgresTenantConfigReader::new(pool.clone()));

    let state = AppState {
        appointments: Arc::new(PostgresAppointmentRepository::new(pool.clone())),
        payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        catalog: Arc::new(PostgresCatalogReader::new(pool.clone())),
        users: Arc::new(PostgresUserDirectory::new(pool.clone())),
        tenant_config: tenant_config.clone(),
        gateway: Arc::new(RestPaymentGateway::new(config.payment.gateway())),
        outbox: outbox.clone(),
        grid: config.scheduling.grid(),
        public_url: config.server.public_url.clone(),
        gateway_slug: config.payment.gateway_slug.clone(),
        jwt_secret: if config.server.jwt_secret.is_empty() {
            None
        } else {
            Some(config.server.jwt_secret.clone())
        },
    };

    // Background notification dispatcher with graceful shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let dispatcher = NotificationDispatcher::with_config(
        outbox,
        Arc::new(HttpChatSender::new(ChatApiConfig {
            api_base_url: config.notifications.chat_api_base_url.clone(),
            timeout: std::time::Duration::from_secs(config.notifications.chat_timeout_secs),
        })),
        Arc::new(SmtpEmailSender::new()),
        tenant_config,
        config.notifications.dispatcher(),
    );
    let dispatcher_handle = tokio::spawn(async move {
        if let Err(e) = dispatcher.run(shutdown_rx).await {
            tracing::error!(error = %e, "Notification dispatcher stopped with error");
        }
    });

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    // Drain the in-flight notification batch before exiting.
    let _ = shutdown_tx.send(true);
    let _ = dispatcher_handle.await;

    Ok(())
}
