mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use docket_api::token::TokenService;
use docket_api::{AppState, AppStateInner};
use docket_notify::{EmailTransport, SmsTransport, SmtpMailer, Sweeper, TwilioSms};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docket=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = Arc::new(docket_db::Database::open(&config.db_path)?);

    // Notification channels
    let email: Arc<dyn EmailTransport> = Arc::new(SmtpMailer::new(
        &config.smtp_host,
        config.smtp_user.clone(),
        config.smtp_password.clone(),
        &config.email_from,
    )?);
    let sms: Arc<dyn SmsTransport> = Arc::new(TwilioSms::new(
        config.twilio_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_from.clone(),
    )?);

    // Daily sweep runs on its own task, independent of request handling.
    let sweeper = Arc::new(Sweeper::new(db.clone(), email, sms, config.sweep.clone()));
    let sweep_task = tokio::spawn(sweeper.run_daily());

    let state: AppState = Arc::new(AppStateInner {
        db,
        tokens: TokenService::new(&config.jwt_secret, config.token_ttl_minutes),
    });

    let app = docket_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("docketd listening on {}", addr);
    info!(
        "sweep: daily at {:02}:00 local, {}-day window",
        config.sweep.hour, config.sweep.window_days
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweep_task.abort();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
