//! # cityboard
//!
//! Wires the in-memory stores, local media storage and the push hub into
//! the services, then serves the HTTP and websocket routes.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{
    web::{router, AppState},
    PushHub,
};
use configs::{AppConfig, LogConfig, LogFormat};
use domains::NotificationPush;
use services::{CommentService, FavoritesService, NotificationService};
use storage_adapters::{
    InMemoryCommentRepository, InMemoryNotificationRepository, InMemoryUserRepository,
    LocalMediaStorage,
};
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogConfig) {
    // RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.log);

    let comment_repo = Arc::new(InMemoryCommentRepository::new());
    let notification_repo = Arc::new(InMemoryNotificationRepository::new());
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let media = Arc::new(LocalMediaStorage::new(
        &config.media.root_dir,
        &config.media.url_prefix,
        config.media.max_upload_bytes,
    ));

    let push = Arc::new(PushHub::new(config.push.channel_capacity));
    let push_port: Option<Arc<dyn NotificationPush>> = if config.push.enabled {
        Some(push.clone())
    } else {
        None
    };

    let notifications = Arc::new(NotificationService::new(notification_repo, push_port));
    let comments = Arc::new(CommentService::new(
        comment_repo.clone(),
        media,
        notifications.clone(),
    ));
    let favorites = Arc::new(FavoritesService::new(user_repo, comment_repo));

    let state = AppState {
        comments,
        notifications,
        favorites,
        push,
        popular_limit: config.popularity.default_limit,
    };

    let app = router(state).nest_service(
        &config.media.url_prefix,
        ServeDir::new(&config.media.root_dir),
    );

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, push = config.push.enabled, "cityboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
