/*
 * Responsibility
 * - Config読み込み → tracing / panic hook → 依存生成 → Router 組み立て
 * - Middleware の適用 (observability / http / CORS)
 * - axum::serve() で起動
 */
use std::{panic, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, LogFormat};
use crate::middleware::{cors, http, observability};
use crate::repos::{CardRepo, MemoryStore, PgCardRepo, PgUserRepo, UserRepo};
use crate::services::auth::Passwords;
use crate::state::AppState;

fn init_tracing(format: LogFormat) {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,mesto_api=debug,tower_http=debug cargo run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn init_panic_hook() {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Handler panics are turned into 500s by the catch-panic layer; the
        // process keeps serving.
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    init_panic_hook();

    tracing::info!(?config, "starting API in {:?} mode on {}", config.app_env, config.addr);

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let (users, cards): (Arc<dyn UserRepo>, Arc<dyn CardRepo>) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("connect to postgres")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("run migrations")?;
            tracing::info!("using postgres store");
            (
                Arc::new(PgUserRepo::new(pool.clone())),
                Arc::new(PgCardRepo::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using in-memory store (data is lost on restart)");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    };

    Ok(AppState::new(config, users, cards, Passwords::default()))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone()).with_state(state);

    let router = observability::apply(router);
    let router = http::apply(router);
    cors::apply(router, config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
