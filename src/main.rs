use mimalloc::MiMalloc;
use naviconomy::config::{CONFIG_FILE, Config, DEFAULT_SECRET_KEY};
use naviconomy::db::Database;
use naviconomy::router::{NaviconomyState, naviconomy_router};
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load(Some(Path::new(CONFIG_FILE)))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_filter()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        project = %cfg.project_name,
        database_url = %cfg.database.url,
        loglevel = %cfg.log_filter(),
        algorithm = %cfg.auth.algorithm,
        token_minutes = cfg.auth.access_token_expire_minutes,
        rate_limit = cfg.rate_limit.enabled
    );
    if cfg.auth.secret_key == DEFAULT_SECRET_KEY {
        warn!("using the built-in secret key; set NAVICONOMY_AUTH__SECRET_KEY");
    }

    let db = Database::init(&cfg.database).await?;
    let state = NaviconomyState::new(db.clone(), &cfg)?;
    let app = naviconomy_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
