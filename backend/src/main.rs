use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rollcall_backend::{
    config::Config,
    db::connection::{create_pool, DbPool},
    routes::build_router,
    state::AppState,
};

fn redact_database_url(url: &str) -> String {
    match url.split_once('@') {
        Some((_, host)) => format!("***@{}", host),
        None => "<unset>".into(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rollcall_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %redact_database_url(&config.database_url),
        time_zone = %config.time_zone,
        max_range_days = config.max_range_days,
        batch_concurrency = config.batch_concurrency,
        "Loaded configuration from environment/.env"
    );

    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let bind_addr = config.bind_addr.clone();
    let app = build_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
