use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use estate_server::config::Config;
use estate_server::store::{PgStore, MIGRATOR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let config = Config::parse();

    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("could not connect to the report store")?;

    tracing::info!(
        max_connections = config.max_connections,
        "connected to report store"
    );

    MIGRATOR
        .run(&pool)
        .await
        .context("failed to apply schema migrations")?;

    let listener = tokio::net::TcpListener::bind((config.bind_addr.as_str(), config.port))
        .await
        .with_context(|| format!("could not bind {}:{}", config.bind_addr, config.port))?;

    estate_server::serve(PgStore::new(pool), listener).await
}
