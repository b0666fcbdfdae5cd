//! Coursecraft API - AWS Lambda Runtime

use lambda_http::{run, Error};
use sqlx::PgPool;
use tracing::info;

use coursecraft_app::{build_cors_layer, create_app, run_migrations, with_middleware};
use coursecraft_common::config::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing Coursecraft API Lambda");

    let config = Config::from_env().map_err(|e| Error::from(format!("Configuration error: {}", e)))?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|e| Error::from(format!("Database error: {}", e)))?;

    info!("Database connection established");

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| Error::from(format!("Migration error: {}", e)))?;
    }

    let app = create_app(&config, pool)
        .await
        .map_err(|e| Error::from(format!("App initialization error: {}", e)))?;

    let app = with_middleware(app, build_cors_layer(config.cors_allowed_origins.as_deref()));

    info!("Coursecraft API Lambda ready to serve requests");

    run(app).await
}
