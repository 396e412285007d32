use blog_api_rust::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECRET_KEY, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Refuses to start without SECRET_KEY
    let config = AppConfig::from_env()?;
    tracing::info!("Starting Blog API in {:?} mode", config.environment);

    blog_api_rust::serve(config, false).await
}
