use devcamper_backend::app::app::App;
use devcamper_backend::util::logger::Logger;
use dotenv::dotenv;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the logger reads LOG_DIR and RUST_LOG
    let env_loaded = dotenv();
    let _logger = Logger::new()?;

    info!("🚀 Starting DevCamper Backend");
    match env_loaded {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await.map_err(|e| {
        error!("Failed to start: {}", e);
        e
    })?;
    app.start().await?;
    Ok(())
}
