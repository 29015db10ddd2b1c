use finchat::{api::start_server, ChatService, Settings};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;

    info!("Financial Intent Chatbot - API Server");
    info!(
        port = settings.port,
        prefix = %settings.api_prefix,
        model_path = %settings.model_path.display(),
        "Loaded settings"
    );

    let chat = Arc::new(ChatService::from_settings(&settings));

    info!("Starting API server...");
    start_server(chat, &settings).await?;

    Ok(())
}
