use finchat::{ChatService, Settings};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Interactive console: one message per line on stdin, one reply per line on stdout.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so replies stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env()?;
    let chat = ChatService::from_settings(&settings);
    info!(state = ?chat.classifier().state(), "Financial Intent Chatbot console ready");

    let context = json!({ "channel": "console" });
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let reply = chat.process_message(text, &context).await;
        println!(
            "[{} {:.2}] {}",
            reply.intent, reply.confidence, reply.response
        );
    }

    Ok(())
}
