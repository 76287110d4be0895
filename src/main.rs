//! Assistant relay
//!
//! Relays chat turns from a browser client to a hosted assistant and
//! returns the assistant's reply with the thread id to continue on.

mod api;
mod assistant;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use assistant::{AssistantApi, AssistantConfig, LoggingAssistant, OpenAIAssistant};
use state_machine::PollPolicy;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistant_relay=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    // Configuration
    let port: u16 = std::env::var("RELAY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let config = AssistantConfig::from_env();
    let poll_policy = PollPolicy::from_env();

    let assistant: Option<Arc<dyn AssistantApi>> = match config.credentials() {
        Some(credentials) => {
            tracing::info!(
                assistant_id = %credentials.assistant_id,
                base_url = %config.base_url(),
                "Assistant client initialized"
            );
            let client = OpenAIAssistant::new(credentials, config.base_url())?;
            let client: Arc<dyn AssistantApi> = Arc::new(LoggingAssistant::new(Arc::new(client)));
            Some(client)
        }
        None => {
            tracing::warn!(
                "No assistant credentials configured. Set OPENAI_API_KEY and OPENAI_ASSISTANT_ID."
            );
            None
        }
    };

    tracing::info!(
        max_attempts = poll_policy.max_attempts,
        schedule = ?poll_policy.schedule,
        "Poll policy"
    );

    // Create router
    let state = AppState::new(assistant, poll_policy);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Assistant relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
