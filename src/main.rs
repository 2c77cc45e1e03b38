use std::sync::Arc;
use tokio::net::TcpListener;
use site_insight::{
    api::routes::create_router,
    config::Config,
    llm::GeminiClient,
    telemetry::init_tracing,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load()?;
    let server_addr = config.server_addr;

    let gemini = GeminiClient::from_config(&config)?;
    tracing::info!(model = gemini.model(), "using Gemini for analysis");

    let app = create_router(AppState::new(Arc::new(gemini)));

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
