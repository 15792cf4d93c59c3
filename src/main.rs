use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use social_muse::{
    CreativeAssistant,
    cache::{HistoryStore, LocalFileStorage},
    config::AppConfig,
    gemini::GeminiClient,
    mcp_server::CampaignServer,
    web_pages,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("social_muse=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, every generation will fail");
    }

    let storage = LocalFileStorage::new(config.data_dir.clone());
    let history = HistoryStore::load(storage)
        .await
        .with_context(|| format!("load history from {}", config.data_dir.display()))?;
    let provider = GeminiClient::new(
        config.api_key.clone().unwrap_or_default(),
        config.api_base.as_str(),
        config.copy_model.clone(),
        config.image_model.clone(),
        config.request_timeout,
    )?;
    let assistant = Arc::new(CreativeAssistant::new(Arc::new(provider), history));

    let prefix = config.route_prefix();
    let mcp_path = format!("{prefix}/mcp");
    let assistant_for_service = assistant.clone();
    let service = StreamableHttpService::new(
        move || Ok(CampaignServer::new(assistant_for_service.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let api = web_pages::api_router(assistant);
    let router = if prefix.is_empty() {
        axum::Router::new().merge(api)
    } else {
        axum::Router::new().nest(&prefix, api)
    };
    let router = router
        .nest_service(&mcp_path, service)
        .layer(TraceLayer::new_for_http());

    let bind_address = config.bind_address();
    let tcp_listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("bind {bind_address}"))?;
    let ui_path = if prefix.is_empty() { "/" } else { prefix.as_str() };
    tracing::info!(
        address = %bind_address,
        ui = %ui_path,
        mcp = %mcp_path,
        data_dir = %config.data_dir.display(),
        "social muse server started"
    );

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
