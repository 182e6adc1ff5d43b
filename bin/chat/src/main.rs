use bestself_chat::config::ChatConfig;
use bestself_chat::{ChatEngine, repl};
use bestself_completion::{OpenAiBackend, OpenAiConfig};
use bestself_conversation::Session;
use bestself_core::StoreUserId;
use bestself_persistence::{HttpStore, StoreBridge};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment
    let config = ChatConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let backend = OpenAiBackend::new(
        OpenAiConfig::new(config.completion.api_key.clone())
            .with_base_url(config.completion.base_url.clone())
            .with_model(config.completion.model.clone()),
    );

    let mut engine = ChatEngine::new(Arc::new(backend));
    let mut session = Session::new();

    if let Some(store_config) = &config.store {
        let bridge = StoreBridge::new(Arc::new(HttpStore::new(store_config.base_url.clone())));

        // Resume a known backend user before accepting input.
        if let Some(user_id) = &store_config.user_id {
            let id = StoreUserId::new(user_id.clone());
            if let Err(e) = bridge.hydrate(&mut session, id).await {
                tracing::warn!(error = %e, "failed to load stored history");
            }
        }

        engine = engine.with_bridge(bridge);
    }

    if let Err(e) = repl::run(&engine, &mut session).await {
        tracing::error!(error = %e, "chat loop ended with an I/O error");
        std::process::exit(1);
    }
}
