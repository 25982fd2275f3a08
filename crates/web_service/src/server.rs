use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use bridge_agent::{
    AgentBridge, BridgeConfig, Coordinator, PromptOptimizer, SseSessionFactory,
};
use bridge_llm::GroqProvider;
use interactive_flow::{InMemorySessionStore, InteractiveFlow};

use crate::controllers::{interactive_controller, optimize_controller, system_controller};

const DEFAULT_WORKER_COUNT: usize = 4;

pub struct AppState {
    pub optimizer: Arc<dyn PromptOptimizer>,
    pub flow: Arc<InteractiveFlow>,
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .configure(optimize_controller::config)
            .configure(interactive_controller::config)
            .configure(system_controller::config),
    );
}

/// Wire the production state from the environment: Groq provider, SSE
/// session factory against the configured catalog, coordinator with the
/// direct fallback, and the interactive flow on an in-memory session store.
pub fn build_state() -> AppState {
    let config = BridgeConfig::from_env();
    info!(
        "tool catalog endpoint: {}, model: {}",
        config.catalog_url, config.model
    );

    let provider = Arc::new(GroqProvider::from_env().with_model(&config.model));
    let sessions = Arc::new(SseSessionFactory::new(&config.catalog_url));
    let fallback_model = config.fallback_model.clone();
    let bridge = Arc::new(AgentBridge::new(provider.clone(), sessions, config));
    let coordinator = Arc::new(Coordinator::new(bridge, provider, fallback_model));

    let store = Arc::new(InMemorySessionStore::new());
    // Every interactive round goes through the coordinator too, so the
    // rounds inherit the fallback and error classification.
    let flow = Arc::new(InteractiveFlow::new(coordinator.clone(), store));

    AppState {
        optimizer: coordinator,
        flow,
    }
}

pub async fn run(port: u16) -> Result<(), String> {
    info!("Starting web service...");

    let app_state = web::Data::new(build_state());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(format!("127.0.0.1:{port}"))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Web service listening on http://127.0.0.1:{port}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
