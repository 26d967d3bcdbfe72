mod config;
mod credential;
mod errors;
mod generation;
mod llm_client;
mod models;
mod profile;
mod quiz;
mod results;
mod routes;
mod state;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, GeneratorBackend};
use crate::generation::generator::{Generator, LlmGenerator, RuleBasedGenerator};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::wizard::controller::Wizard;
use crate::wizard::store::{spawn_sweeper, SessionStore, SWEEP_PERIOD};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Pick the generation backend (GENERATOR_BACKEND=llm|rules)
    let generator: Arc<dyn Generator> = match config.generator_backend {
        GeneratorBackend::Llm => {
            let llm = LlmClient::new(config.llm_api_url.clone(), config.llm_model.clone())?;
            info!("LLM client initialized (model: {})", llm.model());
            Arc::new(LlmGenerator(llm))
        }
        GeneratorBackend::Rules => {
            info!("Using rule-based generator");
            Arc::new(RuleBasedGenerator)
        }
    };

    let wizard = Wizard::new(
        generator,
        config.credential_prefix.clone(),
        config.quiz_duration_secs,
    );
    info!("Quiz duration: {}s", config.quiz_duration_secs);

    let sessions = SessionStore::new();
    spawn_sweeper(
        sessions.clone(),
        Duration::from_secs(config.session_idle_secs),
        SWEEP_PERIOD,
    );
    info!("Idle sessions expire after {}s", config.session_idle_secs);

    let state = AppState {
        sessions,
        wizard,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
